use std::path::{Path, PathBuf};

use crate::cli::{Cli, OutputFormat};

/// Everything a single run needs, resolved from the command line.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Catalog to read.
    pub input: PathBuf,
    /// Where to write the result. `None` rewrites `input` in place.
    pub output: Option<PathBuf>,
    /// When `true`, nothing is written.
    pub dry_run: bool,
    /// Summary format.
    pub format: OutputFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("catalog.yaml"),
            output: None,
            dry_run: false,
            format: OutputFormat::Text,
        }
    }
}

impl RunConfig {
    /// The path the result is written to.
    pub fn target(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

impl From<&Cli> for RunConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            input: cli.path.clone(),
            output: cli.output.clone(),
            dry_run: cli.dry_run,
            format: cli.format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn default_config() {
        let c = RunConfig::default();
        assert_eq!(c.target(), Path::new("catalog.yaml"));
        assert!(!c.dry_run);
        assert_eq!(c.format, OutputFormat::Text);
    }

    #[test]
    fn target_defaults_to_input() {
        let cli = Cli::try_parse_from(["chanline", "index.yaml"]).unwrap();
        let c = RunConfig::from(&cli);
        assert_eq!(c.target(), Path::new("index.yaml"));
    }

    #[test]
    fn target_prefers_output() {
        let cli = Cli::try_parse_from(["chanline", "index.yaml", "--output", "new.yaml"]).unwrap();
        let c = RunConfig::from(&cli);
        assert_eq!(c.input, PathBuf::from("index.yaml"));
        assert_eq!(c.target(), Path::new("new.yaml"));
    }
}
