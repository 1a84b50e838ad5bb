use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "chanline",
    about = "Propagate channel membership up bundle upgrade chains",
    version,
)]
pub struct Cli {
    /// Catalog document to read and then overwrite
    pub path: PathBuf,

    /// Write the result here instead of overwriting PATH
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compute and report additions without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log every indexed bundle and synthesized entry
    #[arg(short, long)]
    pub verbose: bool,

    /// Summary output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_path_only() {
        let cli = Cli::try_parse_from(["chanline", "catalog.yaml"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("catalog.yaml"));
        assert!(cli.output.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["chanline"]).is_err());
    }

    #[test]
    fn parse_dry_run_json() {
        let cli = Cli::try_parse_from(["chanline", "--dry-run", "--format", "json", "c.yaml"]).unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_output() {
        let cli = Cli::try_parse_from(["chanline", "in.yaml", "-o", "out.yaml"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.yaml")));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["chanline", "-v", "c.yaml"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["chanline", "--format", "xml", "c.yaml"]).is_err());
    }
}
