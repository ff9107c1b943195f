use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    name = "notecat",
    version,
    about = "A small note-taking application with a sidebar, editor and status bar"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Path to the note data file
    #[clap(long, value_parser)]
    pub data_file: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the notecat application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_subcommand() {
        let cli = Cli::parse_from([
            "notecat",
            "--data-file",
            "/tmp/n.json",
            "-v",
            "edit",
            "--title",
            "Plans",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/n.json")));
        match cli.command {
            Commands::Edit(options) => {
                assert_eq!(options.title.as_deref(), Some("Plans"));
                assert!(options.id.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_defaults_to_no_limit() {
        let cli = Cli::parse_from(["notecat", "list"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                limit: 0,
                json: false
            }
        ));
    }
}
