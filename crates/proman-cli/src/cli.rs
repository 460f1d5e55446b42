use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "proman")]
#[command(bin_name = "proman")]
#[command(version)]
#[command(about = "Terminal dashboard for GitHub repositories and their local clones")]
pub struct Cli {
    /// Config file to use instead of ~/.config/proman/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
    #[command(about = "Write repos.json and one Markdown file per repository")]
    Export {
        /// Directory that receives the exported files
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_opens_dashboard() {
        let cli = Cli::try_parse_from(["proman"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn export_takes_output_directory_and_global_config() {
        let cli = Cli::try_parse_from(["proman", "export", "--out", "dump", "--config", "c.toml"])
            .expect("parse");
        match cli.command {
            Some(Command::Export { out }) => assert_eq!(out.to_str(), Some("dump")),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.config.as_deref().and_then(|path| path.to_str()), Some("c.toml"));
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["proman", "export"]).is_err());
    }
}
