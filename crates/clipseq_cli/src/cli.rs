//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Assemble one audio file from a sequence of clips and pauses.
#[derive(Parser, Debug)]
#[command(name = "clipseq")]
#[command(version)]
pub struct Cli {
    /// Configuration file (created with defaults if missing)
    #[arg(
        long,
        global = true,
        env = "CLIPSEQ_CONFIG",
        default_value = ".config/clipseq.toml"
    )]
    pub config: PathBuf,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a sequence into one audio file
    Run {
        /// Sequence file (CSV rows of id, clip, pause)
        sequence: PathBuf,

        /// Output directory (defaults to the configured output folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base directory for the run's scratch area
        #[arg(long)]
        scratch: Option<PathBuf>,

        /// File name prefix for the assembled file
        #[arg(long)]
        name: Option<String>,
    },

    /// Show what each step of a sequence contributes, without running ffmpeg
    Plan {
        /// Sequence file
        sequence: PathBuf,
    },

    /// Inspect or change the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Set the default output folder
    SetOutput { dir: PathBuf },

    /// Set the base folder for scratch areas
    SetScratch { dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "clipseq", "run", "seq.csv", "-o", "out", "--name", "intro", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Run {
                sequence,
                output,
                scratch,
                name,
            } => {
                assert_eq!(sequence, PathBuf::from("seq.csv"));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(scratch, None);
                assert_eq!(name.as_deref(), Some("intro"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::parse_from(["clipseq", "--config", "c.toml", "config", "set-output", "dst"]);
        assert_eq!(cli.config, PathBuf::from("c.toml"));
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::SetOutput { .. }
            }
        ));
    }
}
