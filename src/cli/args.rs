//! CLI argument definitions using clap.
//!
//! Commands:
//! - slabdb init --config <path>
//! - slabdb start --config <path>
//! - slabdb exec --config <path> <statement>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// slabdb - a schema-validated JSON document store
#[derive(Parser, Debug)]
#[command(name = "slabdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./slabdb.json")]
        config: PathBuf,
    },

    /// Start the server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./slabdb.json")]
        config: PathBuf,
    },

    /// Execute a single JSON statement and print the response
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./slabdb.json")]
        config: PathBuf,

        /// The statement, one JSON object
        statement: String,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_init() {
        let cli = Cli::try_parse_from(["slabdb", "init"]).unwrap();
        match cli.command {
            Command::Init { config } => {
                assert_eq!(config, PathBuf::from("./slabdb.json"));
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_exec_with_config() {
        let cli = Cli::try_parse_from([
            "slabdb",
            "exec",
            "--config",
            "/tmp/cfg.json",
            r#"{"stmt":"select","table":"t"}"#,
        ])
        .unwrap();
        match cli.command {
            Command::Exec { config, statement } => {
                assert_eq!(config, PathBuf::from("/tmp/cfg.json"));
                assert!(statement.contains("select"));
            }
            other => panic!("parsed wrong command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["slabdb", "destroy"]).is_err());
    }
}
