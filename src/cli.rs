use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bonsai - grow, keep and age ASCII bonsai trees
#[derive(Parser, Debug)]
#[command(name = "bonsai")]
#[command(about = "Procedurally grow ASCII bonsai trees and keep them per configuration file")]
#[command(version)]
pub struct Cli {
    /// Engine configuration file (default: $BONSAI_CONFIG or ~/.bonsai/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding stored trees (overrides the config file)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Trace resolved generation options
    #[arg(long, global = true)]
    pub debug: bool,

    /// Derive the default season for the southern hemisphere
    #[arg(long, global = true)]
    pub southern: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grow a new tree and print it
    Generate {
        /// Style (formal, informal, slanting, cascade)
        #[arg(long)]
        style: Option<String>,
        /// Season (spring, summer, fall, winter); defaults to today's season
        #[arg(long)]
        season: Option<String>,
        /// Age stage (young, mature, ancient)
        #[arg(long)]
        age: Option<String>,
        /// Seed for a replayable tree
        #[arg(long)]
        seed: Option<u64>,
        /// Fail on unknown keys instead of falling back to defaults
        #[arg(long)]
        strict: bool,
        /// Store the tree under this configuration identifier
        #[arg(long, value_name = "CONFIG_ID")]
        save: Option<String>,
        /// Overwrite an existing tree for the same identifier
        #[arg(short, long, requires = "save")]
        force: bool,
    },
    /// Print a stored tree
    Show {
        config_id: String,
    },
    /// Rotate a stored tree's style and store it back
    Age {
        config_id: String,
    },
    /// Redraw a stored tree from its own parameters
    Regrow {
        config_id: String,
    },
    /// List every stored tree
    List,
    /// Delete a stored tree
    Delete {
        config_id: String,
    },
    /// Print the storage key for a configuration identifier
    Key {
        config_id: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["bonsai"]).is_err());
    }

    #[test]
    fn test_cli_generate_all_options() {
        let cli = Cli::try_parse_from([
            "bonsai",
            "generate",
            "--style",
            "cascade",
            "--season",
            "winter",
            "--age",
            "mature",
            "--seed",
            "42",
            "--save",
            "templates/example.yml",
            "--force",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                style,
                season,
                age,
                seed,
                strict,
                save,
                force,
            } => {
                assert_eq!(style.as_deref(), Some("cascade"));
                assert_eq!(season.as_deref(), Some("winter"));
                assert_eq!(age.as_deref(), Some("mature"));
                assert_eq!(seed, Some(42));
                assert!(!strict);
                assert_eq!(save.as_deref(), Some("templates/example.yml"));
                assert!(force);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_force_requires_save() {
        assert!(Cli::try_parse_from(["bonsai", "generate", "--force"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bonsai",
            "list",
            "--store-dir",
            "/tmp/trees",
            "--debug",
            "--southern",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.store_dir.unwrap().to_str().unwrap(), "/tmp/trees");
        assert!(cli.debug);
        assert!(cli.southern);
    }

    #[test]
    fn test_cli_show_takes_config_id() {
        let cli = Cli::try_parse_from(["bonsai", "show", "site/home.yml"]).unwrap();
        match cli.command {
            Commands::Show { config_id } => assert_eq!(config_id, "site/home.yml"),
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_cli_seed_must_be_numeric() {
        assert!(Cli::try_parse_from(["bonsai", "generate", "--seed", "abc"]).is_err());
    }
}
