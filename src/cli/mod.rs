//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::config::EliminationOrder;
use crate::{Config, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Draw finite automata and derive their regular expressions
#[derive(Parser, Debug)]
#[command(name = "automata-re")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "AUTOMATA_RE_CONFIG")]
    pub config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive editor
    Edit {
        /// Definition file to start from
        #[arg(short, long)]
        load: Option<PathBuf>,
    },

    /// Print the equation system of an automaton
    Equations {
        /// Definition file (TOML or JSON)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Derive a regular expression by state elimination
    Derive {
        /// Definition file (TOML or JSON)
        file: PathBuf,

        /// Elimination order (overrides config)
        #[arg(long, value_enum)]
        order: Option<EliminationOrder>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Also print every elimination step
        #[arg(long)]
        steps: bool,
    },

    /// Run a word through the automaton and its derived expression
    Check {
        /// Definition file (TOML or JSON)
        file: PathBuf,

        /// Symbols separated by spaces or commas, or a string of one-letter symbols
        #[arg(short, long, allow_hyphen_values = true)]
        word: String,
    },

    /// Print the automaton in Graphviz DOT format
    Dot {
        /// Definition file (TOML or JSON)
        file: PathBuf,
    },

    /// Validate a definition file
    Validate {
        /// Definition file (TOML or JSON)
        file: PathBuf,
    },
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
}

impl Cli {
    /// Effective log level: `-v` flags win over the configured level.
    ///
    /// The editor owns the terminal, so without a log file it logs nothing.
    pub fn log_level(&self, config: &Config) -> String {
        match self.verbose {
            0 if matches!(self.command, Commands::Edit { .. })
                && config.logging.file.is_none() =>
            {
                "off".to_string()
            }
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    let stdout = || std::io::stdout().lock();
    match args.command {
        Commands::Edit { load } => commands::edit::execute(load, &config),
        Commands::Equations { file, output } => {
            commands::equations::execute(&mut stdout(), &file, output, &config)
        }
        Commands::Derive {
            file,
            order,
            output,
            steps,
        } => commands::derive::execute(
            &mut stdout(),
            &file,
            order.unwrap_or(config.derive.order),
            output,
            steps,
            &config,
        ),
        Commands::Check { file, word } => {
            commands::check::execute(&mut stdout(), &file, &word, &config)
        }
        Commands::Dot { file } => commands::dot::execute(&mut stdout(), &file, &config),
        Commands::Validate { file } => commands::validate::execute(&mut stdout(), &file, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "automata-re",
            "derive",
            "dfa.toml",
            "--order",
            "sequential",
            "--output",
            "json",
            "--steps",
        ])
        .unwrap();

        match cli.command {
            Commands::Derive {
                file,
                order,
                output,
                steps,
            } => {
                assert_eq!(file, PathBuf::from("dfa.toml"));
                assert_eq!(order, Some(EliminationOrder::Sequential));
                assert_eq!(output, OutputFormat::Json);
                assert!(steps);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_edit_without_file() {
        let cli = Cli::try_parse_from(["automata-re", "edit"]).unwrap();
        assert!(matches!(cli.command, Commands::Edit { load: None }));
    }

    #[test]
    fn test_check_requires_word() {
        assert!(Cli::try_parse_from(["automata-re", "check", "dfa.toml"]).is_err());
        let cli =
            Cli::try_parse_from(["automata-re", "check", "dfa.toml", "--word", "a b"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { word, .. } if word == "a b"));
    }

    #[test]
    fn test_unknown_order_rejected() {
        let result = Cli::try_parse_from(["automata-re", "derive", "dfa.toml", "--order", "random"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();

        let cli = Cli::try_parse_from(["automata-re", "dot", "dfa.toml"]).unwrap();
        assert_eq!(cli.log_level(&config), "info");

        let cli = Cli::try_parse_from(["automata-re", "-vv", "dot", "dfa.toml"]).unwrap();
        assert_eq!(cli.log_level(&config), "trace");

        let cli = Cli::try_parse_from(["automata-re", "edit"]).unwrap();
        assert_eq!(cli.log_level(&config), "off");

        config.logging.file = Some(PathBuf::from("automata-re.log"));
        assert_eq!(cli.log_level(&config), "info");
    }
}
