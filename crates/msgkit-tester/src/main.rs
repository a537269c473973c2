//! msgkit Tester
//!
//! Command-line tool that exercises the msgkit logger and process runner

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use msgkit_core::{LoggerConfig, MsgLogger};

mod commands;

/// Template used unless the config file or `--template` says otherwise
const TESTER_TEMPLATE: &str = "%pkg %(-27)time %(-7)type %file %line - %msg";
const TESTER_NAME: &str = "Tester";

#[derive(Debug, Parser)]
#[command(name = "msgkit-tester")]
#[command(about = "Verify that the msgkit logger and runner work as expected", long_about = None)]
struct Cli {
    /// Message template, e.g. "%pkg %(-7)type %msg"
    #[arg(long, global = true)]
    template: Option<String>,

    /// strftime pattern for %time and %utc
    #[arg(long, global = true)]
    time_format: Option<String>,

    /// Logger config file (defaults to ~/.config/msgkit/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Exercise every logger operation and the runner (default)
    Selftest,
    /// Print numbered lines of a fixed width
    Genout(commands::genout::GenoutArgs),
    /// Log an error and exit
    Fatal(commands::fatal::FatalArgs),
    /// Run a command and report its output size and exit code
    Run(commands::run::RunArgs),
}

fn build_logger(cli: &Cli) -> Result<MsgLogger, Box<dyn std::error::Error>> {
    let path = cli.config.clone().unwrap_or_else(LoggerConfig::user_path);
    let base = if path.exists() {
        LoggerConfig::from_file(&path)?
    } else {
        LoggerConfig {
            name: TESTER_NAME.to_string(),
            template: TESTER_TEMPLATE.to_string(),
            ..LoggerConfig::default()
        }
    };
    let mut config = base.with_env()?;
    if let Some(template) = &cli.template {
        config.template = template.clone();
    }
    if let Some(time_format) = &cli.time_format {
        config.time_format = time_format.clone();
    }
    Ok(MsgLogger::from_config(&config, Vec::new())?)
}

fn main() {
    let cli = Cli::parse();

    let mut logger = match build_logger(&cli) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Selftest) {
        Commands::Selftest => commands::selftest::execute(&mut logger),
        Commands::Genout(args) => commands::genout::execute(args),
        Commands::Fatal(args) => commands::fatal::execute(args, &mut logger),
        Commands::Run(args) => commands::run::execute(args, &logger),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
