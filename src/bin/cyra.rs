//! Cyra CLI Binary
//!
//! Command-line front end over a sample application schema: generates the
//! config file, shows the effective values, edits single values and prints
//! the documented config as Markdown.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cyra::docs::render_markdown;
use cyra::logging::{init_logging, LoggingConfig, LoggingKeys};
use cyra::{Builder, Config};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

/// Cyra CLI - declarative TOML configuration
#[derive(Parser)]
#[command(name = "cyra")]
#[command(about = "Generate, inspect and edit a documented TOML config file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(long, default_value = "cyra.toml")]
    file: PathBuf,

    /// Prefix of environment overrides (PREFIX_SECTION__KEY)
    #[arg(long, default_value = "CYRA")]
    env_prefix: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config file or add entries it is missing
    Init,
    /// Print the effective config, including environment overrides
    Show,
    /// Assign one value and save the file
    Set {
        /// Dot-joined value path, e.g. DATABASE.port
        path: String,
        /// TOML value; bare words are taken as strings
        value: String,
    },
    /// Print the documented config as Markdown
    Docs,
}

const DEFAULT_DICT: &str = r#"
key1 = "V1"
key2 = "V2"
key3 = "V3"

[keyA]
keyA1 = "VA1"
keyA2 = "VA2"

[keyB]
keyB1 = "VB1"
keyB2 = "VB2"
"#;

fn define_server(
    builder: &mut Builder,
    name: &str,
    ip: &str,
    enable: bool,
    priority: i64,
    users: &[&str],
) -> Result<()> {
    builder.push(name)?;
    builder.comment("Server IP address").define("ip", ip.to_string())?;
    builder
        .comment("Set to false to disable server access")
        .define("enable", enable)?;
    builder
        .comment("Server priority")
        .define_validated("priority", priority, |p: &i64| *p > 0)?;
    builder
        .comment("Users to be handled")
        .define("users", users.iter().map(|u| u.to_string()).collect::<Vec<_>>())?;
    builder.pop_one()?;
    Ok(())
}

/// Declare the sample schema; returns the handles the binary reads itself
fn declare(builder: &mut Builder) -> Result<LoggingKeys> {
    builder
        .docstring("Specify your welcome message here")
        .comment("Cyra says hello")
        .define("msg", "Hello World".to_string())?;

    builder
        .docstring(
            "
            Configure your **database** here.

            Keep your credentials secret!
            ",
        )
        .comment("SQL Database settings")
        .push("DATABASE")?;
    builder
        .comment("DB server address")
        .define("server", "192.168.1.1".to_string())?;
    builder
        .comment("SQL port (default: 1443)")
        .define_validated("port", 1443_i64, |p: &i64| (1..=65535).contains(p))?;
    builder
        .comment("Credentials")
        .define("username", "admin".to_string())?;
    builder.define("password", "my_secret_password".to_string())?;
    builder
        .comment("DB connection enabled")
        .define("enabled", true)?;
    builder.pop_one()?;

    builder
        .docstring(
            "
            Here you can add all the servers you want to observe.

            **Example:**

            - alpha
            - beta
            ",
        )
        .comment("Servers to be monitored")
        .push("SERVERS")?;
    define_server(builder, "alpha", "10.0.0.1", true, 1, &["ThetaDev", "Clary"])?;
    define_server(builder, "beta", "10.0.0.2", false, 2, &["ThetaDev"])?;
    builder.pop_one()?;

    let default_dict: toml::Table = DEFAULT_DICT.parse().context("Invalid default dictionary")?;
    builder
        .docstring("You can have arbitrary dictionaries as config options, too.")
        .comment("Arbitrary dictionary")
        .define("DICT", default_dict)?;

    Ok(LoggingKeys::define(builder)?)
}

/// Parse a command-line value as TOML, falling back to a plain string
fn parse_value(raw: &str) -> toml::Value {
    format!("value = {}", raw)
        .parse::<toml::Table>()
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

fn run(cli: &Cli, config: &mut Config, defaults: &Config) -> Result<String> {
    match &cli.command {
        Commands::Init => Ok(format!("Config file ready at {}", cli.file.display())),
        Commands::Show => Ok(config.export_document()?),
        Commands::Set { path, value } => {
            config
                .set_value(path, parse_value(value))
                .with_context(|| format!("Cannot set `{}`", path))?;
            config.save_file(&cli.file)?;
            Ok(format!("{} = {}", path, config.value(path)?))
        }
        Commands::Docs => {
            let blocks = defaults.doc_blocks()?;
            info!(blocks = blocks.len(), "Rendered documentation");
            Ok(render_markdown(&blocks))
        }
    }
}

/// Load the file and, for read-only commands, environment overrides
fn load(cli: &Cli, config: &mut Config) -> Result<usize> {
    let writeback = matches!(cli.command, Commands::Init);
    config
        .load_file(&cli.file, writeback)
        .with_context(|| format!("Cannot load {}", cli.file.display()))?;

    match cli.command {
        Commands::Show | Commands::Docs => Ok(config.load_env(&cli.env_prefix)?),
        Commands::Init | Commands::Set { .. } => Ok(0),
    }
}

fn main() {
    let cli = Cli::parse();

    let mut builder = Builder::new();
    let logging_keys = match declare(&mut builder) {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("Invalid config schema: {:#}", e);
            process::exit(1);
        }
    };
    let defaults = builder.build();
    let mut config = builder.build();

    let loaded = load(&cli, &mut config);

    let mut logging = LoggingConfig::from_config(&config, &logging_keys).unwrap_or_default();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    match loaded {
        Ok(applied) => info!(applied, path = %cli.file.display(), "Config loaded"),
        Err(e) => {
            error!("Loading failed: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }

    match run(&cli, &mut config, &defaults) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("{:#}", e);
            process::exit(1);
        }
    }
}
