//! This module handles the initial setup of the application.
use std::path::Path;

use anyhow::{Context, Result};

use super::args::AppArgs;
use crate::config::{AppConfig, ServerConfig};
use crate::logging;

/// Everything `client::run` needs.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    /// The loaded configuration, with `--server` merged in.
    pub config: AppConfig,
    /// The database instance.
    pub db: sled::Db,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Configures logging.
/// 2. Creates the data directory.
/// 3. Loads the configuration, from `--config` or `<data-dir>/config.json`.
/// 4. Opens the database.
///
/// # Errors
///
/// This function will return an error if any of the setup steps fail.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    logging::init(args.verbose);
    print_start_banner(&args);

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create data directory {}", args.data_dir))?;

    let mut config = load_config(&args)?;
    merge_server_arg(&mut config, args.server.as_deref());

    let db_path = format!("{}/db", args.data_dir);
    let db = sled::open(&db_path).with_context(|| format!("Failed to open {}", db_path))?;

    Ok(PreparedApp { args, config, db })
}

fn load_config(args: &AppArgs) -> Result<AppConfig> {
    if let Some(path) = &args.config {
        return AppConfig::load(path);
    }

    let default_path = format!("{}/config.json", args.data_dir);
    if Path::new(&default_path).exists() {
        AppConfig::load(&default_path)
    } else {
        let mut config = AppConfig::default();
        config.apply_env_token(std::env::var(crate::config::TOKEN_ENV).ok());
        Ok(config)
    }
}

/// Makes `--server` the active server, adding it if the config doesn't list it.
fn merge_server_arg(config: &mut AppConfig, server: Option<&str>) {
    let Some(server) = server else {
        return;
    };

    if config.server(server).is_none() {
        config.servers.push(ServerConfig {
            url: server.to_string(),
            token: std::env::var(crate::config::TOKEN_ENV).ok(),
            ..ServerConfig::default()
        });
    }
    config.active_server = Some(server.to_string());
}

/// Prints a banner with startup information.
fn print_start_banner(args: &AppArgs) {
    println!("🚀 Starting chat-commands");
    println!("Data directory: {}", args.data_dir);
    if let Some(config) = &args.config {
        println!("Config: {}", config);
    }
    println!();
}
