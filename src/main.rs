// Main entry point - CLI dispatch and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use dialoguer::Confirm;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_manager::DashboardManager;
use crate::infrastructure::config_store::{
    ConfigStore, DEFAULT_DASHBOARD_DESCRIPTION, DEFAULT_DASHBOARD_NAME,
};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers;

fn cli() -> Command {
    Command::new("navspec")
        .about("navspec - A declarative navigation dashboard")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Serve the dashboard")
                .arg(config_arg(
                    "Path to configuration directory (looks for a config/ subfolder)",
                ))
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .value_name("N")
                        .value_parser(clap::value_parser!(u16))
                        .default_value("7777")
                        .help("Port to serve on"),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("H")
                        .default_value("127.0.0.1")
                        .help("Host to bind to"),
                )
                .arg(
                    Arg::new("no-reload")
                        .long("no-reload")
                        .action(ArgAction::SetTrue)
                        .help("Disable live reload on configuration changes"),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Initialize a new dashboard configuration")
                .arg(config_arg(
                    "Path to configuration directory (a config/ subfolder is created)",
                ))
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("N")
                        .default_value(DEFAULT_DASHBOARD_NAME)
                        .help("Dashboard name"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("D")
                        .default_value(DEFAULT_DASHBOARD_DESCRIPTION)
                        .help("Dashboard description"),
                ),
        )
}

fn config_arg(help: &str) -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("PATH")
        .default_value(".")
        .help(help.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("serve", args)) => serve(args).await,
        Some(("init", args)) => init(args),
        _ => unreachable!("subcommand is required"),
    }
}

async fn serve(args: &ArgMatches) -> Result<()> {
    let config_path = PathBuf::from(args.get_one::<String>("config").unwrap()); // safe, has default
    let config_path = config_path.canonicalize().with_context(|| {
        format!(
            "configuration path does not exist: {}",
            config_path.display()
        )
    })?;
    let port = *args.get_one::<u16>("port").unwrap();
    let host = args.get_one::<String>("host").unwrap();
    let watch = !args.get_flag("no-reload");

    let manager = DashboardManager::new(&config_path, watch)?;
    tracing::info!("configuration path: {}", config_path.display());
    if manager.config_dir() != config_path {
        tracing::info!("loading configs from: {}", manager.config_dir().display());
    } else {
        tracing::info!(
            "loading configs from: {} (create a config/ folder to organize multiple dashboards)",
            manager.config_dir().display()
        );
    }

    // surface watcher notifications; a later version may also invalidate a cache here
    if let Some(mut changes) = manager.subscribe_changes() {
        tokio::spawn(async move {
            while let Ok(change) = changes.recv().await {
                tracing::info!("configuration file changed: {}", change.path.display());
            }
        });
    }

    let state = Arc::new(AppState { manager });
    let router = handlers::router(state.clone()).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;
    tracing::info!("server: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.manager.shutdown();
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}

fn init(args: &ArgMatches) -> Result<()> {
    let config_path = PathBuf::from(args.get_one::<String>("config").unwrap()); // safe, has default
    let name = args.get_one::<String>("name").unwrap();
    let description = args.get_one::<String>("description").unwrap();

    let config_subdir = config_path.join("config");
    if config_subdir.exists() {
        println!(
            "Using existing configuration directory: {}",
            config_subdir.display()
        );
    } else {
        println!(
            "Creating configuration directory: {}",
            config_subdir.display()
        );
        fs::create_dir_all(&config_subdir).with_context(|| {
            format!(
                "failed to create configuration directory {}",
                config_subdir.display()
            )
        })?;
    }

    let store = ConfigStore::new(&config_path);
    let existing = store.existing_configs()?;
    if !existing.is_empty() {
        println!("Found existing configurations: {}", existing.join(", "));
        let overwrite = Confirm::new()
            .with_prompt("Do you want to overwrite?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Initialization cancelled.");
            return Ok(());
        }
    }

    store.create_default_with(name, description)?;
    println!("Dashboard initialized successfully!");
    println!(
        "Configuration files created in: {}",
        store.config_dir().display()
    );
    println!("Run 'navspec serve' to start the dashboard");
    println!("Add more dashboards by creating new YAML files in the config/ folder");
    Ok(())
}
