use std::sync::Arc;

use colored::Colorize;
use config::{Config, ConfigError, StoreKind};
use lettings_core::{DatabaseError, Lettings, MemoryDatabase, MongoDatabase, SharedDatabase};
use log::{error, info, warn, LevelFilter};
use thiserror::Error;

mod config;
mod logging;

#[derive(Debug, Error)]
enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not connect to database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server stopped unexpectedly: {0}")]
    Server(#[from] std::io::Error),
}

impl AppError {
    fn hint(&self) -> String {
        match self {
            AppError::Config(_) => "Check the LETTINGS_* variables in your environment or .env file.".to_string(),
            AppError::Database(_) => "This is a database error. Make sure MongoDB is running and LETTINGS_DATABASE_URL points to it, or set LETTINGS_STORE=memory to run without it.".to_string(),
            AppError::Server(_) => "Make sure LETTINGS_SERVER_PORT is not already in use.".to_string(),
        }
    }
}

struct App {
    config: Config,
    lettings: Arc<Lettings>,
}

impl App {
    async fn new(config: Config) -> Result<Self, AppError> {
        let database: SharedDatabase = match config.store {
            StoreKind::Mongo => {
                info!("Connecting to database {}...", config.database_name);
                Arc::new(MongoDatabase::connect(&config.database_url, &config.database_name).await?)
            }
            StoreKind::Memory => {
                warn!("Using the in-memory store, nothing will be kept after shutdown");
                Arc::new(MemoryDatabase::new())
            }
        };

        Ok(Self {
            config,
            lettings: Arc::new(Lettings::new(database)),
        })
    }

    async fn run(self) -> Result<(), AppError> {
        info!(
            "Starting server on port {} with the {} store",
            self.config.port, self.config.store
        );

        let served =
            lettings_server::run_server(self.config.port, self.lettings.clone(), shutdown_signal())
                .await;

        info!("Closing database...");
        self.lettings.close().await?;

        Ok(served?)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutting down...");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    let log_level = config.as_ref().map_or(LevelFilter::Info, |c| c.log_level);

    if let Err(e) = logging::init_logger(log_level) {
        eprintln!("Could not initialize logging: {}", e);
    }

    let app = match config {
        Ok(config) => App::new(config).await,
        Err(e) => Err(e.into()),
    };

    let result = match app {
        Ok(app) => {
            info!("Initialized successfully.");
            app.run().await
        }
        Err(e) => Err(e),
    };

    if let Err(error) = result {
        error!(
            "{} Read the error below to troubleshoot the issue.",
            "lettings failed!".bold().red()
        );
        error!("{}", error);
        error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
        std::process::exit(1);
    }
}
