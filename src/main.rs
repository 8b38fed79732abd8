//! Scheme Gateway - HTTP API for government welfare scheme discovery

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scheme_gateway::{
    auth::JwtValidator,
    catalog::{store, SchemeCatalog},
    config::Args,
    db::MongoClient,
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scheme_gateway={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Scheme Gateway");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!(
        "Mode: {}",
        if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" }
    );
    info!("MongoDB: {}", args.mongodb_uri);
    info!("======================================");

    // Connect to MongoDB (optional in dev mode)
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            Some(client)
        }
        Err(e) => {
            if args.dev_mode {
                warn!(
                    "MongoDB connection failed (dev mode, continuing without): {}",
                    e
                );
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Load the catalog: from MongoDB when available, built-in seed otherwise
    let catalog = match mongo.as_ref() {
        Some(client) => match store::load_or_seed(client).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to load scheme catalog: {}", e);
                std::process::exit(1);
            }
        },
        None => SchemeCatalog::builtin(),
    };
    info!("Loaded {} schemes into the catalog", catalog.len());

    let jwt = match args.jwt_secret.clone() {
        Some(secret) => match JwtValidator::new(secret, args.jwt_expiry_seconds) {
            Ok(jwt) => jwt,
            Err(e) => {
                error!("JWT configuration error: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            warn!("No JWT secret configured, using dev mode secret");
            JwtValidator::new_dev(args.jwt_expiry_seconds)
        }
    };

    let state = Arc::new(AppState::new(args, mongo, Arc::new(catalog), jwt));

    server::run(state).await?;

    Ok(())
}
