use std::sync::Arc;

use tracing::{info, warn};

use shopsphere_auth::mail::{HttpMailer, MemoryMailer};
use shopsphere_auth::web::WebServer;
use shopsphere_auth::{Config, Database, Mailer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = shopsphere_auth::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    info!("Shop Sphere authentication backend");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    // Without a mail API token, outgoing mail is only recorded and logged.
    let mailer: Arc<dyn Mailer> = if config.mail.api_token.is_empty() {
        warn!("No mail API token configured; outgoing mail will not be delivered");
        Arc::new(MemoryMailer::new())
    } else {
        Arc::new(HttpMailer::new(&config.mail))
    };

    let server = WebServer::new(&config, &db, mailer);
    info!(
        "Serving on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = server.run().await {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
