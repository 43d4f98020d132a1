use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use lume_deck::config::Settings;
use lume_deck::routes::{self, decks::AppState};
use lume_deck::services::{
    DecisionSink, DeckRegistry, MatchingClient, NoopSink, ProfileSource, StaticSource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// Pick the profile source and decision sink from the matching settings
fn build_collaborators(
    settings: &Settings,
) -> std::io::Result<(Arc<dyn ProfileSource>, Arc<dyn DecisionSink>)> {
    if let Some(endpoint) = &settings.matching.endpoint {
        let client = MatchingClient::new(
            endpoint.clone(),
            Duration::from_secs(settings.matching.timeout_secs),
            settings.matching.photo_url_template.clone(),
        )
        .map_err(std::io::Error::other)?;

        info!("Using matching service at {}", endpoint);
        let client = Arc::new(client);
        let source: Arc<dyn ProfileSource> = client.clone();
        let sink: Arc<dyn DecisionSink> = client;
        return Ok((source, sink));
    }

    let source = match &settings.deck.seed_file {
        Some(path) => StaticSource::from_file(path).unwrap_or_else(|e| {
            error!("Failed to load seed file {}: {}", path, e);
            StaticSource::default()
        }),
        None => StaticSource::default(),
    };

    if source.is_empty() {
        warn!("No matching endpoint or seed profiles configured, decks will start empty");
    } else {
        info!("Serving {} seed profiles, decisions are not reported", source.len());
    }
    Ok((Arc::new(source), Arc::new(NoopSink)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Lume Deck service...");

    // LUME_CONFIG points at a single config file instead of config/
    let settings = match std::env::var("LUME_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            Settings::load_from(path)
        }
        Err(_) => Settings::load(),
    }
    .map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;

    info!("Configuration loaded successfully");

    let (source, sink) = build_collaborators(&settings)?;

    let registry = Arc::new(DeckRegistry::new(
        settings.deck.gesture.clone(),
        settings.deck.batch_size,
        settings.deck.max_sessions,
        Duration::from_secs(settings.deck.session_idle_secs),
        source,
        sink,
    ));

    info!(
        "Deck registry initialized (batch: {}, idle expiry: {}s)",
        settings.deck.batch_size, settings.deck.session_idle_secs
    );

    let app_state = AppState { registry };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
