use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use cupid_score::config::Settings;
use cupid_score::core::{Analyzer, FallbackAnalyzer, HeuristicAnalyzer, HeuristicScorer};
use cupid_score::routes::{self, analysis::AppState};
use cupid_score::services::{ClaudeClient, ClaudeError, RemoteModelAnalyzer};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Cupid Score analysis service...");

    let tables = settings.scoring.keyword_tables().map_err(|e| {
        error!("Failed to load keyword tables: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    let scorer = Arc::new(HeuristicScorer::new(tables, settings.scoring.params()));
    info!("Heuristic scorer initialized with {:?}", scorer.params());

    // Remote model is optional - the heuristic covers every failure
    let primary: Option<Arc<dyn Analyzer>> = match ClaudeClient::new(&settings.claude) {
        Ok(client) => {
            info!("Claude analyzer initialized (model: {})", client.model());
            Some(Arc::new(RemoteModelAnalyzer::new(client)))
        }
        Err(ClaudeError::MissingApiKey) => {
            warn!("No Claude API key configured, running heuristic-only");
            None
        }
        Err(e) => {
            error!("Failed to create Claude client ({}), running heuristic-only", e);
            None
        }
    };

    let analyzer = Arc::new(FallbackAnalyzer::new(
        primary,
        HeuristicAnalyzer::new(scorer.clone()),
    ));

    let app_state = AppState {
        analyzer,
        scorer,
        upload: settings.upload.clone(),
    };

    let json_limit = settings.upload.json_limit();
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config(json_limit))
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
