mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use core::MatchEngine;
use models::ScoringWeights;
use routes::matches::AppState;
use services::{RemoteScorer, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Persona Match service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize Supabase client
    let tables = SupabaseTables {
        personas: settings.tables.personas,
        contacts: settings.tables.contacts,
    };

    let supabase = Arc::new(SupabaseClient::new(
        settings.supabase.url,
        settings.supabase.api_key,
        tables,
    ));

    info!("Supabase client initialized");

    // Initialize the best-effort AI scorer
    let remote = Arc::new(RemoteScorer::new(
        settings.ai.endpoint,
        settings.ai.api_key,
        settings.ai.model.clone(),
        settings.ai.max_tokens,
    ));

    info!("Remote scorer initialized (model: {})", settings.ai.model);

    // Initialize the match engine with configured weights
    let weights = ScoringWeights {
        base: settings.scoring.weights.base,
        age_overlap: settings.scoring.weights.age_overlap,
        age_exact: settings.scoring.weights.age_exact,
        keyword_floor: settings.scoring.weights.keyword_floor,
        keyword_step: settings.scoring.weights.keyword_step,
        keyword_cap: settings.scoring.weights.keyword_cap,
        channel: settings.scoring.weights.channel,
        industry: settings.scoring.weights.industry,
        pain_point: settings.scoring.weights.pain_point,
    };

    let engine = MatchEngine::new(weights);

    info!("Match engine initialized with weights: {:?}", weights);

    let default_min_score = settings.matching.min_match_score.unwrap_or(60);
    let remote_timeout =
        Duration::from_secs(settings.matching.remote_timeout_secs.unwrap_or(20));

    // Build application state
    let app_state = AppState {
        supabase,
        remote,
        engine,
        default_min_score,
        remote_timeout,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
