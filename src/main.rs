use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use nestmate_algo::config::{LoggingSettings, Settings};
use nestmate_algo::core::Ranker;
use nestmate_algo::routes::{self, matches::{AppState, ResultLimits}};
use nestmate_algo::services::{CachedPoolSource, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

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
            .json(self)
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

/// Initialize logging; RUST_LOG takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging);

    info!("Starting Nestmate Algo matching service...");

    // Weight table is fixed for the life of the process
    let weights = match settings.field_weights() {
        Ok(weights) => weights,
        Err(e) => {
            error!("Invalid weight configuration: {}", e);
            std::process::exit(1);
        }
    };

    let ranker = Ranker::new(weights).with_parallel_threshold(settings.matching.parallel_threshold);

    info!("Ranker initialized with weights: {:?}", weights);

    let tables = SupabaseTables {
        profiles: settings.supabase.profiles_table.clone(),
        survey_answers: settings.supabase.survey_table.clone(),
    };

    let supabase = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.service_key.clone(),
        settings.supabase.schema.clone(),
        tables,
        Duration::from_secs(settings.supabase.request_timeout_secs.unwrap_or(30)),
    )
    .map_err(|e| {
        error!("Failed to create Supabase client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Supabase client initialized");

    let pool_ttl = settings.cache.pool_ttl_secs.unwrap_or(60);
    let pool_cache_size = settings.cache.pool_cache_size.unwrap_or(1000);

    let answers_source = Arc::new(supabase.clone());
    let pool_source = Arc::new(CachedPoolSource::new(supabase, pool_cache_size, pool_ttl));

    info!("Candidate pool cache initialized ({} entries, TTL: {}s)", pool_cache_size, pool_ttl);

    let app_state = AppState {
        pool_source,
        answers_source,
        ranker,
        limits: ResultLimits {
            default_limit: settings.matching.default_limit,
            max_limit: settings.matching.max_limit,
            default_sort: settings.matching.default_sort,
        },
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
