use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use memora_recs::config::{LoggingSettings, Settings};
use memora_recs::core::Recommender;
use memora_recs::routes::{self, handle_json_payload_error, AppState};
use memora_recs::services::{
    Catalog, OpenAiEmbeddings, RecommendationService, SupabaseClient,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            return Err(startup_error("Failed to load configuration", e));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Memora recommendation service...");

    // Load the experience catalog once; it is read-only from here on
    let reference = settings.catalog.reference_point();
    let catalog = match &settings.catalog.path {
        Some(path) => Catalog::load_from(path, reference),
        None => Catalog::builtin(reference),
    }
    .map_err(|e| startup_error("Failed to load experience catalog", e))?;

    info!("Catalog loaded with {} experiences", catalog.len());

    let supabase = Arc::new(
        SupabaseClient::new(
            settings.supabase.url.clone(),
            settings.supabase.service_role_key.clone(),
            settings.supabase.tables(),
            settings.supabase.timeout(),
        )
        .map_err(|e| startup_error("Failed to create Supabase client", e))?,
    );

    info!("Supabase client initialized");

    let embeddings = Arc::new(
        OpenAiEmbeddings::new(
            settings.embedding.endpoint.clone(),
            settings.embedding.api_key.clone(),
            settings.embedding.model.clone(),
            settings.embedding.limits().timeout,
        )
        .map_err(|e| startup_error("Failed to create embedding client", e))?,
    );

    info!(
        "Embedding client initialized (model: {}, max in flight: {})",
        settings.embedding.model, settings.embedding.max_in_flight
    );

    let recommender = Recommender::new(
        (&settings.scoring).into(),
        (&settings.selection).into(),
    );

    info!(
        "Recommender initialized with weights: {:?}, limits: {:?}",
        recommender.weights(),
        recommender.limits()
    );

    let service = Arc::new(RecommendationService::new(
        Arc::new(catalog),
        supabase.clone(),
        supabase,
        embeddings,
        recommender,
        settings.embedding.limits(),
    ));

    let app_state = AppState { service };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
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
