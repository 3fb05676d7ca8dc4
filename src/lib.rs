pub mod catalog;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod leads;
pub mod models;
pub mod openapi;
pub mod schedule;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{
    get_branch, get_schedule, get_schedule_ical, healthz_live, healthz_ready, list_branches,
    list_training_types, root, submit_lead,
};
use http::{HeaderValue, Method};
use tower_http::LatencyUnit;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::Catalog;
use crate::ical::ICalExporter;
use crate::leads::LeadDesk;
use crate::openapi::ApiDoc;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub(crate) settings: Settings,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) exporter: Arc<ICalExporter>,
    pub(crate) leads: Arc<LeadDesk>,
}

impl AppState {
    pub fn new(settings: Settings, catalog: Catalog) -> Result<Self, config::ConfigError> {
        let timezone = settings.studio_timezone()?;
        let delay = Duration::from_millis(settings.lead_submit_delay_ms);
        Ok(Self {
            settings,
            catalog: Arc::new(catalog),
            exporter: Arc::new(ICalExporter::new(timezone)),
            leads: Arc::new(LeadDesk::new(delay)),
        })
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let catalog = Catalog::load(settings.catalog_path.as_deref())?;
    info!(
        "Catalog ready: {} classes across {} branches",
        catalog.classes.len(),
        catalog.branches.len()
    );
    let state = AppState::new(settings, catalog)?;

    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting Studio Timetable API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origin(state.settings.cors_origin.as_deref()));

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/branches", get(list_branches))
        .route("/branches/{branch}", get(get_branch))
        .route("/training-types", get(list_training_types))
        .route("/schedule", get(get_schedule))
        .route("/schedule.ical", get(get_schedule_ical))
        .route("/leads", post(submit_lead))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(cors_layer).layer(trace_layer)
}

fn allowed_origin(origin: Option<&str>) -> AllowOrigin {
    match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(err)) => {
            warn!("Ignoring invalid CORS origin: {err}");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    }
}
