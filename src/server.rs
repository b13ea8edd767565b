use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use lazy_static::lazy_static;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::{Context, Tera};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::WifiQrError;
use crate::form::{download_filename, DownloadForm, GenerateForm, DOWNLOAD_FILENAME};
use crate::render::QrRenderer;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = Tera::default();
        if let Err(e) = tera.add_raw_template("index.html", include_str!("../templates/index.html")) {
            tracing::error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
        tera.autoescape_on(vec![".html"]);
        tera
    };
}

pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub renderer: QrRenderer,
}

#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<QrRenderer>,
}

impl AppState {
    pub fn new(renderer: QrRenderer) -> Self {
        Self {
            renderer: Arc::new(renderer),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .route("/download", post(download_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.bind.parse()?, config.port);
    let app = router(AppState::new(config.renderer));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Result shown below the form after a successful `/generate`.
struct Generated<'a> {
    qr_data_uri: &'a str,
    payload: &'a str,
    filename: &'a str,
}

fn render_page(generated: Option<Generated<'_>>) -> Result<Html<String>, WifiQrError> {
    let mut context = Context::new();
    if let Some(g) = generated {
        context.insert("qr_data_uri", g.qr_data_uri);
        context.insert("payload", g.payload);
        context.insert("filename", g.filename);
    }

    Ok(Html(TEMPLATES.render("index.html", &context)?))
}

async fn index_handler() -> Result<Html<String>, WifiQrError> {
    render_page(None)
}

async fn generate_handler(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Response, WifiQrError> {
    let Some(credentials) = form.into_credentials() else {
        warn!("generate request without ssid, redirecting");
        return Ok(Redirect::to("/").into_response());
    };

    let payload = credentials.payload();
    let qr_data_uri = state.renderer.render_data_uri(&payload)?;
    let filename = download_filename(&credentials.ssid, Utc::now());
    info!(ssid = %credentials.ssid, auth = %credentials.auth, "generated QR code");

    let page = render_page(Some(Generated {
        qr_data_uri: &qr_data_uri,
        payload: &payload,
        filename: &filename,
    }))?;
    Ok(page.into_response())
}

async fn download_handler(
    State(state): State<AppState>,
    Form(form): Form<DownloadForm>,
) -> Result<Response, WifiQrError> {
    if form.payload.is_empty() {
        warn!("download request without payload, redirecting");
        return Ok(Redirect::to("/").into_response());
    }

    let png = state.renderer.render_png(&form.payload)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
            ),
        ],
        png,
    )
        .into_response())
}
