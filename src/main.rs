mod api;
mod badge;
mod openapi;
mod util;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use badge::Template;

pub struct AppState {
    pub template: Template,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("BACKEND_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let template_path = Template::default_path();
    let template = match Template::load(&template_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("cannot start: {e}");
            std::process::exit(1);
        }
    };
    info!(
        path = %template_path.display(),
        width = template.width(),
        height = template.height(),
        "badge template loaded"
    );

    let state = Arc::new(AppState { template });

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi::ApiDoc::openapi()))
        .route("/health", get(api::health))
        .route("/generate", post(api::generate))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}").parse().expect("bind addr");
    info!("Starting crachagen-backend on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
