use chatterbox::{AppState, app, site::Site};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = dotenv::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let site_root = dotenv::var("SITE_ROOT").unwrap_or_else(|_| "site".to_owned());

    let app = app(AppState::new(Site::new(site_root)));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    tracing::info!("server running at http://localhost:{port}");
    axum::serve(listener, app).await.unwrap();
}
