use votes_api::{app, AppState};
use votes_app::{AppContext, Config};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    let app_context = AppContext::from_config(&config)
        .await
        .expect("Failed to connect to database");
    let state = AppState::new(app_context).expect("Failed to load templates");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");
    tracing::info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
