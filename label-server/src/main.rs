use label_server::{AppState, Config, build_app, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    tracing::info!("Return label server starting...");

    // 2. Load configuration
    let config = Config::from_env();
    let addr = format!("0.0.0.0:{}", config.http_port);

    // 3. Initialize application state
    let state = AppState::initialize(config);

    // 4. Serve
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
