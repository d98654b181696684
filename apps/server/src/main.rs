use onboarding_server::{api::app_router, build_state, config::Config, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let state = build_state(&config).await?;
    let router = app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Onboarding server listening on {}", config.listen_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
