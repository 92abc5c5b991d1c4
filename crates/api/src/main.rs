use medstock_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medstock_observability::init();

    let config = Config::from_env()?;
    let bind = config.bind;

    let app = medstock_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
