use openswap_api::{router, AppState};
use openswap_types::{constants, ExchangeError, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ExchangeError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openswap=info,openswap_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;
    let (state, events) = AppState::new(config.rules.clone());
    state.spawn_pump(events);

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %config.listen_addr,
        version = constants::VERSION,
        "{} listening",
        constants::ENGINE_NAME
    );
    axum::serve(listener, app).await?;
    Ok(())
}
