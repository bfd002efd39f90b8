use anyhow::Context;
use booklens_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load booklens settings")?;
    booklens_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        upstream = %settings.upstream.base_url,
        fixtures = ?settings.upstream.fixture_dir,
        "booklens bootstrap starting"
    );

    let registry = booklens_app::build_registry(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };
    registry.start_all(&ctx).await?;

    let served = booklens_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    tracing::info!("booklens shut down");
    served
}
