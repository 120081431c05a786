use std::sync::Arc;

use robswebhub::{
    build_router,
    config::get_configuration,
    scores::{InMemoryMatchRepository, MatchRepository, PostgresMatchRepository},
    AppState, Settings,
};
use secrecy::ExposeSecret;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Uptime probes, not worth a trace each
const IGNORED_TRANSACTION: &str = "HEAD /";

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.telemetry.sentry_dsn.as_ref()?;
    if !settings.telemetry.sentry_enabled() {
        return None;
    }

    let guard = sentry::init((
        dsn.expose_secret(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(settings.application.environment.as_ref().to_string().into()),
            traces_sample_rate: 1.0,
            before_send_transaction: Some(Arc::new(
                |transaction: sentry::protocol::Transaction<'static>| {
                    (transaction.name.as_deref() != Some(IGNORED_TRANSACTION))
                        .then_some(transaction)
                },
            )),
            ..Default::default()
        },
    ));
    info!("Started Sentry");
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "robswebhub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = get_configuration()?;
    // Flushes pending events when dropped at shutdown
    let _sentry = init_sentry(&settings);
    info!(
        environment = settings.application.environment.as_ref(),
        "Starting robswebhub"
    );

    let match_repository: Arc<dyn MatchRepository> = match &settings.database.connection_string {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url.expose_secret()).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Connected to PostgreSQL, migrations applied");
            Arc::new(PostgresMatchRepository::new(pool))
        }
        None => {
            warn!("No database configured, scores are kept in memory only");
            Arc::new(InMemoryMatchRepository::new())
        }
    };

    // The authorization-code exchange is not wired in; /callback answers 503
    let app_state = AppState::new(match_repository, None, settings.clone());
    let app = build_router(app_state);

    let address = settings.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
