use ringout::application::CallPreparationService;
use ringout::config::Config;
use ringout::domain::auth_token::TokenManager;
use ringout::domain::call_log::CallLogRecorder;
use ringout::domain::dial_strategy::StrategyResolver;
use ringout::domain::integration_status::{HealthProbe, StatusReporter};
use ringout::infrastructure::persistence::InMemoryCallLog;
use ringout::infrastructure::provider::HttpHealthProbe;
use ringout::interface::api::{build_router, init_metrics, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting RingOut call preparation service");

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded: {:?}", config);

    let telephony = &config.telephony;
    let credentials = telephony.credentials();
    if !credentials.is_configured() {
        warn!(
            "Telephony credentials incomplete (missing: {}); only device dialing will be offered",
            credentials.missing().join(", ")
        );
    }

    // Token manager
    let tokens = Arc::new(
        TokenManager::new(credentials.api_key(), credentials.shared_secret()).with_lifetime(
            telephony.token_lifetime_secs,
            telephony.token_safety_margin_secs,
        ),
    );

    // Call preparation
    let resolver = StrategyResolver::new(telephony.resolver_settings());
    let call_preparation = Arc::new(CallPreparationService::new(tokens, resolver));

    // Status reporter
    let probe: Option<Arc<dyn HealthProbe>> = match telephony.health_url() {
        Some(url) => match HttpHealthProbe::with_timeout(url.clone(), telephony.probe_timeout()) {
            Ok(probe) => {
                info!("Provider health endpoint: {}", url);
                Some(Arc::new(probe) as Arc<dyn HealthProbe>)
            }
            Err(e) => {
                warn!("Provider health probe unavailable: {}", e);
                None
            }
        },
        None => {
            warn!("No provider domain configured; status checks will report Offline");
            None
        }
    };
    let status_reporter = Arc::new(
        StatusReporter::new(credentials, probe).with_timeout(telephony.probe_timeout()),
    );

    // Call log
    let call_log: Arc<dyn CallLogRecorder> = Arc::new(InMemoryCallLog::new());

    // Initialize metrics exporter
    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics()?;

    let state = AppState {
        call_preparation,
        status_reporter,
        call_log,
    };
    let app = build_router(state, prometheus_handle);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
