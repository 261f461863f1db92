use std::sync::{Arc, Mutex};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::upload_scoring::UploadScoringUseCase;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::nlp::LinguisticResources;
use crate::infrastructure::predictors::load_predictor;
use crate::interfaces::http::{add_log, start_server, HttpState};

/// Load configuration and shared resources once, then serve until shutdown.
pub async fn run() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let resources = Arc::new(LinguisticResources::load(&config.nlp));
    let predictor = load_predictor(&config.model)?;
    info!(
        model = %predictor.describe(),
        stopwords = resources.stopword_count(),
        degraded = resources.is_degraded(),
        "Resources loaded"
    );

    let logs = Arc::new(Mutex::new(Vec::new()));
    for reason in resources.degraded_reasons() {
        add_log(&logs, "WARN", "System", reason);
    }

    let state = HttpState {
        use_case: Arc::new(UploadScoringUseCase::new(resources, predictor.clone())),
        logs: logs.clone(),
        strict_status_codes: config.server.strict_status_codes,
        max_upload_bytes: config.server.max_upload_bytes,
    };

    let (host, port) = config.bind_address();
    let server = start_server(state, (host.clone(), port))?;
    add_log(
        &logs,
        "INFO",
        "System",
        &format!(
            "Model {} loaded, HTTP server started on {}:{}",
            predictor.describe(),
            host,
            port
        ),
    );

    server.await?;
    Ok(())
}
