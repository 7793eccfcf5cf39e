use std::sync::Arc;

use tracing::error;

use chatguard_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), chatguard_core::Error> {
    chatguard_core::logging::init("chatguard")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return Err(e);
        }
    };

    chatguard_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| chatguard_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
