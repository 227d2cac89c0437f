use std::path::PathBuf;
use std::sync::Arc;

use starsync::{
    default_config_path, init_logging, load_records, AlignmentConfig, AppEvent, EventBus,
    EventCategory, EventFilter, MappingEngine, NotificationLevel, BUILD_DATE, VERSION,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// Telemetry retained for the report output
const TELEMETRY_HISTORY: usize = 256;

/// Usage: starsync [CONFIG] [RECORDS]
///
/// Loads the alignment configuration (default: the platform config file),
/// optionally a JSON file of calibration records, and prints the model
/// report together with the telemetry it produced as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("StarSync {} (built {})", VERSION, BUILD_DATE);

    let mut args = std::env::args().skip(1);
    let config_path = match args.next() {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };

    let config = if config_path.exists() {
        AlignmentConfig::load_from_file(&config_path)?
    } else {
        info!("No config at {}, using defaults", config_path.display());
        AlignmentConfig::default()
    };

    let bus = Arc::new(EventBus::with_history(TELEMETRY_HISTORY));
    let mut receiver = bus.receiver();
    let logger = tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.category() != EventCategory::Notification => {
                    info!("{}", event.description())
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Telemetry log skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Notification]),
        |event: AppEvent| match &event {
            AppEvent::Notification(n)
                if matches!(n.level, NotificationLevel::Warning | NotificationLevel::Error) =>
            {
                warn!("{}", n.message)
            }
            _ => info!("{}", event.description()),
        },
    );

    let engine = MappingEngine::with_bus(config, bus.clone())?;
    if let Some(path) = args.next() {
        let records = load_records(&PathBuf::from(path))?;
        engine.load_all(&records)?;
    }

    let output = serde_json::json!({
        "report": engine.report(),
        "telemetry": bus.history(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    drop(engine);
    drop(bus);
    logger.await?;
    Ok(())
}
