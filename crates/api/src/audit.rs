use frostpage_core::events::{ContentEvent, EventBus};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Log every content event under the `audit` target until the bus closes.
pub fn spawn_audit_log(events: &EventBus) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => record(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "audit", skipped, "audit log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn record(event: &ContentEvent) {
    let payload = serde_json::to_string(event).unwrap_or_default();
    match event {
        ContentEvent::CorruptDocument(_) => {
            tracing::warn!(target: "audit", event = %payload, "content event");
        }
        _ => tracing::info!(target: "audit", event = %payload, "content event"),
    }
}
