use std::sync::Arc;

use tokio::signal;
use tokio::sync::Mutex;

use crate::domain::session::TaggingSession;

/// SIGTERM 또는 Ctrl+C를 받으면 반환
///
/// 결과는 메모리에만 있으므로 종료 시 버려지는 건수를 남깁니다.
pub async fn shutdown_signal(session: Arc<Mutex<TaggingSession>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    match session.try_lock() {
        Ok(session) => tracing::info!(
            discarded_results = session.in_session(),
            total_processed = session.total_processed(),
            "Initiating graceful shutdown, session results are not persisted"
        ),
        Err(_) => tracing::warn!("Initiating graceful shutdown while a batch is still running"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn shutdown_signal_should_wait_for_signal() {
        let session = Arc::new(Mutex::new(TaggingSession::new()));
        let result = timeout(Duration::from_millis(10), shutdown_signal(session)).await;
        assert!(result.is_err(), "shutdown_signal should wait for signal");
    }
}
