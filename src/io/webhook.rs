use crate::entities::Results;
use crate::http::HttpClient;
use tracing::{info, warn};

/// Fire-and-forget delivery of the result mapping. Failures are logged and
/// never affect the scan's reported results.
pub async fn send_webhook(client: &HttpClient, url: &str, results: &Results) {
    match client.post_json(url, results).await {
        Ok(status) if (200..300).contains(&status) => {
            info!(url, "webhook delivered");
        }
        Ok(status) => {
            warn!(url, status, "webhook rejected");
        }
        Err(e) => {
            warn!(url, error = %e, "webhook delivery failed");
        }
    }
}
