//! Usage: Server reachability probe run before the hosted content is shown (HEAD, GET fallback).

use std::time::{Duration, Instant};

pub(crate) const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .user_agent(format!("celyavox-probe/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("PROBE_HTTP_CLIENT_INIT: {e}"))
}

pub(crate) fn parse_server_url(server_url: &str) -> Result<reqwest::Url, String> {
    let server_url = server_url.trim();
    if server_url.is_empty() {
        return Err("SEC_INVALID_INPUT: server_url is required".to_string());
    }
    reqwest::Url::parse(server_url)
        .map_err(|e| format!("SEC_INVALID_INPUT: invalid server_url={server_url}: {e}"))
}

/// Any HTTP response counts as reachable; only transport failures are errors.
pub(crate) async fn probe_server_ms(
    client: &reqwest::Client,
    server_url: &str,
    timeout: Duration,
) -> Result<u64, String> {
    let url = parse_server_url(server_url)?;
    let started = Instant::now();

    let head_result = client.head(url.clone()).timeout(timeout).send().await;
    if head_result.is_ok() {
        return Ok(started.elapsed().as_millis() as u64);
    }

    client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| format!("PROBE_ERROR: {e}"))?;

    Ok(started.elapsed().as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_server_url_rejects_blank_and_relative() {
        assert_eq!(
            parse_server_url("   ").unwrap_err(),
            "SEC_INVALID_INPUT: server_url is required"
        );
        assert!(parse_server_url("celyavox/phone")
            .unwrap_err()
            .starts_with("SEC_INVALID_INPUT: invalid server_url=celyavox/phone"));
    }

    #[tokio::test]
    async fn unreachable_server_is_probe_error() {
        let client = reqwest::Client::new();
        // Port 9 on loopback: nothing listens there in CI sandboxes.
        let err = probe_server_ms(&client, "http://127.0.0.1:9/", Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(err.starts_with("PROBE_ERROR"));
    }
}
