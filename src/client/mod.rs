use std::time::Duration;

use crate::config::ProxyConfig;
use crate::core::error::SubmitError;
use crate::core::sighting::SightingDocument;

/// Single-attempt budget for the outbound call; there is no retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

const USER_AGENT: &str = concat!("sightline/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub status: u16,
    pub message: String,
}

/// POST the sighting to `<base_url>/entities` with bearer auth. TLS
/// verification stays on unconditionally. The client is built fresh per
/// request since the proxy credentials arrive with the form.
pub async fn submit_sighting(
    base_url: &str,
    api_key: &str,
    proxy: Option<&ProxyConfig>,
    sighting: &SightingDocument,
) -> Result<SubmissionOutcome, SubmitError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT);
    if let Some(proxy) = proxy.filter(|p| p.enabled()) {
        let proxy = reqwest::Proxy::all(proxy.uri())
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        builder = builder.proxy(proxy);
    }
    let client = builder.build()?;

    let endpoint = format!("{base_url}/entities");
    let response = client
        .post(endpoint.as_str())
        .bearer_auth(api_key)
        .json(sighting)
        .send()
        .await
        .map_err(|err| {
            tracing::error!(error = %err, endpoint = %endpoint, "sighting submission failed");
            SubmitError::from(err)
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            tracing::error!(
                critical = true,
                status = status.as_u16(),
                body = %body,
                "platform rejected the sighting"
            );
        } else {
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "platform rejected the sighting"
            );
        }
        return Err(SubmitError::Remote {
            status: status.as_u16(),
            body,
        });
    }

    let reply: serde_json::Value = response
        .json()
        .await
        .map_err(|err| SubmitError::MalformedReply(err.to_string()))?;
    let id = entity_id(&reply)?;
    let message = format!("Sighting created: {base_url}/{id}");
    tracing::info!("{message}");
    Ok(SubmissionOutcome {
        status: status.as_u16(),
        message,
    })
}

fn entity_id(reply: &serde_json::Value) -> Result<String, SubmitError> {
    match reply.pointer("/data/id") {
        Some(serde_json::Value::String(id)) => Ok(id.clone()),
        Some(other) if !other.is_null() => Ok(other.to_string()),
        _ => Err(SubmitError::MalformedReply(
            "reply carries no data.id".to_string(),
        )),
    }
}
