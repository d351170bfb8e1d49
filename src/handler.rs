use std::path::PathBuf;

use chrono::Utc;
use serde::Deserialize;

use crate::client::submit_sighting;
use crate::config::{resolve_api_url, resolve_proxy};
use crate::core::error::SubmitError;
use crate::core::form::{parse_form, API_KEY, PROXY_PASS};
use crate::core::response::HandlerResponse;
use crate::core::sighting::SightingDocument;

pub const CREDS_NOT_FOUND: &str = "Credentials not found.";
pub const URL_NOT_CONFIGURED: &str = "API URL not configured.";
pub const COULD_NOT_CREATE_SIGHTING: &str = "Could not create the sighting.";

/// Where the two platform-owned stores live. Read fresh on every request,
/// never written by this component.
#[derive(Debug, Clone)]
pub struct ConfPaths {
    pub accounts: PathBuf,
    pub settings: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    form: Vec<(String, String)>,
}

/// Run one sighting submission cycle: envelope -> form -> config -> document
/// -> outbound call. Every failure is converted into a normalized response;
/// nothing propagates past this function.
pub async fn handle(in_string: &str, paths: &ConfPaths) -> HandlerResponse {
    tracing::info!("Request received.");

    let envelope: RequestEnvelope = match serde_json::from_str(in_string) {
        Ok(envelope) => envelope,
        Err(err) => {
            let err = SubmitError::Envelope(err.to_string());
            tracing::error!(error = %err, "rejecting request");
            return HandlerResponse::new(400, err.to_string());
        }
    };
    let form = parse_form(envelope.form);

    let Some(api_key) = form.get(API_KEY).filter(|key| !key.is_empty()) else {
        let err = SubmitError::ConfigMissing("api credential");
        tracing::error!(error = %err, "rejecting request");
        return HandlerResponse::new(401, CREDS_NOT_FOUND);
    };

    let Some(api_url) = resolve_api_url(&paths.accounts) else {
        let err = SubmitError::ConfigMissing("account url");
        tracing::error!(error = %err, path = %paths.accounts.display(), "rejecting request");
        return HandlerResponse::new(500, URL_NOT_CONFIGURED);
    };

    let proxy = resolve_proxy(&paths.settings).map(|mut proxy| {
        proxy.proxy_password = form.get(PROXY_PASS).cloned().unwrap_or_default();
        proxy
    });

    let sighting = match SightingDocument::build(&form, Utc::now()) {
        Ok(sighting) => sighting,
        Err(err) => {
            tracing::error!(error = %err, "rejecting request");
            return HandlerResponse::new(400, err.to_string());
        }
    };

    match submit_sighting(&api_url, api_key, proxy.as_ref(), &sighting).await {
        Ok(outcome) => HandlerResponse::new(outcome.status, outcome.message),
        Err(SubmitError::Remote { status, .. }) => {
            HandlerResponse::new(status, COULD_NOT_CREATE_SIGHTING)
        }
        Err(err) => HandlerResponse::new(500, err.to_string()),
    }
}
