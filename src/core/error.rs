#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("malformed request envelope: {0}")]
    Envelope(String),
    #[error("configuration missing: {0}")]
    ConfigMissing(&'static str),
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("platform rejected the sighting: status {status}")]
    Remote { status: u16, body: String },
    #[error("unusable platform reply: {0}")]
    MalformedReply(String),
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SubmitError::Timeout
        } else if err.is_connect() {
            SubmitError::Transport(err.to_string())
        } else if err.is_decode() {
            SubmitError::MalformedReply(err.to_string())
        } else {
            SubmitError::Transport(err.to_string())
        }
    }
}
