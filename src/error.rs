/// Error types for backend interaction.
///
/// Three kinds cover every failure the client distinguishes:
/// - `Validation` — a local precondition is missing; no request is issued.
/// - `Server` — the backend answered with a non-success status.
/// - `Transport` — the request never completed (network, malformed JSON).
///
/// Call sites treat `Server` and `Transport` identically; the split exists so
/// the message-send path can render either as an in-transcript bot message
/// while validation failures stay out of the transcript entirely.
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Missing local precondition (e.g. no user id before creating a
    /// conversation). Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Non-success HTTP response. `message` is the body's `error` field when
    /// present, else a generic per-operation message.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Network failure or undecodable response body.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// The string shown to the user (alert, inline error, or bot message).
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
