use thiserror::Error;

/// Reasons a submission is refused before any request is made.
///
/// Generation failures never appear here: they are appended to the
/// conversation as assistant text, so the chat log is the only error
/// channel the user sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// No API key is configured; the log is left untouched and no
    /// network call is attempted.
    #[error("Gemini API key is missing")]
    MissingApiKey,

    /// A previous exchange is still waiting on the API.
    #[error("a request is already in flight")]
    Busy,
}
