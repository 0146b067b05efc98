//! The exchange controller: owns the conversation log and drives one
//! request at a time.

use crate::ai::gemini::{GeminiClient, DEFAULT_TEMPERATURE};
use crate::credentials::ApiKeyStore;
use crate::error::SubmitError;
use crate::prompt;
use crate::state::ChatMessage;

/// An in-memory chat session.
///
/// The log is append-only and lives only as long as the session. A UI
/// that runs the network call as a spawned task uses [`begin`] /
/// [`complete`] around it; [`submit`] composes the two for callers that
/// can await the round trip in place.
///
/// [`begin`]: Self::begin
/// [`complete`]: Self::complete
/// [`submit`]: Self::submit
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    in_flight: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            in_flight: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True between `begin` and the matching `complete`.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Record the user's turn and return the prompt to send.
    ///
    /// Fails without touching the log when the API key is absent or when
    /// a request is already in flight; only one exchange runs at a time.
    pub fn begin(&mut self, keys: &ApiKeyStore, user_text: &str) -> Result<String, SubmitError> {
        if !keys.is_present() {
            return Err(SubmitError::MissingApiKey);
        }
        if self.in_flight {
            return Err(SubmitError::Busy);
        }

        self.messages.push(ChatMessage::user(user_text));
        self.in_flight = true;
        Ok(prompt::build_prompt(user_text))
    }

    /// Resolve the request started by `begin`.
    ///
    /// A failure is appended as assistant text carrying the error's
    /// description; the chat log is the only error channel.
    pub fn complete(&mut self, outcome: anyhow::Result<String>) {
        let content = match outcome {
            Ok(text) => text,
            Err(err) => err.to_string(),
        };
        self.messages.push(ChatMessage::assistant(content));
        self.in_flight = false;
    }

    /// One full round trip: user turn in, assistant turn out.
    pub async fn submit(
        &mut self,
        client: &GeminiClient,
        keys: &ApiKeyStore,
        model: &str,
        user_text: &str,
    ) -> Result<(), SubmitError> {
        let prompt = self.begin(keys, user_text)?;
        let outcome = client.generate(model, &prompt, DEFAULT_TEMPERATURE).await;
        self.complete(outcome);
        Ok(())
    }
}
