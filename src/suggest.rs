use std::sync::Arc;

use crate::completion::{CompletionClient, ReplyFormat};
use crate::error::Result;
use crate::models::{Preferences, SuggestionRequestBody, SuggestionResult};
use crate::prompt::{SUGGESTION_SYSTEM_PROMPT, build_suggestion_prompt};
use crate::resolver::parse_suggestions;
use crate::validation::InputValidator;

/// Destination suggestions from a preference profile.
///
/// Unlike itinerary generation there is no degraded form here: a reply that
/// is not a non-empty array of strings fails the request.
pub struct DestinationSuggester {
    validator: InputValidator,
    completion: Arc<CompletionClient>,
    count: usize,
}

impl DestinationSuggester {
    pub fn new(completion: Arc<CompletionClient>, count: usize) -> Self {
        Self {
            validator: InputValidator::new(),
            completion,
            count: count.max(1),
        }
    }

    pub async fn handle(&self, body: SuggestionRequestBody) -> Result<SuggestionResult> {
        let preferences = self.validator.suggestions(body)?;
        self.suggest(&preferences).await
    }

    pub async fn suggest(&self, preferences: &Preferences) -> Result<SuggestionResult> {
        let prompt = build_suggestion_prompt(preferences, self.count);
        let text = self
            .completion
            .complete(SUGGESTION_SYSTEM_PROMPT, &prompt, ReplyFormat::Text)
            .await?;

        let suggestions = parse_suggestions(&text).inspect_err(|e| {
            tracing::error!(error = %e, "Rejecting destination suggestions");
        })?;

        tracing::info!(count = suggestions.len(), "Suggested destinations");
        Ok(SuggestionResult { suggestions })
    }
}
