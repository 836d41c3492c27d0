//! One-shot text generation against a [`ModelProvider`].

use tracing::{debug, warn};

use crate::error::RouterError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::{FinishReason, GenerationSettings, ModelMessage};

/// Send `messages` and return the reply text.
///
/// A reply cut short by the token limit is still returned, with a warning.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    messages: Vec<ModelMessage>,
    settings: GenerationSettings,
) -> Result<String, RouterError> {
    debug!(
        provider = provider.provider_name(),
        model = provider.model_id(),
        "generate_text: calling provider"
    );
    let request = ProviderRequest { messages, settings };
    let response = provider.generate_text(&request).await?;
    match response.finish_reason {
        Some(FinishReason::Length) => warn!(
            model = provider.model_id(),
            "generate_text: reply truncated at the token limit"
        ),
        Some(FinishReason::ContentFilter) => warn!(
            model = provider.model_id(),
            "generate_text: reply stopped by the content filter"
        ),
        reason => debug!(finish_reason = ?reason, "generate_text: done"),
    }
    Ok(response.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderResponse;
    use async_trait::async_trait;

    struct Truncating;

    #[async_trait]
    impl ModelProvider for Truncating {
        fn provider_name(&self) -> &str {
            "truncating"
        }

        fn model_id(&self) -> &str {
            "m"
        }

        async fn generate_text(
            &self,
            request: &ProviderRequest,
        ) -> Result<ProviderResponse, RouterError> {
            Ok(ProviderResponse {
                text: format!("{} messages", request.messages.len()),
                finish_reason: Some(FinishReason::Length),
            })
        }
    }

    #[tokio::test]
    async fn truncated_reply_is_still_returned() {
        let text = generate_text(
            &Truncating,
            vec![ModelMessage::system("s"), ModelMessage::user("u")],
            GenerationSettings::default(),
        )
        .await
        .unwrap();
        assert_eq!(text, "2 messages");
    }
}
