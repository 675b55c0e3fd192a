//! Amazon Translate provider.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_translate::error::{DisplayErrorContext, SdkError};
use aws_sdk_translate::Client;

use crate::{TranslationError, Translator, AUTO_DETECT};

/// Translator backed by the Amazon Translate `TranslateText` API.
///
/// Region and credentials come from the standard AWS environment chain
/// (`AWS_REGION`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, profiles, ...).
#[derive(Clone)]
pub struct AwsTranslator {
    client: Client,
}

impl AwsTranslator {
    /// Build a client from the process environment.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        tracing::info!(
            region = %config
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unset".to_string()),
            "Amazon Translate client configured"
        );
        Self::new(Client::new(&config))
    }

    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(AUTO_DETECT)
            .target_language_code(target_language)
            .send()
            .await
            .map_err(|err| {
                let detail = DisplayErrorContext(&err).to_string();
                tracing::error!(error = %detail, target_language, "Amazon Translate call failed");
                if matches!(err, SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)) {
                    TranslationError::Unavailable(detail)
                } else {
                    TranslationError::Failure(detail)
                }
            })?;

        Ok(output.translated_text().to_string())
    }

    fn name(&self) -> &'static str {
        "aws"
    }
}
