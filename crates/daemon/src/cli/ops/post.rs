use clap::Args;

use common::crypto::{EnvelopeError, Passcode};
use common::passcode_chain::{RotationEnvelope, RotationKind};
use whisper_daemon::http_server::api::client::ApiError;
use whisper_daemon::http_server::api::data::post::PostRequest;

#[derive(Args, Debug, Clone)]
pub struct Post {
    #[command(flatten)]
    pub request: PostRequest,

    /// Current passcode; it is hashed locally and never sent
    #[arg(long)]
    pub passcode: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("post rejected: {0}")]
    Rejected(String),
    #[error("board accepted the post but sent no next passcode")]
    MissingEnvelope,
    #[error("could not unlock the next passcode: {0}")]
    Unlock(#[from] EnvelopeError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Post {
    type Error = PostError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let hash = Passcode::from(self.passcode.as_str()).hash();
        let request = PostRequest {
            hash: hash.to_string(),
            ..self.request.clone()
        };

        let mut client = ctx.client.clone();
        let response = client.call(request).await?;

        let kind = RotationKind::from_marker(response.marker)
            .ok_or_else(|| PostError::Rejected(response.message.clone()))?;
        let envelope = RotationEnvelope {
            ciphertext: response.data.ok_or(PostError::MissingEnvelope)?,
            kind,
        };
        let next = envelope.open(&hash)?;

        let via = match kind {
            RotationKind::Ordinary => "",
            RotationKind::Recovery => " via the recovery passcode",
        };
        let id = response
            .post_id
            .map(|id| format!(" #{}", id))
            .unwrap_or_default();

        Ok(format!(
            "post{} accepted{}\nnext passcode: {}",
            id, via, next
        ))
    }
}
