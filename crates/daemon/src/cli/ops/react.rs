use clap::Args;

use common::crypto::Passcode;
use whisper_daemon::http_server::api::client::ApiError;
use whisper_daemon::http_server::api::data::react::ReactRequest;

#[derive(Args, Debug, Clone)]
pub struct React {
    #[command(flatten)]
    pub request: ReactRequest,

    /// Current passcode, needed for restricted posts and worth more gravitas
    #[arg(long)]
    pub passcode: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReactError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for React {
    type Error = ReactError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let request = ReactRequest {
            hash: self
                .passcode
                .as_deref()
                .map(|p| Passcode::from(p).hash().to_string()),
            ..self.request.clone()
        };

        let mut client = ctx.client.clone();
        let response = client.call(request).await?;

        let kind = if response.credentialed {
            "credentialed"
        } else {
            "anonymous"
        };
        Ok(format!(
            "{}: {} reaction with gravitas {}",
            response.message, kind, response.gravitas
        ))
    }
}
