use clap::Args;

use common::content_chain::Post;
use whisper_daemon::http_server::api::client::ApiError;
use whisper_daemon::http_server::api::data::chain::ChainRequest;

#[derive(Args, Debug, Clone)]
pub struct Chain {
    /// Print the raw JSON chain
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to encode chain: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(post: &Post) -> String {
    let tag = if post.is_open() {
        "open".to_string()
    } else {
        format!("tag {}", post.tag.value())
    };
    let author = if post.author.is_empty() {
        "anonymous"
    } else {
        post.author.as_str()
    };
    let reactions = post
        .reaction_summary()
        .iter()
        .map(|s| format!("{} {}", s.descriptor, s.gravitas))
        .collect::<Vec<_>>()
        .join(", ");

    let mut line = format!("#{} [{}] {} by {}", post.id, tag, post.title, author);
    if !reactions.is_empty() {
        line.push_str(&format!(" ({})", reactions));
    }
    line
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Chain {
    type Error = ChainError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(ChainRequest::default()).await?;

        if self.json {
            return Ok(serde_json::to_string_pretty(&response.chain)?);
        }
        if response.chain.is_empty() {
            return Ok("the board is empty".to_string());
        }

        let mut lines: Vec<String> = response.chain.iter().rev().map(describe).collect();
        lines.push(format!("{} day(s) since the last post", response.days_since));
        Ok(lines.join("\n"))
    }
}
