use clap::Args;

use common::build_info;
use whisper_daemon::http_server::api::client::ApiError;
use whisper_daemon::http_server::health::version::VersionRequest;

#[derive(Args, Debug, Clone)]
pub struct Version {
    /// Also ask the daemon which build it is running
    #[arg(long)]
    pub daemon: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("could not reach daemon: {0}")]
    Unreachable(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Version {
    type Error = VersionError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let local = build_info!().to_string();
        if !self.daemon {
            return Ok(local);
        }

        let mut client = ctx.client.clone();
        let daemon = client.call(VersionRequest).await?;
        let seeded = if daemon.seeded { "seeded" } else { "unseeded" };

        Ok(format!(
            "client: {}\ndaemon: {}\nboard:  {}, {} rotations",
            local, daemon.build, seeded, daemon.passcode_version
        ))
    }
}
