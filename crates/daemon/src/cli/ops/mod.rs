pub mod chain;
pub mod daemon;
pub mod health;
pub mod init;
pub mod post;
pub mod react;
pub mod version;

pub use chain::Chain;
pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use post::Post;
pub use react::React;
pub use version::Version;
