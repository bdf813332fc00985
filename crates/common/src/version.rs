use std::fmt;

use serde::{Deserialize, Serialize};

/// Which build of whisper is running, as captured by `build.rs`.
///
/// Owned strings so the same type can be read back off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_profile: String,
    pub build_target: String,
    pub build_timestamp: String,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("REPO_VERSION").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        build_target: env!("BUILD_TARGET").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "whisper {} ({} {}, built {})",
            self.version, self.build_profile, self.build_target, self.build_timestamp
        )
    }
}

#[macro_export]
macro_rules! build_info {
    () => {
        $crate::version::build_info()
    };
}
