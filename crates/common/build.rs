use std::env;
use std::process::Command;

/// Run git in the package directory, yielding trimmed stdout on success
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn env_or_unknown(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| "unknown".to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=CI_BUILD_REF");

    // CI pins the ref; local builds describe the checkout
    let version = env::var("CI_BUILD_REF")
        .ok()
        .filter(|r| !r.is_empty())
        .or_else(|| git(&["describe", "--always", "--dirty", "--tags"]))
        .unwrap_or_else(|| env_or_unknown("CARGO_PKG_VERSION"));

    println!("cargo:rustc-env=REPO_VERSION={}", version);
    println!("cargo:rustc-env=BUILD_PROFILE={}", env_or_unknown("PROFILE"));
    println!("cargo:rustc-env=BUILD_TARGET={}", env_or_unknown("TARGET"));
    println!(
        "cargo:rustc-env=BUILD_TIMESTAMP={}",
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    );
}
