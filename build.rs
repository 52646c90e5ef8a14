// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=QR_SCANNER_VERSION");

    // Packagers (flatpak, distro builds) pin the version explicitly
    let version = std::env::var("QR_SCANNER_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string derived from git:
/// - "0.1.0-abcdef1" when HEAD is exactly at tag v0.1.0
/// - "0.1.0-dirty-abcdef1" when HEAD is ahead of the last tag
/// - the package version plus the short hash when there are no tags
fn describe_version() -> String {
    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let Some(described) = git(&["describe", "--tags", "--match", "v*"]) else {
        return format!("{}-{}", env!("CARGO_PKG_VERSION"), hash);
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    // "0.1.0-5-gabcdef1" -> ["gabcdef1", "5", "0.1.0"]
    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [commit, _ahead, base] => {
            let commit = commit.strip_prefix('g').unwrap_or(commit);
            format!("{}-dirty-{}", base, commit)
        }
        _ => format!("{}-{}", described, hash),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
