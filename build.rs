//! Build script for podguard.
//!
//! Embeds version information from git and the toolchain into the binary.

use std::env;
use std::process::Command;

fn main() {
    // Tell cargo to re-run this script if it changes
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!(
        "cargo:rustc-env=PODGUARD_TARGET={}",
        env::var("TARGET").unwrap_or_else(|_| "unknown".to_string())
    );

    if let Some(hash) = command_output("git", &["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=PODGUARD_GIT_HASH={}", hash);
    }

    if let Some(date) = command_output("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]) {
        println!("cargo:rustc-env=PODGUARD_BUILD_DATE={}", date);
    }

    // "rustc 1.75.0 (..." -> "1.75.0"
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    if let Some(version) = command_output(&rustc, &["--version"])
        .and_then(|s| s.split_whitespace().nth(1).map(|v| v.to_string()))
    {
        println!("cargo:rustc-env=PODGUARD_RUSTC_VERSION={}", version);
    }
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
}
