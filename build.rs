use std::process::Command;

fn main() {
    let describe = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    let version = match describe {
        Some(tag) => tag.strip_prefix('v').unwrap_or(&tag).to_string(),
        None => env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rustc-env=GIT_VERSION={version}");
}
