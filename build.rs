fn main() {
    // Re-run if git HEAD changes (new commits, checkouts, etc.)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let git = |args: &[&str]| {
        std::process::Command::new("git")
            .args(args)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
    };

    let version = env!("CARGO_PKG_VERSION");
    let label = match (git(&["describe", "--exact-match", "--tags", "HEAD"]), git(&["rev-parse", "--short", "HEAD"])) {
        (Some(_), _) => version.to_string(),
        (None, Some(hash)) if !hash.is_empty() => format!("{version}-dev@{hash}"),
        _ => format!("{version}-dev"),
    };

    println!("cargo:rustc-env=ADFRAME_VERSION={label}");
}
