//! Common test utilities shared across integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Get the workspace root directory
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // Go up from crates/quiver to workspace root
    manifest_dir
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

/// Helper that builds the binary once and runs it directly
pub fn get_quiver_binary() -> PathBuf {
    let workspace = workspace_root();

    // Build the binary first (this should be quick if already built)
    let status = Command::new("cargo")
        .args(["build", "--package", "quiver", "--quiet"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build quiver");

    assert!(status.success(), "Failed to build quiver binary");

    workspace.join("target/debug/quiver")
}

/// Run the quiver binary directly in the specified directory
pub fn run_quiver_in_dir(dir: &Path, args: &[&str]) -> Output {
    let binary = get_quiver_binary();

    Command::new(&binary)
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute quiver binary")
}

/// Create a record and return its id
#[allow(dead_code)]
pub fn create_record(dir: &Path, name: &str, query: &str) -> String {
    let output = run_quiver_in_dir(dir, &["create", "--name", name, "--query", query]);
    assert!(
        output.status.success(),
        "Failed to create record: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Output format: "Created record <id> (v1)"
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .nth(2)
        .expect("Create output should contain an id")
        .to_string()
}
