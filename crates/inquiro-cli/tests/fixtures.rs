//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Creates a temp INQUIRO_HOME directory for test isolation.
pub fn temp_home() -> TempDir {
    TempDir::new().expect("create temp inquiro home")
}

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// `inquiro` with an isolated home and no ambient token or base URL.
pub fn inquiro(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("inquiro");
    cmd.env("INQUIRO_HOME", home.path())
        .env_remove("INQUIRO_TOKEN")
        .env_remove("INQUIRO_API_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// `inquiro` pointed at a mock backend with a token from the environment.
pub fn inquiro_against(home: &TempDir, base_url: &str) -> Command {
    let mut cmd = inquiro(home);
    cmd.env("INQUIRO_API_BASE_URL", base_url)
        .env("INQUIRO_TOKEN", "test-token");
    cmd
}

pub fn entry_json(id: u64, query: &str, response: &str) -> Value {
    json!({
        "id": id,
        "query": query,
        "response": response,
        "created_at": "2024-05-01T09:30:00"
    })
}
