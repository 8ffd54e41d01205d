//! History commands against a mock backend.

mod fixtures;

use fixtures::{can_bind_localhost, entry_json, inquiro, inquiro_against, temp_home};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_history_list_prints_table_and_page() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat-history"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chats": [entry_json(41, "best headphones", "Try the Sony ones.")],
            "current_page": 2,
            "total_pages": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "list", "--page", "2", "--per-page", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("best headphones"))
        .stdout(predicate::str::contains("2024-05-01 09:30"))
        .stdout(predicate::str::contains("Page 2/3"));
}

#[tokio::test]
async fn test_history_list_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chats": []})))
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history found."))
        .stdout(predicate::str::contains("Page 1/1"));
}

#[tokio::test]
async fn test_history_search_prints_results() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat-history/search"))
        .and(query_param("q", "bose"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [entry_json(7, "bose qc45", "Great noise cancelling.")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "search", "  bose "])
        .assert()
        .success()
        .stdout(predicate::str::contains("bose qc45"))
        .stdout(predicate::str::contains("1 result(s)"));
}

#[test]
fn test_history_search_rejects_blank_query() {
    let home = temp_home();

    // nothing listens here; a blank query must fail before any request
    inquiro(&home)
        .env("INQUIRO_API_BASE_URL", "http://127.0.0.1:9")
        .args(["history", "search", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search query is empty"));
}

#[tokio::test]
async fn test_history_delete_reports_not_found() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat-history/12"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Chat not found"})))
        .expect(1)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "delete", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("delete history entry 12"))
        .stderr(predicate::str::contains("Chat not found"));
}

#[tokio::test]
async fn test_history_delete_success() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat-history/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "delete", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 12"));
}

#[tokio::test]
async fn test_history_clear_with_yes() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat-history/clear"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared history"));
}

#[tokio::test]
async fn test_history_clear_declined_sends_nothing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/chat-history/clear"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    inquiro_against(&home, &server.uri())
        .args(["history", "clear"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delete all history?"))
        .stdout(predicate::str::contains("Aborted."));
}

#[tokio::test]
async fn test_unauthorized_clears_stored_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat-history"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .expect(1)
        .mount(&server)
        .await;

    inquiro(&home)
        .args(["auth", "set-token", "stale-token"])
        .assert()
        .success();

    inquiro(&home)
        .env("INQUIRO_API_BASE_URL", server.uri())
        .args(["history", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired"));

    assert!(!home.path().join("credentials.json").exists());
}
