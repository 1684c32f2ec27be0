use clap::Parser;
use okr_cli::{execute, Cli, CliError, Command};
use okr_core::{HttpOkrApi, ObjectiveStatus, ObjectiveStore, StatusFilter};
use serde_json::{json, Value};
use std::path::PathBuf;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn objective(id: &str, owner: &str, current: f64, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Objective {id}"),
        "description": "desc",
        "owner": owner,
        "status": status,
        "keyResults": [{
            "id": format!("{id}-kr"),
            "title": "Signups",
            "howItIsMeasured": "Analytics",
            "type": "NUMERIC",
            "startValue": 0,
            "targetValue": 100,
            "currentValue": current
        }]
    })
}

async fn server_with(objectives: Vec<Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/okrs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": objectives
        })))
        .mount(&server)
        .await;
    server
}

async fn run(server: &MockServer, command: Command) -> (Result<(), CliError>, String) {
    let store = ObjectiveStore::new(HttpOkrApi::new(&server.uri()).unwrap());
    let mut out = Vec::new();
    let result = execute(&command, &store, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn parses_global_flags_and_subcommands() {
    let cli = Cli::try_parse_from([
        "okr",
        "list",
        "--owner",
        "Product Team",
        "--status",
        "at-risk",
        "--base-url",
        "http://example.test",
    ])
    .unwrap();
    assert_eq!(cli.base_url.as_deref(), Some("http://example.test"));
    assert_eq!(
        cli.command,
        Command::List {
            owner: "Product Team".to_string(),
            status: StatusFilter::Only(ObjectiveStatus::AtRisk),
        }
    );

    let cli = Cli::try_parse_from(["okr", "set-status", "obj_1", "did-not-meet"]).unwrap();
    assert_eq!(
        cli.command,
        Command::SetStatus {
            id: "obj_1".to_string(),
            status: ObjectiveStatus::DidNotMeet,
        }
    );

    let cli = Cli::try_parse_from([
        "okr", "update", "obj_1", "--current", "kr_1=42.5", "--current", "kr_2 = 7",
    ])
    .unwrap();
    assert_eq!(
        cli.command,
        Command::Update {
            id: "obj_1".to_string(),
            from: None,
            current: vec![("kr_1".to_string(), 42.5), ("kr_2".to_string(), 7.0)],
        }
    );

    let cli = Cli::try_parse_from(["okr", "create", "--from", "draft.json"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Create {
            from: PathBuf::from("draft.json")
        }
    );

    assert!(Cli::try_parse_from(["okr", "update", "obj_1"]).is_err());
    assert!(Cli::try_parse_from(["okr", "update", "obj_1", "--current", "kr_1"]).is_err());
    assert!(Cli::try_parse_from(["okr", "update", "obj_1", "--current", "kr_1=lots"]).is_err());
    assert!(Cli::try_parse_from(["okr", "create"]).is_err());
    assert!(Cli::try_parse_from(["okr", "list", "--status", "stalled"]).is_err());
    assert!(Cli::try_parse_from(["okr", "set-status", "obj_1", "done"]).is_err());
}

#[tokio::test]
async fn list_applies_owner_and_derived_status_filters() {
    let server = server_with(vec![
        objective("a", "Product Team", 50.0, "on-track"),
        objective("b", "Product Team", 90.0, "on-track"),
        objective("c", "Sales Team", 50.0, "on-track"),
    ])
    .await;

    let (result, out) = run(
        &server,
        Command::List {
            owner: "Product Team".to_string(),
            status: StatusFilter::Only(ObjectiveStatus::AtRisk),
        },
    )
    .await;

    result.unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("a "));
    assert!(lines[0].contains("at-risk"));
    assert!(lines[0].contains("50%"));
}

#[tokio::test]
async fn show_unknown_objective_fails() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;

    let (result, out) = run(&server, Command::Show { id: "zzz".to_string() }).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CliError::NotFound(ref id) if id == "zzz"));
    assert_eq!(err.exit_code(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn summary_counts_derived_statuses() {
    let server = server_with(vec![
        objective("a", "Product Team", 90.0, "on-track"),
        objective("b", "Sales Team", 10.0, "completed"),
        objective("c", "Sales Team", 10.0, "on-track"),
    ])
    .await;

    let (result, out) = run(&server, Command::Summary).await;

    result.unwrap();
    assert!(out.contains("objectives: 3"));
    assert!(out.contains("completed    1"));
    assert!(out.contains("off-track    1"));
    assert!(out.contains("owners: Product Team, Sales Team"));
}

#[tokio::test]
async fn confirmed_set_status_prints_server_copy() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;
    Mock::given(method("PATCH"))
        .and(path("/api/okrs/a/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": objective("a", "Team", 10.0, "completed")
        })))
        .mount(&server)
        .await;

    let (result, out) = run(
        &server,
        Command::SetStatus {
            id: "a".to_string(),
            status: ObjectiveStatus::Completed,
        },
    )
    .await;

    result.unwrap();
    assert!(out.contains("completed"));
}

#[tokio::test]
async fn reverted_delete_is_an_error() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;
    Mock::given(method("DELETE"))
        .and(path("/api/okrs/a"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "disk full"
        })))
        .mount(&server)
        .await;

    let (result, out) = run(&server, Command::Delete { id: "a".to_string() }).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CliError::Reverted { ref id, .. } if id == "a"));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("disk full"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn unreachable_server_fails_before_mutating() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (result, _) = run(&server, Command::Delete { id: "a".to_string() }).await;

    assert!(matches!(result, Err(CliError::Api(_))));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

fn write_json(dir: &tempfile::TempDir, name: &str, body: &Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body.to_string()).unwrap();
    path
}

#[tokio::test]
async fn create_posts_file_contents_and_prints_detail() {
    let server = server_with(vec![]).await;
    Mock::given(method("POST"))
        .and(path("/api/okrs"))
        .and(body_partial_json(json!({ "title": "Objective new", "owner": "Team" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": objective("new", "Team", 25.0, "on-track")
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let from = write_json(
        &dir,
        "draft.json",
        &json!({
            "title": "Objective new",
            "description": "desc",
            "owner": "Team",
            "keyResults": [{
                "title": "Signups",
                "howItIsMeasured": "Analytics",
                "type": "NUMERIC",
                "startValue": 0,
                "targetValue": 100,
                "currentValue": 25
            }]
        }),
    );

    let (result, out) = run(&server, Command::Create { from }).await;

    result.unwrap();
    assert!(out.contains("Objective new"));
    assert!(out.contains("Signups: 25 / 100"));
}

#[tokio::test]
async fn invalid_create_input_is_rejected_before_posting() {
    let server = server_with(vec![]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let from = write_json(
        &dir,
        "empty.json",
        &json!({
            "title": "No key results here",
            "description": "desc",
            "owner": "Team",
            "keyResults": []
        }),
    );

    let (result, out) = run(&server, Command::Create { from }).await;
    let err = result.unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(out.is_empty());

    let missing = dir.path().join("missing.json");
    let (result, _) = run(&server, Command::Create { from: missing.clone() }).await;
    assert!(matches!(result, Err(CliError::Input { ref path, .. }) if *path == missing));
}

#[tokio::test]
async fn update_moves_key_result_values_of_the_fetched_copy() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;
    Mock::given(method("PUT"))
        .and(path("/api/okrs/a"))
        .and(body_partial_json(json!({
            "id": "a",
            "keyResults": [{ "id": "a-kr", "currentValue": 60.0 }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": objective("a", "Team", 60.0, "on-track")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (result, out) = run(
        &server,
        Command::Update {
            id: "a".to_string(),
            from: None,
            current: vec![("a-kr".to_string(), 60.0)],
        },
    )
    .await;

    result.unwrap();
    assert!(out.contains("60%"));
}

#[tokio::test]
async fn update_from_file_uses_the_path_id() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;
    Mock::given(method("PUT"))
        .and(path("/api/okrs/a"))
        .and(body_partial_json(json!({ "id": "a", "title": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": objective("a", "Team", 10.0, "on-track")
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut body = objective("zzz", "Team", 10.0, "on-track");
    body["title"] = json!("Renamed");
    let from = write_json(&dir, "replacement.json", &body);

    let (result, _) = run(
        &server,
        Command::Update {
            id: "a".to_string(),
            from: Some(from),
            current: Vec::new(),
        },
    )
    .await;

    result.unwrap();
}

#[tokio::test]
async fn update_with_unknown_key_result_sends_nothing() {
    let server = server_with(vec![objective("a", "Team", 10.0, "on-track")]).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (result, out) = run(
        &server,
        Command::Update {
            id: "a".to_string(),
            from: None,
            current: vec![("nope".to_string(), 1.0)],
        },
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        CliError::UnknownKeyResult { ref objective, ref key_result }
            if objective == "a" && key_result == "nope"
    ));
    assert!(out.is_empty());

    let (result, _) = run(
        &server,
        Command::Update {
            id: "zzz".to_string(),
            from: None,
            current: vec![("a-kr".to_string(), 1.0)],
        },
    )
    .await;
    assert!(matches!(result, Err(CliError::NotFound(ref id)) if id == "zzz"));
}
