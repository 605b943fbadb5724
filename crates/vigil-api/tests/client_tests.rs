// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};
use vigil_api::Client;
use vigil_app::{CategoryFormInput, CategoryId, ContentId, ListQuery, QueryCommand, SortField};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn transport_error_names_the_base_url() {
    let client =
        Client::new("http://127.0.0.1:1", Duration::from_millis(50)).expect("client builds");

    let error = client.stats().expect_err("stats should fail");
    let message = error.to_string();
    assert!(message.contains("http://127.0.0.1:1"));
    assert!(message.contains("dashboard server"));
}

#[test]
fn login_establishes_a_cookie_session() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let login = server.recv().expect("login request expected");
        assert_eq!(login.url(), "/api/auth/login");
        assert_eq!(login.method().as_str(), "POST");
        let response = json_response(
            r#"{"message":"Login successful","user":{"id":"u-1","username":"ops","role":"admin"}}"#,
            200,
        )
        .with_header(
            Header::from_bytes("Set-Cookie", "session=abc123; Path=/")
                .expect("valid cookie header"),
        );
        login.respond(response).expect("login response");

        let session = server.recv().expect("session request expected");
        assert_eq!(session.url(), "/api/auth/session");
        let cookie = session
            .headers()
            .iter()
            .find(|header| header.field.equiv("Cookie"))
            .map(|header| header.value.as_str().to_owned())
            .unwrap_or_default();
        assert!(cookie.contains("session=abc123"), "cookie was {cookie:?}");
        session
            .respond(json_response(
                r#"{"authenticated":true,"user":{"id":"u-1","username":"ops","role":"admin"}}"#,
                200,
            ))
            .expect("session response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let login = client.login("ops", "hunter2")?;
    assert_eq!(login.username, "ops");
    assert!(login.is_admin());

    let session = client.session()?;
    assert_eq!(session.role, "admin");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn rejected_login_carries_the_server_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"code":"INVALID_CREDENTIALS","message":"Invalid username or password"}"#,
                401,
            ))
            .expect("response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .login("ops", "wrong")
        .expect_err("login should be rejected");
    assert!(error.is_unauthorized());
    assert_eq!(error.user_message(), "Invalid username or password");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_contents_serializes_the_query_state() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/api/contents?page=1&page_size=50&sort_by=criticality_score&order=desc&category=Malware",
        );
        request
            .respond(json_response(
                r#"{"items":[{"id":"c-7","title":"X","source_name":"S","published_at":"2024-01-01T00:00:00Z","criticality_score":9}],"total":101,"page":1,"page_size":50,"total_pages":3}"#,
                200,
            ))
            .expect("response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let mut query = ListQuery::default();
    query.dispatch(QueryCommand::SetSort(SortField::CriticalityScore));
    query.dispatch(QueryCommand::SetFilter("Malware".to_owned()));

    let page = client.list_contents(&query)?;
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].display_title(), "X");
    assert_eq!(page.items[0].severity().label(), "critical");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn missing_content_maps_to_not_found() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/contents/nope");
        request
            .respond(json_response(
                r#"{"code":"NOT_FOUND","message":"Content item not found"}"#,
                404,
            ))
            .expect("response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .get_content(&ContentId::new("nope"))
        .expect_err("missing item should fail");
    assert!(error.is_not_found());
    assert_eq!(error.user_message(), "Content item not found");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn category_crud_round_trip_against_mock_server() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut create = server.recv().expect("create request expected");
        assert_eq!(create.method().as_str(), "POST");
        assert_eq!(create.url(), "/api/categories");
        let mut body = String::new();
        create
            .as_reader()
            .read_to_string(&mut body)
            .expect("read create body");
        assert!(body.contains("\"name\":\"Ransomware\""));
        assert!(body.contains("\"default_criticality\":8"));
        create
            .respond(json_response(
                r##"{"id":"cat-9","name":"Ransomware","description":"","default_criticality":8,"color":"#e74c3c"}"##,
                201,
            ))
            .expect("create response");

        let update = server.recv().expect("update request expected");
        assert_eq!(update.method().as_str(), "PUT");
        assert_eq!(update.url(), "/api/categories/cat-9");
        update
            .respond(json_response(
                r##"{"id":"cat-9","name":"Ransomware","description":"Lockers","default_criticality":9,"color":"#e74c3c"}"##,
                200,
            ))
            .expect("update response");

        let delete = server.recv().expect("delete request expected");
        assert_eq!(delete.method().as_str(), "DELETE");
        assert_eq!(delete.url(), "/api/categories/cat-9");
        delete
            .respond(json_response(r#"{"message":"Category deleted successfully"}"#, 200))
            .expect("delete response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let form = CategoryFormInput {
        name: "Ransomware".to_owned(),
        description: String::new(),
        default_criticality: 8,
        color: "#e74c3c".to_owned(),
    };

    let created = client.create_category(&form)?;
    assert_eq!(created.id, CategoryId::new("cat-9"));

    let updated = client.update_category(&created.id, &form)?;
    assert_eq!(updated.default_criticality, 9);

    client.delete_category(&created.id)?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn stats_decode_defaults_absent_distributions() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/contents/stats");
        request
            .respond(json_response(
                r#"{"total_items":12,"last_updated":"2026-08-01T10:30:00Z","category_distribution":{"Malware":5,"Phishing":5},"criticality_distribution":{"9-10":2}}"#,
                200,
            ))
            .expect("response");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let stats = client.stats()?;
    assert_eq!(stats.total_items, 12);
    assert_eq!(stats.band_counts(), [0, 0, 0, 2]);
    assert_eq!(stats.critical_count(), 2);

    let slices = stats.category_slices();
    assert_eq!(slices.len(), 2);
    assert!(slices.iter().all(|slice| slice.percent_label() == "50.0%"));

    handle.join().expect("server thread should join");
    Ok(())
}
