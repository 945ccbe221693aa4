mod common;

use std::time::Duration;

use astronaut_roster::middleware::Cors;
use astronaut_roster::{Astronaut, Page, Roster};
use common::TestServer;
use serde_json::{Value, json};

fn sally() -> Value {
    json!({ "firstName": "Sally", "lastName": "Ride", "birthdate": "1951-05-26", "superpower": "Super Speed" })
}

#[tokio::test]
async fn crud_over_http() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let empty: Value = http.get(server.url("/astronauts")).send().await.unwrap().json().await.unwrap();
    assert_eq!(empty, json!({ "totalPages": 1, "current": -1, "data": [] }));

    let created = http.post(server.url("/astronauts")).json(&sally()).send().await.unwrap();
    assert_eq!(created.status(), 200);
    let created: Value = created.json().await.unwrap();
    assert_eq!(created["message"], "Astronaut Created");
    assert_eq!(created["data"]["id"], 1);

    let mut edited = sally();
    edited["superpower"] = json!("Immortality");
    let updated: Value = http.put(server.url("/astronauts/1")).json(&edited).send().await.unwrap()
        .json().await.unwrap();
    assert_eq!(updated["message"], "Astronaut Updated.");
    assert_eq!(updated["data"]["superpower"], "Immortality");

    let page: Page = http.get(server.url("/astronauts/1")).send().await.unwrap().json().await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].superpower, "Immortality");

    let deleted = http.delete(server.url("/astronauts/1")).send().await.unwrap();
    assert_eq!(deleted.status(), 200);
    let missing = http.delete(server.url("/astronauts/1")).send().await.unwrap();
    assert_eq!(missing.status(), 404);
    let missing: Value = missing.json().await.unwrap();
    assert_eq!(missing["message"], "Astronaut with ID 1 not found.");

    drop(http);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn seeded_roster_paginates_by_five() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let seeded: Value = http.post(server.url("/astronauts/example")).send().await.unwrap()
        .json().await.unwrap();
    assert_eq!(seeded, json!({ "message": "Added 11 Astronauts." }));
    assert_eq!(server.roster.len(), 11);

    let second: Page = http.get(server.url("/astronauts/2")).send().await.unwrap().json().await.unwrap();
    assert_eq!(second.total_pages, 3);
    assert_eq!(second.current, 2);
    assert_eq!(second.data.iter().map(|a| a.id).collect::<Vec<_>>(), vec![6, 7, 8, 9, 10]);

    let beyond = http.get(server.url("/astronauts/4")).send().await.unwrap();
    assert_eq!(beyond.status(), 400);
    let beyond: Value = beyond.json().await.unwrap();
    assert_eq!(beyond["message"], "This Page Does Not Exist");
}

#[tokio::test]
async fn configured_page_size_is_honoured() {
    let server = TestServer::start_with(Cors::permissive(), Roster::with_page_size(4)).await;
    let http = reqwest::Client::new();

    http.post(server.url("/astronauts/example")).send().await.unwrap();
    let last: Page = http.get(server.url("/astronauts/3")).send().await.unwrap().json().await.unwrap();
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.data.len(), 3);
}

#[tokio::test]
async fn invalid_bodies_are_rejected() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let partial = http.post(server.url("/astronauts")).json(&json!({ "firstName": "Sally" })).send().await.unwrap();
    assert_eq!(partial.status(), 400);
    let partial: Value = partial.json().await.unwrap();
    assert_eq!(partial["message"], "Some Fields Are Incorrect");

    let bad_id = http.put(server.url("/astronauts/sally")).json(&sally()).send().await.unwrap();
    assert_eq!(bad_id.status(), 400);
    let bad_id: Value = bad_id.json().await.unwrap();
    assert_eq!(bad_id["message"], "ID must be an integer.");

    assert!(server.roster.is_empty());
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let not_found = http.get(server.url("/cosmonauts")).send().await.unwrap();
    assert_eq!(not_found.status(), 404);

    let wrong_method = http.patch(server.url("/astronauts/1")).send().await.unwrap();
    assert_eq!(wrong_method.status(), 405);
    assert_eq!(wrong_method.headers()["allow"], "DELETE, GET, HEAD, PUT");
}

#[tokio::test]
async fn head_and_trailing_slash_follow_get() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();
    http.post(server.url("/astronauts")).json(&sally()).send().await.unwrap();

    let head = http.head(server.url("/astronauts")).send().await.unwrap();
    assert_eq!(head.status(), 200);
    assert_eq!(head.headers()["content-type"], "application/json");
    assert_eq!(head.headers()["access-control-allow-origin"], "*");
    assert!(head.bytes().await.unwrap().is_empty());

    let slashed: Page = http.get(server.url("/astronauts/")).send().await.unwrap().json().await.unwrap();
    assert_eq!((slashed.current, slashed.data.len()), (1, 1));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let server = TestServer::start_with_body_limit(1024).await;
    let http = reqwest::Client::new();

    let mut huge = sally();
    huge["firstName"] = json!("S".repeat(2048));
    let refused = http.post(server.url("/astronauts")).json(&huge).send().await.unwrap();
    assert_eq!(refused.status(), 413);
    let refused: Value = refused.json().await.unwrap();
    assert_eq!(refused["message"], "Request Body Is Too Large");
    assert!(server.roster.is_empty());

    // The refused connection is closed with its body unread, so use a new one.
    let fits = reqwest::Client::new().post(server.url("/astronauts")).json(&sally()).send().await.unwrap();
    assert_eq!(fits.status(), 200);
    assert_eq!(server.roster.len(), 1);
}

#[tokio::test]
async fn cors_preflight_and_headers() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let preflight = http
        .request(reqwest::Method::OPTIONS, server.url("/astronauts"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), 200);
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");
    assert_eq!(preflight.headers()["access-control-allow-headers"], "content-type");
    assert_eq!(preflight.headers()["access-control-allow-methods"], "GET,HEAD,PUT,PATCH,POST,DELETE");

    let list = http.get(server.url("/astronauts")).send().await.unwrap();
    assert_eq!(list.headers()["access-control-allow-origin"], "*");

    let not_found = http.get(server.url("/nowhere")).send().await.unwrap();
    assert_eq!(not_found.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn restricted_cors_origin() {
    let server = TestServer::start_with(Cors::new("http://localhost:3000"), Roster::new()).await;
    let response = reqwest::get(server.url("/healthz")).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "http://localhost:3000");
    assert_eq!(response.headers()["vary"], "Origin");
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn shutdown_drains_even_with_idle_keep_alive() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let created: Value = http.post(server.url("/astronauts")).json(&sally()).send().await.unwrap()
        .json().await.unwrap();
    let astronaut: Astronaut = serde_json::from_value(created["data"].clone()).unwrap();
    assert_eq!(astronaut.first_name, "Sally");

    // `http` still holds a pooled keep-alive connection here.
    tokio::time::timeout(Duration::from_secs(5), server.stop())
        .await
        .expect("server did not drain")
        .unwrap();
}
