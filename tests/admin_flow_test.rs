use chrono::{Duration, Utc};
use httpmock::prelude::*;
use linkcomercs::app::NewComercio;
use linkcomercs::core::session::{Session, SessionStore};
use linkcomercs::domain::model::{Comercio, Principal, Role, User};
use linkcomercs::{BusinessService, DirectoryError, FileSessionStore, RestComercioStore};
use tempfile::TempDir;

const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

fn sessions_with(dir: &TempDir, principal: Principal) -> FileSessionStore {
    let sessions = FileSessionStore::new(dir.path().join("session.json"));
    let session = Session::issue(principal, Duration::hours(24), Utc::now());
    sessions.save(&session).unwrap();
    sessions
}

fn admin() -> Principal {
    Principal::from_user(User {
        id: "2".to_string(),
        name: "Root".to_string(),
        user_name: "root".to_string(),
        email: "root@example.com".to_string(),
        password: "secret2".to_string(),
        city: "Madrid".to_string(),
        age: 40,
        role: Role::Admin,
        version: 0,
    })
}

fn regular_user() -> Principal {
    Principal::from_user(User {
        id: "1".to_string(),
        name: "Ana".to_string(),
        user_name: "ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "secret1".to_string(),
        city: "Madrid".to_string(),
        age: 28,
        role: Role::User,
        version: 0,
    })
}

fn new_comercio() -> NewComercio {
    NewComercio {
        name: "Nuevo Bar".to_string(),
        cif: "B123".to_string(),
        country: "España".to_string(),
        city: "Bilbao".to_string(),
        address: "C/ Mayor 1".to_string(),
        email: "nuevo@bar.com".to_string(),
        phone: "600000000".to_string(),
        category: "restaurante".to_string(),
        password: "pw1234".to_string(),
        image: "img.png".to_string(),
    }
}

#[tokio::test]
async fn admin_creates_a_fresh_listing() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let post_mock = server.mock(|when, then| {
        when.method(POST).path("/comercio").matches(|req| {
            let body: serde_json::Value =
                serde_json::from_slice(req.body_ref()).unwrap();
            body.get("id").is_none()
                && body["scoring"] == 0.0
                && body["nscore"] == 0
                && body["reviews"].as_array().unwrap().is_empty()
                && body["publications"].as_array().unwrap().is_empty()
                && body["version"] == 0
        });
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": "c9", "name": "Nuevo Bar", "city": "Bilbao",
                "email": "nuevo@bar.com", "category": "restaurante", "password": "pw1234",
                "scoring": 0, "nscore": 0, "reviews": [], "publications": [], "version": 0
            }));
    });

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, admin()));

    let created = business.create_comercio(new_comercio()).await.unwrap();

    post_mock.assert();
    assert_eq!(created.id, "c9");
}

#[tokio::test]
async fn regular_users_cannot_create_listings_through_the_admin_path() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let post_mock = server.mock(|when, then| {
        when.method(POST).path("/comercio");
        then.status(201).json_body(serde_json::json!({}));
    });

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, regular_user()));

    let err = business.create_comercio(new_comercio()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Forbidden { .. }));
    post_mock.assert_hits(0);
}

#[tokio::test]
async fn self_registration_needs_no_login() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let post_mock = server.mock(|when, then| {
        when.method(POST).path("/comercio");
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": "c10", "name": "Nuevo Bar", "city": "Bilbao",
                "email": "nuevo@bar.com", "category": "restaurante", "password": "pw1234",
                "scoring": 0, "nscore": 0, "reviews": [], "publications": [], "version": 0
            }));
    });

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let sessions = FileSessionStore::new(dir.path().join("session.json"));
    let business = BusinessService::new(store, sessions);

    let created = business.register_comercio(new_comercio()).await.unwrap();
    post_mock.assert();
    assert_eq!(created.id, "c10");
}

#[tokio::test]
async fn admin_deletes_any_listing() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/comercio/c1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "c1"}));
    });

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, admin()));

    business.delete_comercio("c1").await.unwrap();
    delete_mock.assert();
    // An admin deleting someone else's listing keeps their own session.
    assert!(dir.path().join("session.json").exists());
}

#[tokio::test]
async fn owner_deleting_its_own_listing_also_ends_the_session() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/comercio/c1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": "c1"}));
    });

    let own: Comercio = serde_json::from_value(serde_json::json!({
        "id": "c1", "name": "Bar Pepe", "city": "Sevilla",
        "email": "pepe@bar.com", "category": "restaurante", "password": "pw",
        "scoring": 0, "nscore": 0, "reviews": [], "publications": [], "version": 0
    }))
    .unwrap();

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, Principal::Owner(own)));

    business.delete_comercio("c1").await.unwrap();
    delete_mock.assert();
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn owners_cannot_delete_other_listings() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/comercio/c2");
        then.status(200).json_body(serde_json::json!({}));
    });

    let own: Comercio = serde_json::from_value(serde_json::json!({
        "id": "c1", "name": "Bar Pepe", "city": "Sevilla",
        "email": "pepe@bar.com", "category": "restaurante", "password": "pw",
        "scoring": 0, "nscore": 0, "reviews": [], "publications": [], "version": 0
    }))
    .unwrap();

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, Principal::Owner(own)));

    let err = business.delete_comercio("c2").await.unwrap_err();
    assert!(matches!(err, DirectoryError::Forbidden { .. }));
    delete_mock.assert_hits(0);
}

#[tokio::test]
async fn deleting_a_missing_listing_surfaces_not_found() {
    let server = MockServer::start();
    let dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(DELETE).path("/comercio/ghost");
        then.status(404);
    });

    let store = RestComercioStore::new(server.url("/comercio"), TIMEOUT).unwrap();
    let business = BusinessService::new(store, sessions_with(&dir, admin()));

    let err = business.delete_comercio("ghost").await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound { .. }));
}
