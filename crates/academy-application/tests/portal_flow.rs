//! End-to-end flows over a temporary data directory and a mocked backend.

use std::fs;

use academy_application::{AcademyApp, PlayerFilter};
use academy_core::auth::{LoginForm, SignupForm};
use academy_core::config::AcademyConfig;
use academy_core::entity::{GroupRef, NewGroupForm, NewPlayerForm, PlayerStatus};
use academy_core::profile::Location;
use academy_core::store::{StorageChange, keys};
use academy_infrastructure::AcademyPaths;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(temp_dir: &TempDir, server_uri: &str) -> AcademyApp {
    let mut config = AcademyConfig::default();
    config.api.base_url = server_uri.to_string();
    let paths = AcademyPaths::new(Some(temp_dir.path().to_path_buf()));
    AcademyApp::from_config(config, &paths).unwrap()
}

fn stored(temp_dir: &TempDir, key: &str) -> Value {
    let raw = fs::read_to_string(temp_dir.path().join("storage").join(key)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_login_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-123",
            "user": {
                "username": "sami",
                "first_name": "Sami",
                "last_name": "Trabelsi",
                "email": "sami@club.tn",
                "role": "coach",
                "club": "Club Africain"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let app = app_for(&temp_dir, &server.uri());
    let session = app
        .auth
        .login(&LoginForm {
            email: "sami@club.tn".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.profile.role().home_route(), "/coach");

    let user = stored(&temp_dir, keys::USER);
    assert!(user.get("version").is_some());
    assert_eq!(user["personalInfo"]["fullName"], "Sami Trabelsi");

    drop(app);
    let reopened = app_for(&temp_dir, &server.uri());
    let restored = reopened.auth.current_session().await.unwrap().unwrap();
    assert_eq!(restored, session);
}

#[tokio::test]
async fn test_signup_then_edit_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signup/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "jwt-new"})))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let app = app_for(&temp_dir, &server.uri());
    let session = app
        .auth
        .signup(&SignupForm {
            username: "leila".to_string(),
            email: "leila@etoile.tn".to_string(),
            password: "Etoile2025!".to_string(),
            confirm_password: "Etoile2025!".to_string(),
            first_name: "Leila".to_string(),
            last_name: "Ben Ali".to_string(),
            club: "Étoile du Sahel".to_string(),
            phone: "22123456".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.profile.personal_info.full_name, "Leila Ben Ali");
    assert_eq!(session.profile.academy_info.name, "Étoile du Sahel");
    assert_eq!(session.profile.personal_info.role, "admin");

    let updated = app
        .profile
        .update_location(Location {
            country: "Tunisia".to_string(),
            city: "Sousse".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.academy_info.name, "Étoile du Sahel");
    assert_eq!(stored(&temp_dir, keys::USER)["location"]["city"], "Sousse");

    app.auth.logout().await.unwrap();
    assert!(app.auth.current_session().await.unwrap().is_none());
    assert!(!temp_dir.path().join("storage").join(keys::TOKEN).exists());
}

#[tokio::test]
async fn test_rejected_login_shows_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Email ou mot de passe incorrect"})),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let app = app_for(&temp_dir, &server.uri());
    let err = app
        .auth
        .login(&LoginForm {
            email: "sami@club.tn".to_string(),
            password: "nope".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Email ou mot de passe incorrect");
    assert!(app.auth.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_roster_round_trip_across_restart() {
    let temp_dir = TempDir::new().unwrap();
    let app = app_for(&temp_dir, "http://127.0.0.1:9");
    let mut events = app.subscribe();

    let group = app
        .roster
        .add_group(NewGroupForm {
            name: "U13".to_string(),
            category: "Minimes".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let event = events.recv().await.unwrap();
    assert_eq!(event.key, keys::PLAYER_GROUPS);
    assert_eq!(event.change, StorageChange::Set);

    for (first, last) in [("Aziz", "Ben Salah"), ("Omar", "Gharbi")] {
        app.roster
            .add_player(NewPlayerForm {
                first_name: first.to_string(),
                last_name: last.to_string(),
                group: Some(GroupRef::new(group.id.clone())),
                subgroup: Some("A".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    let before = app.roster.list_players().await.unwrap();

    drop(app);
    let reopened = app_for(&temp_dir, "http://127.0.0.1:9");
    assert_eq!(reopened.roster.list_players().await.unwrap(), before);

    let in_subgroup = reopened
        .roster
        .search_players(&PlayerFilter {
            group_id: Some(group.id.clone()),
            subgroup: Some("a".to_string()),
            status: Some(PlayerStatus::Active),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(in_subgroup.len(), 2);
}

#[tokio::test]
async fn test_browser_era_documents_are_migrated() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("storage");
    fs::create_dir_all(&storage_dir).unwrap();
    fs::write(
        storage_dir.join(keys::PLAYER_GROUPS),
        r#"[{"id": 1, "name": "U15", "subgroups": ["A", {"name": "B"}]}]"#,
    )
    .unwrap();
    fs::write(
        storage_dir.join(keys::PLAYERS),
        r#"[{"id": 7, "firstName": "Hamza", "lastName": "Rafia", "group": 1},
            {"id": 8, "firstName": "Ali", "lastName": "Abdi", "group": "U17"}]"#,
    )
    .unwrap();
    fs::write(
        storage_dir.join(keys::USER),
        r#"{"first_name": "Nour", "last_name": "Jaziri", "email": "nour@club.tn", "club": "CSS"}"#,
    )
    .unwrap();

    let app = app_for(&temp_dir, "http://127.0.0.1:9");

    let profile = app.profile.get_profile().await.unwrap();
    assert_eq!(profile.personal_info.full_name, "Nour Jaziri");
    assert_eq!(profile.academy_info.name, "CSS");

    let players = app.roster.players_in_group("1").await.unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].id, "7");

    let dangling = app.roster.dangling_group_refs().await.unwrap();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].entity_id, "8");
    assert_eq!(dangling[0].group_id, "U17");
}

#[tokio::test]
async fn test_corrupt_collection_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("storage");
    fs::create_dir_all(&storage_dir).unwrap();
    fs::write(storage_dir.join(keys::COACHES), "{not json").unwrap();

    let app = app_for(&temp_dir, "http://127.0.0.1:9");
    let err = app.roster.search_coaches("", None).await.unwrap_err();
    assert!(err.is_serialization());

    // The corrupt document is left for inspection
    assert_eq!(
        fs::read_to_string(storage_dir.join(keys::COACHES)).unwrap(),
        "{not json"
    );
}

#[tokio::test]
async fn test_browser_era_name_references_and_missing_ids() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("storage");
    fs::create_dir_all(&storage_dir).unwrap();
    fs::write(
        storage_dir.join(keys::PLAYER_GROUPS),
        r#"[{"id": 1, "name": "U12"}]"#,
    )
    .unwrap();
    fs::write(
        storage_dir.join(keys::EVENTS),
        r#"[{"title": "Training", "type": "training", "date": "2026-11-02", "groups": ["U12"]}]"#,
    )
    .unwrap();

    let app = app_for(&temp_dir, "http://127.0.0.1:9");
    let events = app.roster.events_for_group("1").await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(app.roster.dangling_group_refs().await.unwrap().is_empty());

    let today = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let listed = app.roster.upcoming_events(today).await.unwrap();
    assert_eq!(listed[0].id, events[0].id);
    assert!(app.roster.remove_event(&events[0].id).await.unwrap());
    assert!(app.roster.events_for_group("1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_loosely_typed_backend_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "jwt-456",
            "user": {
                "first_name": "Sami",
                "last_name": "Trabelsi",
                "email": "sami@club.tn",
                "phone": 22123456,
                "role": "coach",
                "academyInfo": {"name": "Club Africain", "facilities": {"gym": "yes"}}
            }
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let app = app_for(&temp_dir, &server.uri());
    let session = app
        .auth
        .login(&LoginForm {
            email: "sami@club.tn".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.profile.personal_info.phone, "22123456");
    assert_eq!(session.profile.academy_info.name, "Club Africain");
    assert_eq!(stored(&temp_dir, keys::USER)["personalInfo"]["phone"], "22123456");
}
