use std::sync::Arc;

use courier::backend::{
    AuthPayload, Backend, BackendError, Credentials, HttpBackend, Registration, User,
};
use courier::core::action::{Action, Effect, update};
use courier::core::effect::execute;
use courier::core::session::{Session, SessionHolder};
use courier::core::state::{App, AuthMode};
use courier::core::storage::MemoryStore;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(
        format!("{}/auth", server.uri()),
        format!("{}/chats", server.uri()),
    )
}

fn session(id: i64, token: &str) -> Session {
    Session {
        user: User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            avatar_url: None,
        },
        token: token.to_string(),
    }
}

fn fresh_app() -> App {
    App::new(SessionHolder::restore(Arc::new(MemoryStore::new())))
}

/// Runs an effect through the backend and feeds the outcome back into `update`.
async fn run_effect(app: &mut App, backend: &dyn Backend, effect: Effect) -> Effect {
    match execute(backend, effect).await {
        Some(action) => update(app, action),
        None => Effect::None,
    }
}

// ============================================================================
// Auth Endpoint
// ============================================================================

#[tokio::test]
async fn test_login_posts_action_and_parses_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_json(json!({
            "action": "login",
            "email": "a@b.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "name": "A"},
            "token": "t1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let payload = backend
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login should succeed");

    assert_eq!(payload.user.id, 1);
    assert_eq!(payload.user.name, "A");
    assert_eq!(payload.token, "t1");
}

#[tokio::test]
async fn test_register_posts_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(body_json(json!({
            "action": "register",
            "email": "ann@example.com",
            "password": "secret1",
            "name": "Ann"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 5, "name": "Ann", "email": "ann@example.com"},
            "token": "t5"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let payload = backend
        .register(&Registration {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .expect("register should succeed");

    assert_eq!(
        payload,
        AuthPayload {
            user: User {
                id: 5,
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                avatar_url: None,
            },
            token: "t5".to_string(),
        }
    );
}

#[tokio::test]
async fn test_login_error_uses_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid email or password"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Api {
            status: 401,
            message: "Invalid email or password".to_string(),
        }
    );
    assert_eq!(err.user_message(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_error_without_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Login failed");
}

#[tokio::test]
async fn test_register_error_with_blank_message_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": ""})))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend
        .register(&Registration {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Registration failed");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let backend = backend_for(&server);
    drop(server);

    let err = backend
        .login(&Credentials {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Network(_)));
}

// ============================================================================
// Chats Endpoint
// ============================================================================

#[tokio::test]
async fn test_list_chats_sends_identity_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(header("X-User-Id", "7"))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chats": [
                {
                    "id": 1,
                    "name": "Design Team",
                    "is_group": true,
                    "last_message": "See you then",
                    "last_message_time": "2024-03-01T12:30:00",
                    "unread_count": 2
                },
                {"id": 2, "name": null, "is_group": false, "unread_count": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let chats = backend.list_chats(&session(7, "tok")).await.unwrap();

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].display_name(), "Design Team");
    assert!(chats[0].is_group);
    assert_eq!(chats[0].unread_count, 2);
    assert!(chats[0].last_message_time.is_some());
    assert_eq!(chats[1].name, None);
    assert_eq!(chats[1].unread_count, 0);
}

#[tokio::test]
async fn test_list_messages_queries_chat_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(query_param("chat_id", "42"))
        .and(header("X-User-Id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {
                    "id": 10,
                    "text": "hello",
                    "user_id": 2,
                    "user_name": "Bob",
                    "created_at": "2024-03-01T12:30:00+00:00"
                },
                {"id": 11, "text": "hi", "user_id": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let messages = backend.list_messages(&session(1, "t1"), 42).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].user_name.as_deref(), Some("Bob"));
    assert!(messages[0].created_at.is_some());
    assert_eq!(messages[1].user_id, 1);
    assert!(messages[1].created_at.is_none());
}

#[tokio::test]
async fn test_send_message_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(header("X-User-Id", "1"))
        .and(header("X-Auth-Token", "t1"))
        .and(body_json(json!({
            "action": "send_message",
            "chat_id": 42,
            "text": "hi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"id": 99, "text": "hi", "user_id": 1, "created_at": "2024-03-01T12:31:00"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let message = backend
        .send_message(&session(1, "t1"), 42, "hi")
        .await
        .unwrap();

    assert_eq!(message.id, 99);
    assert_eq!(message.text, "hi");
    assert_eq!(message.user_name, None);
}

#[tokio::test]
async fn test_create_chat_returns_new_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(json!({"action": "create_chat", "other_user_id": 8})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chat_id": 31})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let chat_id = backend.create_chat(&session(1, "t1"), 8).await.unwrap();
    assert_eq!(chat_id, 31);
}

#[tokio::test]
async fn test_chats_error_without_message_uses_generic_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.list_chats(&session(1, "t1")).await.unwrap_err();
    assert_eq!(
        err,
        BackendError::Api {
            status: 403,
            message: "Request failed".to_string(),
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.list_chats(&session(1, "t1")).await.unwrap_err();
    assert!(matches!(err, BackendError::Parse(_)));
}

// ============================================================================
// End-to-End Flows Through update() and execute()
// ============================================================================

#[tokio::test]
async fn test_login_then_chats_are_fetched_for_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": 1, "name": "A"},
            "token": "t1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(header("X-User-Id", "1"))
        .and(header("X-Auth-Token", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chats": [{"id": 42, "name": "Team", "is_group": true, "unread_count": 0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut app = fresh_app();

    let effect = update(
        &mut app,
        Action::SubmitLogin(Credentials {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        }),
    );
    assert!(app.auth.is_loading);

    let effect = run_effect(&mut app, &backend, effect).await;
    assert!(!app.auth.is_loading);
    assert_eq!(app.session.user_id(), Some(1));
    assert!(matches!(effect, Effect::FetchChats(_)));

    let effect = run_effect(&mut app, &backend, effect).await;
    assert_eq!(effect, Effect::None);
    assert_eq!(app.chats.len(), 1);
    assert_eq!(app.chats[0].id, 42);
}

#[tokio::test]
async fn test_failed_login_shows_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid email or password"})),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut app = fresh_app();

    let effect = update(
        &mut app,
        Action::SubmitLogin(Credentials {
            email: "a@b.com".to_string(),
            password: "wrong".to_string(),
        }),
    );
    run_effect(&mut app, &backend, effect).await;

    assert!(!app.session.is_authenticated());
    assert!(!app.auth.is_loading);
    assert_eq!(app.auth.error.as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_open_chat_and_send_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(query_param("chat_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": 1, "text": "hello", "user_id": 2, "user_name": "Bob"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(json!({
            "action": "send_message",
            "chat_id": 42,
            "text": "hi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"id": 2, "text": "hi", "user_id": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut app = fresh_app();
    let signed_in = session(1, "t1");
    update(
        &mut app,
        Action::AuthSucceeded(AuthPayload {
            user: signed_in.user.clone(),
            token: signed_in.token.clone(),
        }),
    );

    let effect = update(&mut app, Action::SelectChat(42));
    run_effect(&mut app, &backend, effect).await;
    assert_eq!(app.messages.len(), 1);
    assert_eq!(app.messages[0].text, "hello");

    app.draft = "hi".to_string();
    let effect = update(&mut app, Action::SendDraft);
    assert!(app.is_sending);
    run_effect(&mut app, &backend, effect).await;

    assert!(!app.is_sending);
    assert!(app.draft.is_empty());
    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[1].text, "hi");
    assert_eq!(app.messages[1].user_id, 1);
}

#[tokio::test]
async fn test_created_chat_loads_list_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(json!({"action": "create_chat", "other_user_id": 8})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chat_id": 31})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(query_param("chat_id", "31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": 1, "text": "first", "user_id": 8}]
        })))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chats": [{"id": 31, "name": null, "is_group": false, "unread_count": 0}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut app = fresh_app();
    let signed_in = session(1, "t1");
    update(
        &mut app,
        Action::AuthSucceeded(AuthPayload {
            user: signed_in.user.clone(),
            token: signed_in.token.clone(),
        }),
    );

    let effect = update(&mut app, Action::CreateChat { other_user_id: 8 });
    let effect = run_effect(&mut app, &backend, effect).await;
    assert_eq!(app.selected_chat_id, Some(31));

    for part in effect.into_parts() {
        run_effect(&mut app, &backend, part).await;
    }
    assert_eq!(app.chats.len(), 1);
    assert_eq!(app.messages.len(), 1);
    assert_eq!(app.messages[0].text, "first");
}

#[tokio::test]
async fn test_short_registration_password_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = fresh_app();
    update(&mut app, Action::ToggleAuthMode);
    assert_eq!(app.auth.mode, AuthMode::Register);

    let effect = update(
        &mut app,
        Action::SubmitRegister(Registration {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password: "abcd".to_string(),
        }),
    );

    assert_eq!(effect, Effect::None);
    assert!(!app.auth.is_loading);
    assert_eq!(
        app.auth.error.as_deref(),
        Some("Password must be at least 6 characters")
    );
}
