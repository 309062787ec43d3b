use meter_down_auth::{Auth, AuthError, AuthOptions};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_for(mock_server: &MockServer) -> Auth {
    Auth::new(
        &mock_server.uri(),
        "test_anon_key",
        Client::new(),
        AuthOptions::default(),
    )
}

fn session_json() -> serde_json::Value {
    json!({
        "access_token": "test_access_token",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 4102444800_i64,
        "refresh_token": "test_refresh_token",
        "user": {
            "id": "test_user_id",
            "phone": "919876543210",
            "role": "authenticated"
        }
    })
}

#[tokio::test]
async fn test_send_otp() {
    // モックサーバーの起動
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/otp"))
        .and(header("apikey", "test_anon_key"))
        .and(body_json(json!({
            "phone": "+919876543210",
            "channel": "sms",
            "create_user": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);

    let result = auth.send_otp("+919876543210").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_send_otp_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/otp"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "code": 429,
            "error_code": "over_sms_send_rate_limit",
            "msg": "For security purposes, you can only request this after 60 seconds."
        })))
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);

    match auth.send_otp("+919876543210").await {
        Err(AuthError::ApiError { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(
                message,
                "For security purposes, you can only request this after 60 seconds."
            );
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_otp_plain_text_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/otp"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream sms gateway down"))
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);

    let err = auth.send_otp("+919876543210").await.unwrap_err();
    assert_eq!(err.api_message(), Some("upstream sms gateway down"));
}

#[tokio::test]
async fn test_send_otp_unreachable() {
    // 何もリッスンしていないポート
    let auth = Auth::new(
        "http://127.0.0.1:9",
        "test_anon_key",
        Client::new(),
        AuthOptions::default(),
    );

    let err = auth.send_otp("+919876543210").await.unwrap_err();
    assert!(matches!(err, AuthError::NetworkError(_)));
    assert!(err.api_message().is_none());
}

#[tokio::test]
async fn test_verify_otp() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/verify"))
        .and(body_json(json!({
            "phone": "+919876543210",
            "token": "123456",
            "type": "sms"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);
    assert!(auth.get_session().is_none());

    let session = auth.verify_otp("+919876543210", "123456").await.unwrap();
    assert_eq!(session.access_token, "test_access_token");
    assert_eq!(session.expires_at, Some(4102444800));
    assert_eq!(session.user.phone.as_deref(), Some("919876543210"));

    let stored = auth.get_session().unwrap();
    assert_eq!(stored.refresh_token, "test_refresh_token");
}

#[tokio::test]
async fn test_verify_otp_invalid_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/verify"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 403,
            "error_code": "otp_expired",
            "msg": "Token has expired or is invalid"
        })))
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);

    let err = auth.verify_otp("+919876543210", "000000").await.unwrap_err();
    assert_eq!(err.api_message(), Some("Token has expired or is invalid"));
    assert!(auth.get_session().is_none());
}

#[tokio::test]
async fn test_get_user_and_sign_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_json()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "test_user_id",
            "phone": "919876543210",
            "role": "authenticated"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer test_access_token"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let auth = auth_for(&mock_server);

    // セッションが無い状態
    assert!(matches!(
        auth.get_user().await,
        Err(AuthError::MissingSession)
    ));

    auth.verify_otp("+919876543210", "123456").await.unwrap();

    let user = auth.get_user().await.unwrap();
    assert_eq!(user.id, "test_user_id");

    auth.sign_out().await.unwrap();
    assert!(auth.get_session().is_none());
    assert!(matches!(auth.sign_out().await, Err(AuthError::MissingSession)));
}
