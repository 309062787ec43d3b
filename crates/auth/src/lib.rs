//! Supabase Auth client for Meter Down
//!
//! This crate talks to the Supabase Auth (GoTrue) API for the phone
//! one-time-password grant: requesting an SMS code, verifying it,
//! and holding the resulting session.

use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::RwLock;
use thiserror::Error;

/// エラー型
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing session")]
    MissingSession,
}

impl AuthError {
    /// APIがエラーとして返したメッセージ（ネットワークエラーの場合は `None`）
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::ApiError { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// ユーザー情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub phone_confirmed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// セッション情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// 有効期限（UNIX秒）。レスポンスに無い場合は受信時刻から計算する
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub token_type: String,
    pub user: User,
}

impl Session {
    /// セッションの有効期限が切れているか
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// クライアントオプション
#[derive(Debug, Clone)]
pub struct AuthOptions {
    pub persist_session: bool,
    /// 未登録の電話番号に対してユーザーを作成するか
    pub create_user: bool,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            persist_session: true,
            create_user: true,
        }
    }
}

/// SMSコード送信リクエスト
#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    phone: &'a str,
    channel: &'a str,
    create_user: bool,
}

/// SMSコード検証リクエスト
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    phone: &'a str,
    token: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

/// GoTrue のエラーレスポンス。バージョンによってフィールド名が異なる
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// 電話番号をログ用にマスクする（末尾4桁のみ残す）
pub fn mask_phone(phone: &str) -> String {
    let keep = phone.len().saturating_sub(4);
    phone
        .char_indices()
        .map(|(i, c)| if i < keep && c.is_ascii_digit() { '*' } else { c })
        .collect()
}

/// Auth クライアント
pub struct Auth {
    url: String,
    key: String,
    http_client: Client,
    options: AuthOptions,
    current_session: Arc<RwLock<Option<Session>>>,
}

impl Auth {
    /// 新しい Auth クライアントを作成
    pub fn new(url: &str, key: &str, http_client: Client, options: AuthOptions) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            options,
            current_session: Arc::new(RwLock::new(None)),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// 失敗レスポンスを `AuthError::ApiError` に変換
    async fn api_error(response: Response) -> AuthError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    text
                }
            });
        warn!("auth request failed with status {}: {}", status, message);
        AuthError::ApiError {
            status: status.as_u16(),
            message,
        }
    }

    fn store_session(&self, session: Option<Session>) {
        match self.current_session.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    /// 電話番号宛てにSMSでワンタイムコードを送信
    pub async fn send_otp(&self, phone: &str) -> Result<(), AuthError> {
        let url = self.auth_url("/otp");
        debug!("requesting sms code for {}", mask_phone(phone));

        let payload = OtpRequest {
            phone,
            channel: "sms",
            create_user: self.options.create_user,
        };

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }

    /// 電話番号とワンタイムコードでサインイン
    pub async fn verify_otp(&self, phone: &str, token: &str) -> Result<Session, AuthError> {
        let url = self.auth_url("/verify");
        debug!("verifying sms code for {}", mask_phone(phone));

        let payload = VerifyRequest {
            phone,
            token,
            kind: "sms",
        };

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let mut session: Session = serde_json::from_slice(&response.bytes().await?)?;
        if session.expires_at.is_none() {
            session.expires_at = Some(Utc::now().timestamp() + session.expires_in);
        }

        // セッションを保存
        if self.options.persist_session {
            self.store_session(Some(session.clone()));
        }

        Ok(session)
    }

    /// 現在のセッションを取得
    pub fn get_session(&self) -> Option<Session> {
        match self.current_session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 現在のユーザーを取得
    pub async fn get_user(&self) -> Result<User, AuthError> {
        let session = self.get_session().ok_or(AuthError::MissingSession)?;

        let response = self
            .http_client
            .get(self.auth_url("/user"))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let user: User = serde_json::from_slice(&response.bytes().await?)?;
        Ok(user)
    }

    /// サインアウト
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.get_session().ok_or(AuthError::MissingSession)?;

        let response = self
            .http_client
            .post(self.auth_url("/logout"))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        // セッションをクリア
        self.store_session(None);

        Ok(())
    }
}
