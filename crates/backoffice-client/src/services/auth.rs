//! Login. Not register-scoped, and the only caller that surfaces the
//! boundary's own failure message when the API sends no structured error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::boundary::{HttpBoundary, RequestOptions};
use crate::error::{RemoteOperationError, RemoteResult};
use crate::facade::{extract_error_message, ResourceClient};

const LOGIN_FAILED: &str = "Login failed";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &format_args!("<redacted>"))
            .finish()
    }
}

/// The signed-in back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Exchanges credentials for a bearer token.
pub async fn login<B: HttpBoundary>(
    client: &ResourceClient<B>,
    credentials: &Credentials,
) -> RemoteResult<LoginResponse> {
    let body = serde_json::to_value(credentials)
        .map_err(|_| RemoteOperationError::new(LOGIN_FAILED))?;

    let value: Value = client
        .boundary()
        .post("auth/login", Some(body), RequestOptions::new())
        .await
        .map_err(|failure| {
            let message = extract_error_message(&failure, LOGIN_FAILED);
            warn!(status = ?failure.status, %message, "login rejected");
            RemoteOperationError::new(message)
        })?;

    let response: LoginResponse =
        serde_json::from_value(value).map_err(|_| RemoteOperationError::new(LOGIN_FAILED))?;
    info!(user = %response.user.username, "logged in");
    Ok(response)
}
