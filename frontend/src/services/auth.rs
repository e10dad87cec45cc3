//! Account endpoints: registration, login and the current user.

use serde_json::json;

use crate::error::ApiResult;
use crate::services::http::{ApiClient, Body, Method, Transport};
use crate::types::{LoginResponse, User};

const REGISTER_PATH: &str = "/api/v1/auth/register";
const LOGIN_PATH: &str = "/api/v1/auth/login";
const ME_PATH: &str = "/api/v1/auth/me";

impl<T: Transport> ApiClient<T> {
    /// Create an account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        let body = Body::Json(json!({ "email": email, "password": password }));
        self.send_json(Method::Post, REGISTER_PATH, body).await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// The backend follows the OAuth2 password flow, so the email travels
    /// as `username` in a urlencoded form.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = Body::Form(vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        self.send_json(Method::Post, LOGIN_PATH, body).await
    }

    /// The user the current token belongs to.
    pub async fn me(&self) -> ApiResult<User> {
        self.get_json(ME_PATH).await
    }
}
