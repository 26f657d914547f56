//! Authentication endpoints
//!
//! The session cookie is managed by the HTTP client's cookie store; this
//! wrapper keeps the in-memory [`Session`] mirror in step with it.

use crate::error::ClientResult;
use crate::http::HttpClient;
use crate::session::Session;
use serde::Serialize;
use shared::{UserInfo, UserType};
use std::sync::{Arc, RwLock};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for `/api/v1/auth`
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: HttpClient,
    session: Arc<RwLock<Session>>,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            session: Arc::new(RwLock::new(Session::new())),
        }
    }

    fn base(user_type: UserType) -> &'static str {
        match user_type {
            UserType::Patient => "api/v1/auth/patient",
            UserType::Doctor => "api/v1/auth/doctor",
        }
    }

    /// Sign in as a patient or doctor
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_type: UserType,
    ) -> ClientResult<UserInfo> {
        let request = LoginRequest { email, password };
        let user: UserInfo = self
            .http
            .post(&format!("{}/login", Self::base(user_type)), &request)
            .await?;
        if let Ok(mut session) = self.session.write() {
            session.set_login(user.clone());
        }
        tracing::debug!("Logged in as {:?} {}", user.user_type, user.email);
        Ok(user)
    }

    /// Fetch the current user from the server
    pub async fn me(&self) -> ClientResult<UserInfo> {
        let user: UserInfo = self.http.get("api/v1/auth/me").await?;
        if let Ok(mut session) = self.session.write() {
            session.set_login(user.clone());
        }
        Ok(user)
    }

    /// Sign out and clear the session mirror
    pub async fn logout(&self) -> ClientResult<()> {
        self.http.post_empty::<()>("api/v1/auth/logout").await?;
        if let Ok(mut session) = self.session.write() {
            session.clear();
        }
        Ok(())
    }

    /// Snapshot of the current session mirror
    pub fn session(&self) -> Session {
        self.session
            .read()
            .map(|session| session.clone())
            .unwrap_or_default()
    }

    /// Whether a user is currently signed in
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }
}
