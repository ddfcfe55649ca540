//! Authenticated session lifecycle.
//!
//! The backend holds the actual credential (a cookie kept by the
//! [`ApiClient`]). All we track is whether the last thing we heard says we
//! are signed in.

use serde::Serialize;

use crate::api::v0::{
    LoginRequest, LogoutRequest, SignupRequest, StatusRequest, StatusResponse,
};
use crate::api::{ApiClient, NormalizedError};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;
const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been checked yet
    Unknown,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    pub authenticated: bool,
}

/// Who we are signed in as, from the last status probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub username: Option<String>,
    pub user_id: Option<i64>,
    pub peer_port: Option<String>,
    pub shared_folder: Option<String>,
    pub local_ip: Option<String>,
}

impl From<StatusResponse> for Profile {
    fn from(status: StatusResponse) -> Self {
        Self {
            username: status.username,
            user_id: status.user_id,
            peer_port: status.port,
            shared_folder: status.shared_folder,
            local_ip: status.local_ip,
        }
    }
}

/// Owns the session for one application run.
///
/// Create it at startup, call [`SessionManager::bootstrap`], and
/// [`SessionManager::teardown`] it when the user leaves.
#[derive(Debug)]
pub struct SessionManager {
    client: ApiClient,
    state: SessionState,
    profile: Option<Profile>,
}

impl SessionManager {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: SessionState::Unknown,
            profile: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current session, once it has been determined
    pub fn session(&self) -> Option<Session> {
        match self.state {
            SessionState::Unknown => None,
            SessionState::Authenticated => Some(Session {
                authenticated: true,
            }),
            SessionState::Unauthenticated => Some(Session {
                authenticated: false,
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Ask the backend whether it is up and we are signed in.
    ///
    /// Never fails: anything short of a positive answer, including an
    /// unreachable backend, means the user has to sign in.
    pub async fn bootstrap(&mut self) -> SessionState {
        match self.client.call(StatusRequest).await {
            Ok(status) if status.is_authenticated() => {
                tracing::info!(username = ?status.username, "session active");
                self.profile = Some(status.into());
                self.state = SessionState::Authenticated;
            }
            Ok(status) => {
                tracing::info!(online = status.online, "session not authenticated");
                self.set_unauthenticated();
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind, "status probe failed, requiring login: {}", e);
                self.set_unauthenticated();
            }
        }
        self.state
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), NormalizedError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.client.call(request).await {
            Ok(Some(response)) if response.is_success() => {
                tracing::info!(username, "logged in");
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Ok(response) => {
                // a 2xx that still says no
                let message = response
                    .and_then(|r| r.message)
                    .unwrap_or_else(|| LOGIN_FAILED.to_string());
                tracing::info!(username, "login refused: {}", message);
                self.set_unauthenticated();
                Err(NormalizedError::generic(message))
            }
            Err(e) => {
                tracing::info!(username, kind = ?e.kind, "login failed: {}", e);
                self.set_unauthenticated();
                Err(e)
            }
        }
    }

    /// Register a new account. Input that cannot pass the length rules is
    /// rejected before anything is sent.
    pub async fn signup(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), NormalizedError> {
        validate_signup(username, password)?;

        let request = SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        };

        match self.client.call(request).await {
            Ok(_) => {
                tracing::info!(username, "signed up");
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                tracing::info!(username, kind = ?e.kind, "signup failed: {}", e);
                self.set_unauthenticated();
                Err(e)
            }
        }
    }

    /// End the session. The backend is told on a best-effort basis; the
    /// session is over locally either way.
    pub async fn logout(&mut self) {
        if let Err(e) = self.client.call(LogoutRequest).await {
            tracing::warn!(kind = ?e.kind, "logout notification failed: {}", e);
        }
        tracing::info!("logged out");
        self.set_unauthenticated();
    }

    /// Log out and drop the manager
    pub async fn teardown(mut self) {
        self.logout().await;
    }

    fn set_unauthenticated(&mut self) {
        self.state = SessionState::Unauthenticated;
        self.profile = None;
    }
}

/// Local signup rules, checked in order: username first, then password.
/// Lengths count characters, not bytes.
pub fn validate_signup(username: &str, password: &str) -> Result<(), NormalizedError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(NormalizedError::invalid_field(
            "username",
            format!(
                "Username must be at least {} characters long.",
                MIN_USERNAME_LEN
            ),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(NormalizedError::invalid_field(
            "password",
            format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            ),
        ));
    }
    Ok(())
}
