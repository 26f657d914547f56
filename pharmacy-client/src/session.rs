//! Auth session mirror
//!
//! The server owns authentication (cookie-based); this is the client's
//! in-memory view of it, read by UI consumers that only need to know
//! whether a user is signed in and which population they belong to.

use shared::{UserInfo, UserType};

/// Session data kept in memory for the lifetime of the client
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Current user information after login
    pub user_info: Option<UserInfo>,
}

impl Session {
    /// Creates a new empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful login
    pub fn set_login(&mut self, user: UserInfo) {
        self.user_info = Some(user);
    }

    /// Clears the session on logout
    pub fn clear(&mut self) {
        self.user_info = None;
    }

    /// Whether a user is currently signed in
    pub fn is_authenticated(&self) -> bool {
        self.user_info.is_some()
    }

    /// The signed-in user's population, if any
    pub fn user_type(&self) -> Option<UserType> {
        self.user_info.as_ref().map(|user| user.user_type)
    }

    /// Returns the current user info if available
    pub fn user(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }
}
