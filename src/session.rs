// The single "who is logged in" slot. It lives in `main_menu` and is handed
// to the handlers that need it; nothing else holds a copy.

use crate::model::SessionUser;

#[derive(Debug, Default)]
pub struct Session {
    current: Option<SessionUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whoever was logged in with `user`.
    pub fn login(&mut self, user: SessionUser) {
        tracing::info!(user_id = user.id, "session opened");
        self.current = Some(user);
    }

    /// Clear the slot, returning the identity that was there.
    pub fn logout(&mut self) -> Option<SessionUser> {
        let previous = self.current.take();
        if let Some(user) = &previous {
            tracing::info!(user_id = user.id, "session closed");
        }
        previous
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Keep the in-memory copy in line after the account row changed.
    pub fn rename(&mut self, name: &str) {
        if let Some(user) = self.current.as_mut() {
            user.name = name.to_string();
        }
    }

    pub fn change_email(&mut self, email: &str) {
        if let Some(user) = self.current.as_mut() {
            user.email = email.to_string();
        }
    }
}
