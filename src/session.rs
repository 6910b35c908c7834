use std::sync::{Arc, PoisonError, RwLock};

/// The credential used to authorize remote calls. Created once, handed to
/// the [`ApiClient`](crate::client::ApiClient) at construction, set on
/// login and cleared on logout. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set(token);
        session
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Value for the `Authorization` header. Tokens the server already
    /// issued with a `Bearer ` prefix are used verbatim.
    pub fn authorization(&self) -> Option<String> {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        let token = guard.as_deref()?.trim();
        if token.is_empty() {
            return None;
        }
        if token.starts_with("Bearer ") {
            Some(token.to_string())
        } else {
            Some(format!("Bearer {token}"))
        }
    }
}
