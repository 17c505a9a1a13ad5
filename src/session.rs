//! Session-scoped authentication gate: a single shared secret and one
//! boolean, reset to unauthenticated when the process starts. Passed
//! explicitly into the routing layer rather than living in a global.

use std::sync::atomic::{AtomicBool, Ordering};

pub struct SessionGate {
    secret: String,
    authenticated: AtomicBool,
}

impl SessionGate {
    pub fn new(secret: impl Into<String>) -> Self {
        SessionGate {
            secret: secret.into(),
            authenticated: AtomicBool::new(false),
        }
    }

    /// Exact-match check. A failed attempt resets the session to
    /// unauthenticated, matching the gate's original behavior.
    pub fn login(&self, attempt: &str) -> bool {
        let ok = attempt == self.secret;
        self.authenticated.store(ok, Ordering::Relaxed);
        ok
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }
}
