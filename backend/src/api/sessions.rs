//! One-time upload sessions.
//!
//! Each call to `/api/upload_url` opens a session identified by a random
//! token. The upload URL embeds the token; posting to it consumes the session.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Open upload sessions with their creation time
pub struct UploadSessions {
    ttl: Duration,
    open: Mutex<HashMap<String, Instant>>,
}

impl UploadSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// Open a session and return its token. Expired sessions are purged.
    pub fn issue(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();
        let mut open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        open.retain(|_, created| now.duration_since(*created) < self.ttl);
        open.insert(token.clone(), now);
        token
    }

    /// Close a session. True only for a known, unexpired, unused token.
    pub fn consume(&self, token: &str) -> bool {
        let mut open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match open.remove(token) {
            Some(created) => created.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Sessions currently tracked, expired or not
    pub fn pending(&self) -> usize {
        self.open.lock().map(|open| open.len()).unwrap_or(0)
    }
}
