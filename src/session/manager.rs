//! Session bookkeeping.
//!
//! Issues opaque session tokens and answers validity/lookup queries for the
//! rest of the backend. Expired sessions are swept by [`remove_expired`],
//! which the embedding scheduler calls on a fixed interval.
//!
//! [`remove_expired`]: SessionManager::remove_expired

use std::collections::HashMap;

use log::{debug, info};

use crate::config::session::STARTING_TOTAL_XP;
use crate::util::now_secs;

use super::token;
use super::types::{Session, SessionToken, UserId};

/// Owner of all active sessions, keyed by session token.
#[derive(Default)]
pub struct SessionManager {
    active: HashMap<SessionToken, Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        SessionManager {
            active: HashMap::new(),
        }
    }

    /// Whether a session with the given token is active.
    pub fn is_active(&self, token: &str) -> bool {
        self.active.contains_key(token)
    }

    /// Finds the session with the given token.
    pub fn get(&self, token: &str) -> Option<&Session> {
        self.active.get(token)
    }

    /// Creates a new session valid for `valid_for` seconds from `now`.
    ///
    /// Returns a clone of the stored session so the caller can hand the
    /// cookies to the client.
    pub fn create_session(&mut self, now: u64, valid_for: u64) -> Session {
        let client_ids = token::client_ids();
        let session = Session {
            token: token::session_token(now, valid_for),
            guest_session: token::guest_session(&client_ids.token_id),
            client_ids,
            expires: now + valid_for,
            total_xp: STARTING_TOTAL_XP,
        };
        debug!(
            "[Session] Created session for user {}",
            session.client_ids.user_id
        );
        self.active.insert(session.token.clone(), session.clone());
        session
    }

    /// Deletes the session with the given token. Returns whether it existed.
    pub fn delete(&mut self, token: &str) -> bool {
        self.active.remove(token).is_some()
    }

    /// Finds a session by user id.
    pub fn find_by_user_id(&self, user_id: &UserId) -> Option<&Session> {
        self.active
            .values()
            .find(|session| &session.client_ids.user_id == user_id)
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Removes all sessions which have expired.
    pub fn remove_expired(&mut self) {
        info!("[Session] Removing expired sessions");
        self.remove_expired_at(now_secs());
    }

    fn remove_expired_at(&mut self, now: u64) {
        self.active.retain(|_, session| session.expires >= now);
    }
}
