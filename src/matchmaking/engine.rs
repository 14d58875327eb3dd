//! Matchmaking engine.
//!
//! Owns the player queue, the open-lobby pool, and the killed-lobby
//! retention list. All operations are synchronous, perform no I/O, and
//! report absence through `Option` rather than errors; the embedding layer
//! decides what absence means on the wire.

use log::{debug, info};
use uuid::Uuid;

use crate::config::matchmaking::{KILLED_LOBBY_RETENTION_SECS, MAX_NON_HOSTS};
use crate::session::Session;
use crate::util::now_millis;

use super::response::{MatchData, QueueResponse};
use super::types::{KilledLobby, Lobby, QueueRequest, QueuedPlayer, Side};

/// Main matchmaking engine.
///
/// Lobby scans are linear and in insertion order; joiners always land in
/// the oldest eligible lobby.
#[derive(Default)]
pub struct MatchmakingEngine {
    open_lobbies: Vec<Lobby>,
    killed_lobbies: Vec<KilledLobby>,
    queued_players: Vec<QueuedPlayer>,
}

impl MatchmakingEngine {
    pub fn new() -> Self {
        MatchmakingEngine {
            open_lobbies: Vec::new(),
            killed_lobbies: Vec::new(),
            queued_players: Vec::new(),
        }
    }

    /// Places a player into the matchmaking queue.
    ///
    /// Queueing is not idempotent: a second request from the same session
    /// adds a second entry.
    pub fn enqueue(&mut self, request: &QueueRequest, session: &Session) {
        self.queued_players.push(QueuedPlayer {
            session_token: session.token.clone(),
            user_id: session.client_ids.user_id.clone(),
            side: request.side,
            queued_at: now_millis(),
        });
        debug!(
            "[Matchmaking] Player {} queued on side {:?}",
            session.client_ids.user_id, request.side
        );
    }

    /// Progresses matchmaking for the calling player and reports its status.
    ///
    /// Side B joins the oldest ready, unstarted lobby with a free slot and
    /// leaves the queue; with no open lobbies at all it stays `QUEUED`.
    /// `None` means no lobby decision was reached this poll and the client
    /// should poll again. Side A always opens a fresh lobby, even when it
    /// already hosts one. An unknown caller gets the empty status.
    pub fn poll_status(&mut self, side: Side, session: &Session) -> Option<QueueResponse> {
        let Some(index) = self.queued_player_index(&session.token) else {
            return Some(QueueResponse::empty());
        };
        match side {
            Side::B => {
                if self.open_lobbies.is_empty() {
                    return Some(QueueResponse::queued());
                }
                let slot = self.open_lobbies.iter().position(|lobby| {
                    lobby.is_ready && !lobby.has_started && lobby.non_hosts.len() < MAX_NON_HOSTS
                })?;
                let player = self.queued_players.remove(index);
                let lobby = &mut self.open_lobbies[slot];
                lobby.non_hosts.push(player.clone());
                info!(
                    "[Matchmaking] Player {} joined lobby {} ({}/{})",
                    player.user_id,
                    lobby.id,
                    lobby.non_hosts.len(),
                    MAX_NON_HOSTS
                );
                Some(QueueResponse::matched(
                    &lobby.host.user_id,
                    &lobby.id,
                    Some(&player.user_id),
                ))
            }
            Side::A => {
                let player = self.queued_players[index].clone();
                let match_id = Uuid::new_v4().to_string();
                self.open_lobbies.push(Lobby {
                    id: match_id.clone(),
                    host: player.clone(),
                    non_hosts: Vec::new(),
                    is_ready: false,
                    has_started: false,
                    session_settings: None,
                    reason: None,
                });
                info!(
                    "[Matchmaking] Lobby {} opened by {}",
                    match_id, player.user_id
                );
                Some(QueueResponse::matched(&player.user_id, &match_id, None))
            }
        }
    }

    /// Removes the calling player from the queue. No-op when absent.
    pub fn cancel(&mut self, session_token: &str) {
        if let Some(index) = self.queued_player_index(session_token) {
            let player = self.queued_players.remove(index);
            debug!("[Matchmaking] Player {} left the queue", player.user_id);
        }
    }

    /// Marks a lobby ready and stores the host's session settings.
    ///
    /// Returns the full descriptor, or `None` when no open lobby has the id.
    pub fn register_match(
        &mut self,
        match_id: &str,
        session_settings: String,
    ) -> Option<MatchData> {
        let lobby = self
            .open_lobbies
            .iter_mut()
            .find(|lobby| lobby.id == match_id)?;
        lobby.is_ready = true;
        lobby.session_settings = Some(session_settings);
        info!("[Matchmaking] Lobby {match_id} registered and ready");
        self.build_match_descriptor(match_id, false)
    }

    /// Whether the given session hosts the given open lobby.
    pub fn is_owner(&self, match_id: &str, session_token: &str) -> bool {
        self.open_lobby(match_id)
            .is_some_and(|lobby| lobby.host.session_token == session_token)
    }

    /// Moves a lobby from the open pool to the killed list. No-op when unknown.
    pub fn delete_match(&mut self, match_id: &str) {
        let Some(index) = self
            .open_lobbies
            .iter()
            .position(|lobby| lobby.id == match_id)
        else {
            return;
        };
        let lobby = self.open_lobbies.remove(index);
        info!("[Matchmaking] Lobby {match_id} killed");
        self.killed_lobbies.push(KilledLobby {
            lobby,
            killed_time: now_millis(),
        });
    }

    /// Deletes all killed lobbies past the retention window.
    pub fn reap_expired(&mut self) {
        info!("[Matchmaking] Deleting old matches");
        self.reap_expired_at(now_millis());
    }

    fn reap_expired_at(&mut self, now: u64) {
        let cutoff = now.saturating_sub(KILLED_LOBBY_RETENTION_SECS * 1000);
        self.killed_lobbies
            .retain(|killed| killed.killed_time >= cutoff);
    }

    /// Builds the descriptor for a lobby, looking in the open pool first and
    /// the killed list second. `None` when the id is unknown anywhere.
    pub fn build_match_descriptor(&self, match_id: &str, killed: bool) -> Option<MatchData> {
        let lobby = self
            .open_lobby(match_id)
            .or_else(|| self.killed_lobby(match_id))?;
        Some(MatchData::for_lobby(lobby, killed))
    }

    /// Finds an open lobby by id.
    pub fn open_lobby(&self, match_id: &str) -> Option<&Lobby> {
        self.open_lobbies.iter().find(|lobby| lobby.id == match_id)
    }

    /// Finds an open lobby by id, mutably. The embedding layer uses this to
    /// flag a lobby as started once its match begins.
    pub fn open_lobby_mut(&mut self, match_id: &str) -> Option<&mut Lobby> {
        self.open_lobbies
            .iter_mut()
            .find(|lobby| lobby.id == match_id)
    }

    fn killed_lobby(&self, match_id: &str) -> Option<&Lobby> {
        self.killed_lobbies
            .iter()
            .find(|killed| killed.lobby.id == match_id)
            .map(|killed| &killed.lobby)
    }

    fn queued_player_index(&self, session_token: &str) -> Option<usize> {
        self.queued_players
            .iter()
            .position(|player| player.session_token == session_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchmaking::response::{MatchStatus, QueueStatus};
    use crate::session::{ClientIds, Session};

    fn test_session(name: &str) -> Session {
        Session {
            token: format!("token-{name}"),
            guest_session: format!("s:{name}"),
            client_ids: ClientIds {
                token_id: format!("tid-{name}"),
                user_id: format!("uid-{name}"),
                guest_token: None,
            },
            expires: u64::MAX,
            total_xp: 0,
        }
    }

    fn queue_request(side: Side) -> QueueRequest {
        QueueRequest {
            side,
            check_only: false,
            latencies: Vec::new(),
        }
    }

    /// Queues a host, opens its lobby, and returns the match id.
    fn open_lobby_for(engine: &mut MatchmakingEngine, host: &Session) -> String {
        engine.enqueue(&queue_request(Side::A), host);
        match engine.poll_status(Side::A, host) {
            Some(QueueResponse::Matched { match_data, .. }) => match_data.match_id,
            other => panic!("host poll did not open a lobby: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_player_gets_empty_status() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut engine = MatchmakingEngine::new();
        let response = engine.poll_status(Side::B, &test_session("ghost"));
        assert!(matches!(response, Some(QueueResponse::Empty {})));
    }

    #[test]
    fn test_survivor_with_no_lobbies_stays_queued() {
        let mut engine = MatchmakingEngine::new();
        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        let response = engine.poll_status(Side::B, &survivor);
        assert!(matches!(
            response,
            Some(QueueResponse::Queued {
                status: QueueStatus::Queued,
                ..
            })
        ));
        // The survivor stays in the queue while waiting.
        assert_eq!(engine.queued_players.len(), 1);
    }

    #[test]
    fn test_survivor_skips_unready_lobby() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        open_lobby_for(&mut engine, &host);

        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        // A lobby exists but is not ready: no decision this poll.
        assert!(engine.poll_status(Side::B, &survivor).is_none());
        assert_eq!(engine.queued_players.len(), 2);
    }

    #[test]
    fn test_survivor_joins_oldest_ready_lobby() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);
        engine.register_match(&match_id, "blob".to_string()).unwrap();

        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        let response = engine.poll_status(Side::B, &survivor);
        match response {
            Some(QueueResponse::Matched { status, match_data }) => {
                assert_eq!(status, QueueStatus::Matched);
                assert_eq!(match_data.match_id, match_id);
                assert_eq!(match_data.creator, "uid-a1");
                assert_eq!(match_data.side_a, vec!["uid-a1".to_string()]);
                assert_eq!(match_data.side_b, vec!["uid-b1".to_string()]);
            }
            other => panic!("expected a match, got {other:?}"),
        }
        // The joiner left the queue; the host entry remains.
        assert_eq!(engine.queued_players.len(), 1);
        assert_eq!(engine.queued_players[0].session_token, "token-a1");
        assert_eq!(engine.open_lobby(&match_id).unwrap().non_hosts.len(), 1);
    }

    #[test]
    fn test_started_lobby_accepts_no_joiners() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);
        engine.register_match(&match_id, "blob".to_string()).unwrap();
        engine.open_lobby_mut(&match_id).unwrap().has_started = true;

        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        assert!(engine.poll_status(Side::B, &survivor).is_none());
    }

    #[test]
    fn test_fifth_survivor_never_matches_a_full_lobby() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);
        engine.register_match(&match_id, "blob".to_string()).unwrap();

        for i in 0..4 {
            let survivor = test_session(&format!("b{i}"));
            engine.enqueue(&queue_request(Side::B), &survivor);
            assert!(matches!(
                engine.poll_status(Side::B, &survivor),
                Some(QueueResponse::Matched { .. })
            ));
        }
        assert_eq!(engine.open_lobby(&match_id).unwrap().non_hosts.len(), 4);

        // With the only lobby full, the fifth survivor gets no decision.
        let fifth = test_session("b4");
        engine.enqueue(&queue_request(Side::B), &fifth);
        assert!(engine.poll_status(Side::B, &fifth).is_none());
        assert_eq!(engine.open_lobby(&match_id).unwrap().non_hosts.len(), 4);

        // Once a second ready lobby exists, the fifth survivor routes there.
        let host2 = test_session("a2");
        let match_id2 = open_lobby_for(&mut engine, &host2);
        engine.register_match(&match_id2, "blob".to_string()).unwrap();
        match engine.poll_status(Side::B, &fifth) {
            Some(QueueResponse::Matched { match_data, .. }) => {
                assert_eq!(match_data.match_id, match_id2);
            }
            other => panic!("expected a match in the second lobby, got {other:?}"),
        }
    }

    #[test]
    fn test_host_polls_always_open_new_lobbies() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let first = open_lobby_for(&mut engine, &host);
        // Hosts are not dequeued on lobby creation; a second poll opens a
        // second lobby.
        let second = match engine.poll_status(Side::A, &host) {
            Some(QueueResponse::Matched { match_data, .. }) => match_data.match_id,
            other => panic!("expected a second lobby, got {other:?}"),
        };
        assert_ne!(first, second);
        assert!(engine.open_lobby(&first).is_some());
        assert!(engine.open_lobby(&second).is_some());
    }

    #[test]
    fn test_duplicate_enqueue_is_permitted() {
        let mut engine = MatchmakingEngine::new();
        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        engine.enqueue(&queue_request(Side::B), &survivor);
        assert_eq!(engine.queued_players.len(), 2);
    }

    #[test]
    fn test_cancel_removes_queue_entry() {
        let mut engine = MatchmakingEngine::new();
        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        engine.cancel(&survivor.token);
        assert!(engine.queued_players.is_empty());
        // Cancelling again is a no-op.
        engine.cancel(&survivor.token);
    }

    #[test]
    fn test_register_match_unknown_lobby() {
        let mut engine = MatchmakingEngine::new();
        assert!(engine.register_match("nope", "blob".to_string()).is_none());
    }

    #[test]
    fn test_is_owner_before_and_after_ready() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);

        assert!(engine.is_owner(&match_id, "token-a1"));
        assert!(!engine.is_owner(&match_id, "token-b1"));

        engine.register_match(&match_id, "blob".to_string()).unwrap();
        assert!(engine.is_owner(&match_id, "token-a1"));
        assert!(!engine.is_owner(&match_id, "token-b1"));
        assert!(!engine.is_owner("unknown-match", "token-a1"));
    }

    #[test]
    fn test_delete_then_describe_then_reap() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);
        engine.register_match(&match_id, "blob".to_string()).unwrap();

        engine.delete_match(&match_id);
        assert!(engine.open_lobby(&match_id).is_none());

        let descriptor = engine.build_match_descriptor(&match_id, true).unwrap();
        assert_eq!(descriptor.status, MatchStatus::Killed);

        // Within the retention window the killed lobby survives a reap.
        engine.reap_expired();
        assert!(engine.build_match_descriptor(&match_id, true).is_some());

        // Past the window it is purged.
        let killed_at = engine.killed_lobbies[0].killed_time;
        engine.reap_expired_at(killed_at + KILLED_LOBBY_RETENTION_SECS * 1000 + 1);
        assert!(engine.build_match_descriptor(&match_id, true).is_none());
    }

    #[test]
    fn test_delete_match_unknown_is_noop() {
        let mut engine = MatchmakingEngine::new();
        engine.delete_match("nope");
        assert!(engine.killed_lobbies.is_empty());
    }

    /// Full lifecycle: host opens and registers, survivor joins, host kills.
    #[test]
    fn test_full_match_lifecycle() {
        let mut engine = MatchmakingEngine::new();
        let host = test_session("a1");
        let match_id = open_lobby_for(&mut engine, &host);
        assert!(!engine.open_lobby(&match_id).unwrap().is_ready);

        let descriptor = engine
            .register_match(&match_id, "settings".to_string())
            .unwrap();
        assert_eq!(descriptor.status, MatchStatus::Opened);
        assert_eq!(
            descriptor.custom_data.session_settings.as_deref(),
            Some("settings")
        );
        assert!(engine.open_lobby(&match_id).unwrap().is_ready);

        let survivor = test_session("b1");
        engine.enqueue(&queue_request(Side::B), &survivor);
        match engine.poll_status(Side::B, &survivor) {
            Some(QueueResponse::Matched { match_data, .. }) => {
                assert_eq!(match_data.side_a, vec!["uid-a1".to_string()]);
                assert_eq!(match_data.side_b, vec!["uid-b1".to_string()]);
            }
            other => panic!("expected a match, got {other:?}"),
        }
        assert_eq!(engine.open_lobby(&match_id).unwrap().non_hosts.len(), 1);

        engine.delete_match(&match_id);
        let descriptor = engine.build_match_descriptor(&match_id, true).unwrap();
        assert_eq!(descriptor.status, MatchStatus::Killed);
        assert_eq!(descriptor.side_b, vec!["uid-b1".to_string()]);
    }
}
