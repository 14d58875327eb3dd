use serde::{Deserialize, Serialize};

use crate::session::{SessionToken, UserId};

/// Asymmetric match role: one side-A host against up to four side-B joiners.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Side {
    A,
    B,
}

/// A client's matchmaking queue request.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    pub side: Side,
    #[serde(default)]
    pub check_only: bool,
    #[serde(default)]
    pub latencies: Vec<RegionLatency>,
}

/// Client-measured latency to one region.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RegionLatency {
    pub region_name: String,
    pub latency: u32,
}

/// A player waiting in the matchmaking queue.
#[derive(Clone, Debug)]
pub struct QueuedPlayer {
    pub session_token: SessionToken,
    pub user_id: UserId,
    pub side: Side,
    /// When the player entered the queue, UNIX milliseconds.
    pub queued_at: u64,
}

/// An in-progress match assembly: one host plus up to four joiners.
#[derive(Clone, Debug)]
pub struct Lobby {
    /// Opaque match id handed to clients.
    pub id: String,
    pub host: QueuedPlayer,
    pub non_hosts: Vec<QueuedPlayer>,
    /// Set once the host has registered its session settings; only ready
    /// lobbies accept joiners.
    pub is_ready: bool,
    pub has_started: bool,
    /// Host-supplied blob used for peer-to-peer connection setup.
    pub session_settings: Option<String>,
    pub reason: Option<String>,
}

/// A deleted lobby, retained for late status queries until reaped.
#[derive(Clone, Debug)]
pub struct KilledLobby {
    pub lobby: Lobby,
    /// When the lobby was killed, UNIX milliseconds.
    pub killed_time: u64,
}
