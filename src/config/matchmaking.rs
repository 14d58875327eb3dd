/// Matchmaking configuration constants.
///
/// This module defines parameters for the matchmaking queue and lobby pool,
/// such as lobby capacity and killed-lobby retention.
pub const KILLED_LOBBY_RETENTION_SECS: u64 = 5 * 60; // Killed lobbies stay queryable for 5 minutes.

/// Maximum number of non-host players a lobby can hold.
pub const MAX_NON_HOSTS: usize = 4;

/// How often (in seconds) the embedding scheduler should call the
/// killed-lobby reaper.
pub const REAP_INTERVAL_SECS: u64 = 10 * 60;
