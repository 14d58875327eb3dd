//! Core engines for a self-hosted backend compatible with the game's
//! proprietary client: the save-file codec, the matchmaking queue/lobby
//! state machine, and the session layer they share.
//!
//! HTTP routing, configuration files, and reaper scheduling are owned by the
//! embedding server. Everything here is synchronous and performs no I/O
//! beyond the flat-file save store.

pub mod config;
pub mod matchmaking;
pub mod save;
pub mod session;
pub mod util;
