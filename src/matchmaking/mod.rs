/// Matchmaking module: player queue, lobby pool, and the protocol
/// descriptors clients consume.
pub mod engine;
pub mod response;
pub mod types;

pub use engine::MatchmakingEngine;
pub use response::{MatchData, MatchStatus, QueueResponse, QueueStatus};
pub use types::{Lobby, QueueRequest, QueuedPlayer, Side};
