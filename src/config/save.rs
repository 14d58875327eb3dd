/// Save storage configuration constants.
///
/// This module defines where player saves live on disk and the starting
/// values injected into the default save.
pub const SAVES_DIR: &str = "saves"; // Directory holding per-user save blobs.

/// Filename prefix for a user's save blob.
pub const SAVE_FILE_PREFIX: &str = "save_";

/// Path of the plaintext default save shipped with the server.
pub const DEFAULT_SAVE_PATH: &str = "json/defaultSave.json";

/// Bonus bloodpoints granted on a fresh save.
/// These are bonus points, and as such can be over 1,000,000.
pub const STARTING_BLOODPOINTS: u64 = 1_000_000;
