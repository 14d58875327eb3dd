/// Session configuration constants.
///
/// This module defines parameters for session issuance: validity length,
/// token layout, and the fixed guest-session suffix the client expects.
pub const SESSION_LENGTH_SECS: u64 = 86_400; // Sessions are valid for one day.

/// Lengths of the three random parts of a session token.
/// Parts 1, 2, and 5 of the dotted token might have some significance
/// to the client; only their shape is reproduced here.
pub const TOKEN_PART1_LEN: usize = 22;
pub const TOKEN_PART2_LEN: usize = 192;
pub const TOKEN_PART5_LEN: usize = 43;

/// Fixed signature suffix of the guest-session cookie.
pub const GUEST_SESSION_SUFFIX: &str = "fftvtIJbNVAHHDFQLQeDHquBvH/hZ+Ywhf+/oOe34PM";

/// Total XP granted to a freshly created session (level 1, no prestige).
pub const STARTING_TOTAL_XP: u64 = 0;
