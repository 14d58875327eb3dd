//! Generators for session cookies and client ids.

use rand::Rng;

use crate::config::session::{
    GUEST_SESSION_SUFFIX, TOKEN_PART1_LEN, TOKEN_PART2_LEN, TOKEN_PART5_LEN,
};

use super::types::ClientIds;

/// Characters which can appear in a session-token part.
const TOKEN_CHAR_POOL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const HEX_DIGITS: &[u8] = b"0123456789abcdef";

/// Generates a random string of the given length from the token pool.
pub fn friendly_random_string(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TOKEN_CHAR_POOL[rng.random_range(0..TOKEN_CHAR_POOL.len())] as char)
        .collect()
}

/// Generates a new session token.
///
/// Five dot-joined parts: two random strings, the creation time and validity
/// length in milliseconds, and a final random string.
pub fn session_token(now_secs: u64, valid_for_secs: u64) -> String {
    format!(
        "{}.{}.{}.{}.{}",
        friendly_random_string(TOKEN_PART1_LEN),
        friendly_random_string(TOKEN_PART2_LEN),
        now_secs * 1000,
        valid_for_secs * 1000,
        friendly_random_string(TOKEN_PART5_LEN),
    )
}

/// Generates the guest-session cookie for the given token id.
pub fn guest_session(token_id: &str) -> String {
    format!("s:{token_id}.{GUEST_SESSION_SUFFIX}")
}

/// Generates a random sequence of hexadecimal digits, drawing from digits
/// `0` through `max`.
fn random_hex_digits(count: usize, max: u8) -> String {
    let mut rng = rand::rng();
    let pool = &HEX_DIGITS[..=max as usize];
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())] as char)
        .collect()
}

/// Generates a user-style id.
///
/// The client only requires UUID shape; ids are zero except for the random
/// last group, whose first digit never exceeds `e`.
pub fn legacy_uuid() -> String {
    format!(
        "00000000-0000-0000-0000-{}{}",
        random_hex_digits(1, 0xe),
        random_hex_digits(11, 0xf),
    )
}

/// Generates the id set for a new guest session.
pub fn client_ids() -> ClientIds {
    ClientIds {
        token_id: legacy_uuid(),
        user_id: legacy_uuid(),
        guest_token: Some(legacy_uuid()),
    }
}
