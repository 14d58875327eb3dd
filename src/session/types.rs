use serde::{Deserialize, Serialize};

/// Opaque session cookie identifying a connected player.
pub type SessionToken = String;

/// Player user id, in the UUID string form used on the wire.
pub type UserId = String;

/// Ids issued to a client when its session is created.
#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClientIds {
    pub token_id: String,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_token: Option<String>,
}

/// An active player session.
#[derive(Clone, Debug)]
pub struct Session {
    /// The session cookie, also the key the manager stores the session under.
    pub token: SessionToken,
    /// Guest-session cookie derived from the token id.
    pub guest_session: String,
    pub client_ids: ClientIds,
    /// Expiry as a UNIX timestamp in seconds.
    pub expires: u64,
    pub total_xp: u64,
}
