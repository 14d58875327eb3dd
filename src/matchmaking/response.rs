//! Client-facing matchmaking descriptors.
//!
//! The client validates these against a fixed schema; every key spelling and
//! constant below is load-bearing and must be reproduced verbatim.

use serde::Serialize;

use crate::session::UserId;
use crate::util::now_millis;

use super::types::Lobby;

/// Fixed category string stamped on every match descriptor.
const CATEGORY: &str = "oman-100372-dev:None:Windows:::1:4:0:G:2";

/// Static peer-to-peer encryption key the client expects in `props`.
const ENCRYPTION_KEY: &str = "Rpqy9fgpIWrHxjJpiwnJJtoZ2hbUZZ4paU+0n4K/iZI=";

/// Placeholder queue estimate; the client ignores negative ETAs.
const QUEUE_ETA_MS: i64 = -10_000;

/// Lifecycle status of a match descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Created,
    Opened,
    Killed,
}

/// Status of a queue poll.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Matched,
    Queued,
}

/// The full match descriptor embedded in queue and match responses.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    pub category: String,
    pub churn: u32,
    pub creation_date_time: u64,
    pub creator: UserId,
    pub custom_data: CustomData,
    pub geolocation: serde_json::Map<String, serde_json::Value>,
    pub match_id: String,
    pub props: MatchProps,
    pub rank: u32,
    pub reason: String,
    pub schema: u32,
    pub side_a: Vec<UserId>,
    pub side_b: Vec<UserId>,
    pub skill: SkillInfo,
    pub status: MatchStatus,
    pub version: u32,
}

#[derive(Clone, Serialize, Debug)]
pub struct CustomData {
    #[serde(rename = "SessionSettings", skip_serializing_if = "Option::is_none")]
    pub session_settings: Option<String>,
}

#[derive(Clone, Serialize, Debug)]
pub struct MatchProps {
    #[serde(rename = "countA")]
    pub count_a: u32,
    #[serde(rename = "countB")]
    pub count_b: u32,
    #[serde(rename = "EncryptionKey")]
    pub encryption_key: String,
    #[serde(rename = "gameMode")]
    pub game_mode: String,
    pub platform: String,
}

/// Static skill/region table; the client rejects descriptors without it.
#[derive(Clone, Serialize, Debug)]
pub struct SkillInfo {
    pub continent: String,
    pub country: String,
    pub latitude: i32,
    pub longitude: i32,
    pub rank: u32,
    pub rating: SkillRating,
    pub regions: RegionPreferences,
    pub version: u32,
    pub x: u32,
}

#[derive(Clone, Serialize, Debug)]
pub struct SkillRating {
    pub rating: u32,
    #[serde(rename = "RD")]
    pub rd: f64,
    pub volatility: f64,
}

#[derive(Clone, Serialize, Debug)]
pub struct RegionPreferences {
    pub good: Vec<String>,
    pub ok: Vec<String>,
}

/// A queue poll response, serialized exactly as the client expects.
#[derive(Clone, Serialize, Debug)]
#[serde(untagged)]
pub enum QueueResponse {
    /// Player matched into a lobby.
    #[serde(rename_all = "camelCase")]
    Matched {
        status: QueueStatus,
        match_data: MatchData,
    },
    /// Still waiting for a lobby to open.
    #[serde(rename_all = "camelCase")]
    Queued {
        queue_data: QueueEstimate,
        status: QueueStatus,
    },
    /// Caller is not in the queue.
    Empty {},
}

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QueueEstimate {
    #[serde(rename = "ETA")]
    pub eta: i64,
    pub position: u32,
    pub size_a: u32,
    pub size_b: u32,
}

impl QueueResponse {
    pub fn empty() -> Self {
        QueueResponse::Empty {}
    }

    /// Response for a side-B player with no open lobbies to scan.
    pub(crate) fn queued() -> Self {
        QueueResponse::Queued {
            queue_data: QueueEstimate {
                eta: QUEUE_ETA_MS,
                position: 0,
                size_a: 0,
                size_b: 1,
            },
            status: QueueStatus::Queued,
        }
    }

    /// Response for a player matched into the lobby `match_id`.
    pub(crate) fn matched(creator: &UserId, match_id: &str, joiner: Option<&UserId>) -> Self {
        QueueResponse::Matched {
            status: QueueStatus::Matched,
            match_data: MatchData {
                category: CATEGORY.to_string(),
                churn: 0,
                creation_date_time: now_millis(),
                creator: creator.clone(),
                custom_data: CustomData {
                    session_settings: None,
                },
                geolocation: serde_json::Map::new(),
                match_id: match_id.to_string(),
                props: MatchProps::fixed(),
                rank: 1,
                reason: String::new(),
                schema: 3,
                side_a: vec![creator.clone()],
                side_b: joiner.map(|id| vec![id.clone()]).unwrap_or_default(),
                skill: SkillInfo::fixed(),
                status: MatchStatus::Created,
                version: 1,
            },
        }
    }
}

impl MatchData {
    /// Full descriptor for an open or killed lobby.
    pub(crate) fn for_lobby(lobby: &Lobby, killed: bool) -> Self {
        MatchData {
            category: CATEGORY.to_string(),
            churn: 0,
            creation_date_time: now_millis(),
            creator: lobby.host.user_id.clone(),
            custom_data: CustomData {
                session_settings: Some(lobby.session_settings.clone().unwrap_or_default()),
            },
            geolocation: serde_json::Map::new(),
            match_id: lobby.id.clone(),
            props: MatchProps::fixed(),
            rank: 1,
            reason: lobby.reason.clone().unwrap_or_default(),
            schema: 3,
            side_a: vec![lobby.host.user_id.clone()],
            side_b: lobby
                .non_hosts
                .iter()
                .map(|player| player.user_id.clone())
                .collect(),
            skill: SkillInfo::fixed(),
            status: if killed {
                MatchStatus::Killed
            } else {
                MatchStatus::Opened
            },
            version: 2,
        }
    }
}

impl MatchProps {
    fn fixed() -> Self {
        MatchProps {
            count_a: 1,
            count_b: 4,
            encryption_key: ENCRYPTION_KEY.to_string(),
            game_mode: "None".to_string(),
            platform: "Windows".to_string(),
        }
    }
}

impl SkillInfo {
    fn fixed() -> Self {
        SkillInfo {
            continent: "NA".to_string(),
            country: "US".to_string(),
            latitude: 0,
            longitude: 0,
            rank: 20,
            rating: SkillRating {
                rating: 1500,
                rd: 347.4356,
                volatility: 0.06,
            },
            regions: RegionPreferences {
                good: vec!["us-east-1".to_string()],
                ok: vec!["us-east-1".to_string()],
            },
            version: 2,
            x: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchmaking::types::{QueuedPlayer, Side};

    fn sample_lobby() -> Lobby {
        Lobby {
            id: "match-1".to_string(),
            host: QueuedPlayer {
                session_token: "host-token".to_string(),
                user_id: "host-id".to_string(),
                side: Side::A,
                queued_at: 0,
            },
            non_hosts: vec![QueuedPlayer {
                session_token: "joiner-token".to_string(),
                user_id: "joiner-id".to_string(),
                side: Side::B,
                queued_at: 0,
            }],
            is_ready: true,
            has_started: false,
            session_settings: Some("settings-blob".to_string()),
            reason: None,
        }
    }

    #[test]
    fn test_match_descriptor_wire_shape() {
        let value = serde_json::to_value(MatchData::for_lobby(&sample_lobby(), false)).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        let mut expected = vec![
            "category", "churn", "creationDateTime", "creator", "customData",
            "geolocation", "matchId", "props", "rank", "reason", "schema",
            "sideA", "sideB", "skill", "status", "version",
        ];
        let mut keys_sorted = keys.clone();
        keys_sorted.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys_sorted, expected);

        assert_eq!(value["category"], "oman-100372-dev:None:Windows:::1:4:0:G:2");
        assert_eq!(value["customData"]["SessionSettings"], "settings-blob");
        assert_eq!(value["props"]["EncryptionKey"], ENCRYPTION_KEY);
        assert_eq!(value["props"]["countA"], 1);
        assert_eq!(value["props"]["countB"], 4);
        assert_eq!(value["skill"]["rating"]["RD"], 347.4356);
        assert_eq!(value["skill"]["rating"]["volatility"], 0.06);
        assert_eq!(value["skill"]["regions"]["good"][0], "us-east-1");
        assert_eq!(value["sideA"][0], "host-id");
        assert_eq!(value["sideB"][0], "joiner-id");
        assert_eq!(value["status"], "OPENED");
        assert_eq!(value["version"], 2);
        assert_eq!(value["geolocation"], serde_json::json!({}));
    }

    #[test]
    fn test_killed_descriptor_status() {
        let value = serde_json::to_value(MatchData::for_lobby(&sample_lobby(), true)).unwrap();
        assert_eq!(value["status"], "KILLED");
    }

    #[test]
    fn test_queued_response_shape() {
        let value = serde_json::to_value(QueueResponse::queued()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "queueData": { "ETA": -10000, "position": 0, "sizeA": 0, "sizeB": 1 },
                "status": "QUEUED",
            })
        );
    }

    #[test]
    fn test_matched_response_shape() {
        let creator = "host-id".to_string();
        let joiner = "joiner-id".to_string();
        let value =
            serde_json::to_value(QueueResponse::matched(&creator, "match-1", Some(&joiner)))
                .unwrap();
        assert_eq!(value["status"], "MATCHED");
        assert_eq!(value["matchData"]["status"], "CREATED");
        assert_eq!(value["matchData"]["version"], 1);
        assert_eq!(value["matchData"]["sideA"], serde_json::json!(["host-id"]));
        assert_eq!(value["matchData"]["sideB"], serde_json::json!(["joiner-id"]));
        // A creator-only descriptor has an empty side B and no SessionSettings.
        let value = serde_json::to_value(QueueResponse::matched(&creator, "match-1", None)).unwrap();
        assert_eq!(value["matchData"]["sideB"], serde_json::json!([]));
        assert_eq!(value["matchData"]["customData"], serde_json::json!({}));
    }

    #[test]
    fn test_empty_response_is_empty_object() {
        let value = serde_json::to_value(QueueResponse::empty()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
