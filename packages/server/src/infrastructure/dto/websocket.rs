//! WebSocket message DTOs.
//!
//! Frames are JSON objects tagged by `"type"` (kebab-case).

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Doubt record as sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubtDto {
    pub id: String,
    pub room_id: String,
    pub body: String,
    pub submitter: String,
    pub upvotes: u32,
    #[serde(default)]
    pub voters: Vec<String>,
    pub answered: bool,
    /// Unix timestamp (milliseconds)
    pub created_at: i64,
}

/// Client → server events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom {
        room_id: String,
        /// Claimed role; advisory only, never used for authorization
        #[serde(default)]
        role: Option<String>,
        identity: String,
    },
    SubmitDoubt {
        room_id: String,
        body: String,
        #[serde(default)]
        submitter: Option<String>,
    },
    VoteUp {
        room_id: String,
        doubt_id: String,
        #[serde(default)]
        voter: Option<String>,
    },
    VoteDown {
        room_id: String,
        doubt_id: String,
        #[serde(default)]
        voter: Option<String>,
    },
    ToggleAnswered {
        room_id: String,
        doubt_id: String,
    },
    CloseRoom {
        room_id: String,
    },
}

impl ClientMessage {
    /// Event name as it appears in the `"type"` tag
    pub fn action(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join-room",
            Self::SubmitDoubt { .. } => "submit-doubt",
            Self::VoteUp { .. } => "vote-up",
            Self::VoteDown { .. } => "vote-down",
            Self::ToggleAnswered { .. } => "toggle-answered",
            Self::CloseRoom { .. } => "close-room",
        }
    }
}

/// Server → client events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    RoomInfo {
        room_id: String,
        topic: Option<String>,
        role: Role,
    },
    DoubtSnapshot {
        doubts: Vec<DoubtDto>,
    },
    DoubtCreated {
        doubt: DoubtDto,
    },
    VoteUpApplied {
        doubt_id: String,
    },
    VoteDownApplied {
        doubt_id: String,
    },
    AnsweredToggled {
        doubt_id: String,
        answered: bool,
    },
    RoomClosed,
    RoomNotFound {
        room_id: String,
    },
    ActionRejected {
        action: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_parses_kebab_case_tag() {
        // テスト項目: type タグ（kebab-case）でクライアントイベントが判別される
        // given (前提条件):
        let json = r#"{"type":"vote-up","room_id":"12345","doubt_id":"d1","voter":"bob"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            msg,
            ClientMessage::VoteUp {
                room_id: "12345".to_string(),
                doubt_id: "d1".to_string(),
                voter: Some("bob".to_string()),
            }
        );
        assert_eq!(msg.action(), "vote-up");
    }

    #[test]
    fn test_join_room_role_is_optional() {
        // テスト項目: join-room の role は省略できる
        // given (前提条件):
        let json = r#"{"type":"join-room","room_id":"12345","identity":"alice"}"#;

        // when (操作):
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(matches!(msg, ClientMessage::JoinRoom { role: None, .. }));
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"delete-everything","room_id":"12345"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_room_closed_serializes_as_bare_tag() {
        // テスト項目: room-closed はフィールドを持たないタグのみの JSON になる
        // given (前提条件):
        let msg = ServerMessage::RoomClosed;

        // when (操作):
        let json = serde_json::to_string(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"room-closed"}"#);
    }

    #[test]
    fn test_answered_toggled_wire_format() {
        // テスト項目: answered-toggled が doubt_id と answered を含む
        // given (前提条件):
        let msg = ServerMessage::AnsweredToggled {
            doubt_id: "d1".to_string(),
            answered: true,
        };

        // when (操作):
        let value = serde_json::to_value(&msg).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({"type": "answered-toggled", "doubt_id": "d1", "answered": true})
        );
    }
}
