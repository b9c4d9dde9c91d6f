//! Conversion logic between DTOs and domain entities.

use undoubt_shared::time::timestamp_to_rfc3339;

use crate::domain::{entity, RoomEvent, VoteDirection};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&entity::Doubt> for dto::DoubtDto {
    fn from(model: &entity::Doubt) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            room_id: model.room_id.as_str().to_string(),
            body: model.body.as_str().to_string(),
            submitter: model.submitter.as_str().to_string(),
            upvotes: u32::try_from(model.upvotes()).unwrap_or(u32::MAX),
            voters: model.voters.iter().map(|v| v.as_str().to_string()).collect(),
            answered: model.answered,
            created_at: model.created_at.value(),
        }
    }
}

impl From<entity::Doubt> for dto::DoubtDto {
    fn from(model: entity::Doubt) -> Self {
        Self::from(&model)
    }
}

impl From<&entity::Room> for http::RoomDto {
    fn from(model: &entity::Room) -> Self {
        Self {
            room_id: model.id.as_str().to_string(),
            host_id: model.host.as_str().to_string(),
            host_contact: model.host_contact.as_str().to_string(),
            topic: model.topic.as_ref().map(|t| t.as_str().to_string()),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<entity::Room> for http::RoomDto {
    fn from(model: entity::Room) -> Self {
        Self::from(&model)
    }
}

// ========================================
// Room Event → Wire Message
// ========================================

impl From<&RoomEvent> for dto::ServerMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::RoomInfo { room, role } => Self::RoomInfo {
                room_id: room.id.as_str().to_string(),
                topic: room.topic.as_ref().map(|t| t.as_str().to_string()),
                role: *role,
            },
            RoomEvent::DoubtSnapshot(doubts) => Self::DoubtSnapshot {
                doubts: doubts.iter().map(dto::DoubtDto::from).collect(),
            },
            RoomEvent::DoubtCreated(doubt) => Self::DoubtCreated {
                doubt: doubt.into(),
            },
            RoomEvent::VoteApplied {
                doubt_id,
                direction: VoteDirection::Up,
            } => Self::VoteUpApplied {
                doubt_id: doubt_id.as_str().to_string(),
            },
            RoomEvent::VoteApplied {
                doubt_id,
                direction: VoteDirection::Down,
            } => Self::VoteDownApplied {
                doubt_id: doubt_id.as_str().to_string(),
            },
            RoomEvent::AnsweredToggled { doubt_id, answered } => Self::AnsweredToggled {
                doubt_id: doubt_id.as_str().to_string(),
                answered: *answered,
            },
            RoomEvent::RoomClosed => Self::RoomClosed,
            RoomEvent::RoomNotFound(room_id) => Self::RoomNotFound {
                room_id: room_id.as_str().to_string(),
            },
            RoomEvent::ActionRejected { action, reason } => Self::ActionRejected {
                action: action.to_string(),
                reason: reason.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DoubtBody, DoubtId, HostContact, Identity, Role, RoomId, Timestamp, Topic,
    };

    fn sample_room() -> entity::Room {
        entity::Room::new(
            RoomId::new("12345".to_string()).unwrap(),
            Identity::new("host-1".to_string()).unwrap(),
            HostContact::new("host@example.com".to_string()).unwrap(),
            Topic::parse(Some("Ownership".to_string())).unwrap(),
            Timestamp::new(0),
        )
    }

    fn sample_doubt() -> entity::Doubt {
        entity::Doubt::new(
            DoubtId::new("d1".to_string()).unwrap(),
            RoomId::new("12345".to_string()).unwrap(),
            DoubtBody::new("What is a lifetime?".to_string()).unwrap(),
            Identity::new("alice".to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_doubt_to_dto_counts_voters() {
        // テスト項目: Doubt を DTO に変換すると voters の数が upvotes になる
        // given (前提条件):
        let mut doubt = sample_doubt();
        doubt.apply_vote(Identity::new("bob".to_string()).unwrap(), VoteDirection::Up);
        doubt.apply_vote(Identity::new("carol".to_string()).unwrap(), VoteDirection::Up);

        // when (操作):
        let dto = dto::DoubtDto::from(&doubt);

        // then (期待する結果):
        assert_eq!(dto.id, "d1");
        assert_eq!(dto.upvotes, 2);
        assert_eq!(dto.voters, vec!["bob".to_string(), "carol".to_string()]);
        assert!(!dto.answered);
        assert_eq!(dto.created_at, 1000);
    }

    #[test]
    fn test_room_to_dto_formats_created_at() {
        // テスト項目: Room を DTO に変換すると作成日時が RFC 3339 になる
        // given (前提条件):
        let room = sample_room();

        // when (操作):
        let dto = http::RoomDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.room_id, "12345");
        assert_eq!(dto.host_id, "host-1");
        assert_eq!(dto.topic.as_deref(), Some("Ownership"));
        assert_eq!(dto.created_at, "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_room_info_event_carries_resolved_role() {
        // テスト項目: RoomInfo イベントはサーバー側で決定したロールを含む
        // given (前提条件):
        let event = RoomEvent::RoomInfo {
            room: sample_room(),
            role: Role::Host,
        };

        // when (操作):
        let msg = dto::ServerMessage::from(&event);

        // then (期待する結果):
        assert_eq!(
            msg,
            dto::ServerMessage::RoomInfo {
                room_id: "12345".to_string(),
                topic: Some("Ownership".to_string()),
                role: Role::Host,
            }
        );
    }

    #[test]
    fn test_vote_events_map_to_direction_specific_messages() {
        // テスト項目: 投票イベントは方向ごとのメッセージに変換される
        // given (前提条件):
        let doubt_id = DoubtId::new("d1".to_string()).unwrap();
        let up = RoomEvent::VoteApplied {
            doubt_id: doubt_id.clone(),
            direction: VoteDirection::Up,
        };
        let down = RoomEvent::VoteApplied {
            doubt_id,
            direction: VoteDirection::Down,
        };

        // when (操作):
        let up_msg = dto::ServerMessage::from(&up);
        let down_msg = dto::ServerMessage::from(&down);

        // then (期待する結果):
        assert!(matches!(up_msg, dto::ServerMessage::VoteUpApplied { .. }));
        assert!(matches!(down_msg, dto::ServerMessage::VoteDownApplied { .. }));
    }
}
