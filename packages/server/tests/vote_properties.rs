//! Property tests for vote idempotence in the doubt store.

use proptest::prelude::*;
use undoubt_server::{
    domain::{DoubtBody, DoubtRepository, Identity, RoomId, Timestamp, VoteDirection},
    infrastructure::repository::InMemoryDoubtRepository,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn direction() -> impl Strategy<Value = VoteDirection> {
    prop_oneof![Just(VoteDirection::Up), Just(VoteDirection::Down)]
}

proptest! {
    /// Any sequence of votes leaves upvotes equal to the number of voters
    /// whose last vote was up.
    #[test]
    fn prop_upvotes_follow_last_vote_per_voter(
        votes in proptest::collection::vec((0usize..4, direction()), 0..40)
    ) {
        runtime().block_on(async {
            let repo = InMemoryDoubtRepository::new();
            let room = RoomId::new("12345".to_string()).unwrap();
            let doubt = repo
                .create_doubt(
                    room.clone(),
                    DoubtBody::new("question".to_string()).unwrap(),
                    Identity::new("alice".to_string()).unwrap(),
                    Timestamp::new(0),
                )
                .await
                .unwrap();

            let mut last = [None; 4];
            for (voter, dir) in &votes {
                let identity = Identity::new(format!("voter-{voter}")).unwrap();
                repo.apply_vote_delta(&room, &doubt.id, identity, *dir).await.unwrap();
                last[*voter] = Some(*dir);
            }

            let expected = last.iter().filter(|d| **d == Some(VoteDirection::Up)).count();
            let stored = repo.get_doubt(&room, &doubt.id).await.unwrap();
            prop_assert_eq!(stored.upvotes(), expected);
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Up then down restores the count and removes the voter.
    #[test]
    fn prop_up_then_down_round_trips(
        existing in 0usize..5,
        voter in "[a-z]{1,8}"
    ) {
        runtime().block_on(async {
            let repo = InMemoryDoubtRepository::new();
            let room = RoomId::new("12345".to_string()).unwrap();
            let doubt = repo
                .create_doubt(
                    room.clone(),
                    DoubtBody::new("question".to_string()).unwrap(),
                    Identity::new("alice".to_string()).unwrap(),
                    Timestamp::new(0),
                )
                .await
                .unwrap();
            for i in 0..existing {
                let other = Identity::new(format!("other-{i}")).unwrap();
                repo.apply_vote_delta(&room, &doubt.id, other, VoteDirection::Up).await.unwrap();
            }
            let identity = Identity::new(voter).unwrap();

            let up = repo
                .apply_vote_delta(&room, &doubt.id, identity.clone(), VoteDirection::Up)
                .await
                .unwrap();
            let repeat = repo
                .apply_vote_delta(&room, &doubt.id, identity.clone(), VoteDirection::Up)
                .await
                .unwrap();
            let down = repo
                .apply_vote_delta(&room, &doubt.id, identity.clone(), VoteDirection::Down)
                .await
                .unwrap();

            prop_assert_eq!(up.doubt.upvotes(), existing + 1);
            prop_assert!(!repeat.changed);
            prop_assert_eq!(repeat.doubt.upvotes(), existing + 1);
            prop_assert_eq!(down.doubt.upvotes(), existing);
            prop_assert!(!down.doubt.has_voted(&identity));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
