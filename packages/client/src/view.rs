//! Local view of a room.
//!
//! The view is built from one `doubt-snapshot` and then patched by each
//! streamed event. Patches are keyed by doubt id and do not depend on arrival
//! order; presentation order is computed from the accumulated state.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use undoubt_server::{
    domain::Role,
    infrastructure::dto::websocket::{DoubtDto, ServerMessage},
};
use undoubt_shared::similarity::{self, BestMatch};

/// What an applied event changed
#[derive(Debug, Clone, PartialEq)]
pub enum ViewChange {
    Joined,
    Snapshot(usize),
    Created(DoubtDto),
    Voted { doubt_id: String, upvotes: u32 },
    Answered { doubt_id: String, answered: bool },
    Closed,
    NotFound(String),
    Rejected { action: String, reason: String },
    /// Event referenced something the view does not know, or arrived after close
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct RoomView {
    pub room_id: String,
    pub identity: String,
    pub topic: Option<String>,
    pub role: Option<Role>,
    doubts: HashMap<String, DoubtDto>,
    /// Doubts this identity currently up-votes
    my_votes: HashSet<String>,
    closed: bool,
}

impl RoomView {
    pub fn new(room_id: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            identity: identity.into(),
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_host(&self) -> bool {
        self.role.is_some_and(|role| role.is_host())
    }

    pub fn len(&self) -> usize {
        self.doubts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doubts.is_empty()
    }

    pub fn has_voted(&self, doubt_id: &str) -> bool {
        self.my_votes.contains(doubt_id)
    }

    /// Apply one server event
    pub fn apply(&mut self, message: &ServerMessage) -> ViewChange {
        if self.closed {
            return ViewChange::Ignored;
        }

        match message {
            ServerMessage::RoomInfo { room_id, topic, role } => {
                self.room_id = room_id.clone();
                self.topic = topic.clone();
                self.role = Some(*role);
                ViewChange::Joined
            }
            ServerMessage::DoubtSnapshot { doubts } => {
                self.doubts = doubts.iter().map(|d| (d.id.clone(), d.clone())).collect();
                self.my_votes = doubts
                    .iter()
                    .filter(|d| d.voters.iter().any(|v| v == &self.identity))
                    .map(|d| d.id.clone())
                    .collect();
                ViewChange::Snapshot(doubts.len())
            }
            ServerMessage::DoubtCreated { doubt } => {
                self.doubts.insert(doubt.id.clone(), doubt.clone());
                ViewChange::Created(doubt.clone())
            }
            ServerMessage::VoteUpApplied { doubt_id } => self.adjust_votes(doubt_id, 1),
            ServerMessage::VoteDownApplied { doubt_id } => self.adjust_votes(doubt_id, -1),
            ServerMessage::AnsweredToggled { doubt_id, answered } => {
                match self.doubts.get_mut(doubt_id) {
                    Some(doubt) => {
                        doubt.answered = *answered;
                        ViewChange::Answered {
                            doubt_id: doubt_id.clone(),
                            answered: *answered,
                        }
                    }
                    None => ViewChange::Ignored,
                }
            }
            ServerMessage::RoomClosed => {
                self.doubts.clear();
                self.my_votes.clear();
                self.closed = true;
                ViewChange::Closed
            }
            ServerMessage::RoomNotFound { room_id } => ViewChange::NotFound(room_id.clone()),
            ServerMessage::ActionRejected { action, reason } => ViewChange::Rejected {
                action: action.clone(),
                reason: reason.clone(),
            },
        }
    }

    fn adjust_votes(&mut self, doubt_id: &str, delta: i64) -> ViewChange {
        let Some(doubt) = self.doubts.get_mut(doubt_id) else {
            return ViewChange::Ignored;
        };
        doubt.upvotes = if delta >= 0 {
            doubt.upvotes.saturating_add(1)
        } else {
            doubt.upvotes.saturating_sub(1)
        };
        ViewChange::Voted {
            doubt_id: doubt_id.to_string(),
            upvotes: doubt.upvotes,
        }
    }

    /// Record this identity's own vote as sent; returns `true` for an up-vote
    pub fn toggle_my_vote(&mut self, doubt_id: &str) -> bool {
        if self.my_votes.remove(doubt_id) {
            false
        } else {
            self.my_votes.insert(doubt_id.to_string());
            true
        }
    }

    fn ranked(&self, answered: bool) -> Vec<&DoubtDto> {
        let mut doubts: Vec<&DoubtDto> = self
            .doubts
            .values()
            .filter(|d| d.answered == answered)
            .collect();
        doubts.sort_by(|a, b| rank(a, b));
        doubts
    }

    /// Unanswered doubts, most voted first
    pub fn active(&self) -> Vec<&DoubtDto> {
        self.ranked(false)
    }

    /// Answered doubts, most voted first
    pub fn answered(&self) -> Vec<&DoubtDto> {
        self.ranked(true)
    }

    /// Display order: active then answered. Numbers shown to the user are
    /// 1-based positions in this list.
    pub fn listing(&self) -> Vec<&DoubtDto> {
        let mut listing = self.active();
        listing.extend(self.answered());
        listing
    }

    /// Doubt shown at 1-based position `number`
    pub fn by_number(&self, number: usize) -> Option<&DoubtDto> {
        number
            .checked_sub(1)
            .and_then(|index| self.listing().get(index).copied())
    }

    /// Plain-text export, one `N. text [Active|Answered]` line per doubt
    pub fn export_text(&self) -> String {
        self.listing()
            .iter()
            .enumerate()
            .map(|(index, doubt)| {
                let status = if doubt.answered { "Answered" } else { "Active" };
                format!("{}. {} [{}]", index + 1, doubt.body, status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Closest existing doubt to a draft
    pub fn similarity_hint(&self, draft: &str) -> Option<(BestMatch, &DoubtDto)> {
        if draft.trim().is_empty() {
            return None;
        }
        let listing = self.listing();
        let bodies: Vec<&str> = listing.iter().map(|d| d.body.as_str()).collect();
        let best = similarity::best_match(draft, &bodies)?;
        listing.get(best.index).map(|doubt| (best, *doubt))
    }
}

fn rank(a: &DoubtDto, b: &DoubtDto) -> Ordering {
    b.upvotes
        .cmp(&a.upvotes)
        .then(a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
