//! Message formatting utilities for client display.

use chrono::{DateTime, Local, Utc};
use undoubt_server::infrastructure::dto::websocket::DoubtDto;
use undoubt_shared::similarity::BestMatch;

use crate::view::RoomView;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner printed after joining
    ///
    /// # Arguments
    ///
    /// * `view` - The view right after `room-info` was applied
    ///
    /// # Returns
    ///
    /// A formatted string with the room id, topic and role
    pub fn format_room_info(view: &RoomView) -> String {
        let role = if view.is_host() { "host" } else { "participant" };
        let topic = view.topic.as_deref().unwrap_or("(no topic)");
        format!(
            "\n{}\nRoom {} - {}\nYou are '{}' ({}). Type /help for commands.\n{}\n",
            RULE, view.room_id, topic, view.identity, role, RULE
        )
    }

    /// Format the full listing, active doubts first
    ///
    /// Numbers match the ones accepted by `/vote` and `/answer`.
    pub fn format_listing(view: &RoomView) -> String {
        let mut output = String::new();
        let active = view.active();
        let answered = view.answered();

        output.push_str(&format!("\nActive ({}):\n", active.len()));
        if active.is_empty() {
            output.push_str("  (none)\n");
        }
        for (index, doubt) in active.iter().enumerate() {
            output.push_str(&Self::format_line(index + 1, doubt, view.has_voted(&doubt.id)));
        }

        output.push_str(&format!("Answered ({}):\n", answered.len()));
        if answered.is_empty() {
            output.push_str("  (none)\n");
        }
        for (index, doubt) in answered.iter().enumerate() {
            output.push_str(&Self::format_line(
                active.len() + index + 1,
                doubt,
                view.has_voted(&doubt.id),
            ));
        }
        output
    }

    fn format_line(number: usize, doubt: &DoubtDto, voted: bool) -> String {
        let marker = if voted { "*" } else { " " };
        format!(
            "  {:>3}. [{:>2}{}] {} ({}, {})\n",
            number,
            doubt.upvotes,
            marker,
            doubt.body,
            doubt.submitter,
            Self::format_time(doubt.created_at)
        )
    }

    /// Format a newly created doubt
    pub fn format_created(doubt: &DoubtDto) -> String {
        format!(
            "\n+ {} asked at {}: {}\n",
            doubt.submitter,
            Self::format_time(doubt.created_at),
            doubt.body
        )
    }

    /// Format a vote count change
    pub fn format_voted(body: &str, upvotes: u32) -> String {
        format!("\n~ {} vote(s): {}\n", upvotes, body)
    }

    /// Format an answered toggle
    pub fn format_answered(body: &str, answered: bool) -> String {
        if answered {
            format!("\n✓ answered: {}\n", body)
        } else {
            format!("\n↺ active again: {}\n", body)
        }
    }

    pub fn format_room_closed(room_id: &str) -> String {
        format!("\nRoom {} was closed by the host.\n", room_id)
    }

    pub fn format_room_not_found(room_id: &str) -> String {
        format!("\nRoom {} does not exist.\n", room_id)
    }

    pub fn format_rejected(action: &str, reason: &str) -> String {
        format!("\n! {} rejected: {}\n", action, reason)
    }

    /// Format a duplicate hint for a draft
    ///
    /// # Arguments
    ///
    /// * `best` - The best scoring match, if any doubt exists
    ///
    /// # Returns
    ///
    /// A line with the percentage and the closest doubt
    pub fn format_similarity(best: Option<(BestMatch, &DoubtDto)>) -> String {
        match best {
            Some((best, doubt)) => format!(
                "\n{:.0}% similar ({:?}): {}\n",
                best.percent(),
                best.level(),
                doubt.body
            ),
            None => "\nNo similar doubts.\n".to_string(),
        }
    }

    /// Format a local message (help, usage errors, export results)
    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text.trim_end())
    }

    /// Local wall-clock time of a creation timestamp (milliseconds)
    pub fn format_time(timestamp_millis: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
            .unwrap_or_default()
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
