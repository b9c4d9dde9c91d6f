//! Terminal helpers.

use std::io::Write;

/// Prompt shown by the line editor
pub fn prompt(room_id: &str, identity: &str) -> String {
    format!("[{}] {}> ", room_id, identity)
}

/// Redisplay the prompt after printing an event
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    std::io::stdout().flush().ok();
}
