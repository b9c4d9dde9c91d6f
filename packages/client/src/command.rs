//! Parsing of lines typed at the prompt.

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: submit it as a new doubt
    Submit(String),
    /// `/vote N`: toggle this identity's up-vote on doubt N
    Vote(usize),
    /// `/answer N`: toggle the answered flag (host only)
    Answer(usize),
    /// `/close`: close the room (host only)
    Close,
    /// `/list`: reprint the current listing
    List,
    /// `/similar TEXT`: show the closest existing doubt
    Similar(String),
    /// `/export PATH`: write the listing to a text file
    Export(String),
    Help,
    Quit,
}

/// Usage text for `/help`
pub const HELP: &str = "\
Type a doubt and press Enter to submit it.
  /vote N        toggle your vote on doubt N
  /answer N      mark doubt N answered or active again (host)
  /close         close the room for everyone (host)
  /list          show all doubts
  /similar TEXT  show the closest existing doubt
  /export PATH   save the doubts to a text file
  /help          show this help
  /quit          leave the room
";

/// Parse one input line.
///
/// Returns `Err` with a user-facing message for malformed commands.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Ok(Command::Submit(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name {
        "/vote" | "/v" => number(rest, "/vote").map(Command::Vote),
        "/answer" | "/a" => number(rest, "/answer").map(Command::Answer),
        "/close" => Ok(Command::Close),
        "/list" | "/ls" => Ok(Command::List),
        "/similar" => non_empty(rest, "/similar TEXT").map(Command::Similar),
        "/export" => non_empty(rest, "/export PATH").map(Command::Export),
        "/help" | "/h" => Ok(Command::Help),
        "/quit" | "/q" | "/exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{}'. Type /help.", other)),
    }
}

fn number(arg: &str, usage: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {} N (N is the number shown in the list)", usage)),
    }
}

fn non_empty(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(arg.to_string())
    }
}
