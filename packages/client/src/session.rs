//! WebSocket client session management.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use undoubt_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use undoubt_shared::similarity::SimilarityLevel;

use crate::{
    command::{self, Command},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
    view::{RoomView, ViewChange},
};

/// How a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/quit`, Ctrl+C or Ctrl+D
    UserQuit,
    /// The host closed the room
    RoomClosed,
}

/// Parameters for one connection
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub room_id: String,
    pub identity: String,
    pub role: Option<String>,
    pub prompt: String,
}

/// What the session does with one typed line
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    Send(ClientMessage),
    /// New doubt, with a duplicate hint when an existing doubt looks related
    Submit {
        hint: Option<String>,
        message: ClientMessage,
    },
    Print(String),
    Export { path: String, text: String },
    Quit,
}

/// Why the read side stopped
enum ReadEnd {
    RoomClosed,
    RoomNotFound,
    Lost,
}

/// Turn a typed line into a reaction against the current view
pub fn interpret(line: &str, view: &mut RoomView) -> Reaction {
    let command = match command::parse(line) {
        Ok(command) => command,
        Err(usage) => return Reaction::Print(MessageFormatter::format_notice(&usage)),
    };
    let room_id = view.room_id.clone();

    match command {
        Command::Submit(body) => {
            let hint = view
                .similarity_hint(&body)
                .filter(|(best, _)| best.level() != SimilarityLevel::Low)
                .map(|best| MessageFormatter::format_similarity(Some(best)));
            Reaction::Submit {
                hint,
                message: ClientMessage::SubmitDoubt {
                    room_id,
                    body,
                    submitter: Some(view.identity.clone()),
                },
            }
        }
        Command::Vote(number) => {
            let Some(doubt_id) = view.by_number(number).map(|d| d.id.clone()) else {
                return no_such_doubt(number);
            };
            let voter = Some(view.identity.clone());
            if view.toggle_my_vote(&doubt_id) {
                Reaction::Send(ClientMessage::VoteUp {
                    room_id,
                    doubt_id,
                    voter,
                })
            } else {
                Reaction::Send(ClientMessage::VoteDown {
                    room_id,
                    doubt_id,
                    voter,
                })
            }
        }
        Command::Answer(number) => {
            if !view.is_host() {
                return host_only("/answer");
            }
            match view.by_number(number) {
                Some(doubt) => Reaction::Send(ClientMessage::ToggleAnswered {
                    room_id,
                    doubt_id: doubt.id.clone(),
                }),
                None => no_such_doubt(number),
            }
        }
        Command::Close => {
            if !view.is_host() {
                return host_only("/close");
            }
            Reaction::Send(ClientMessage::CloseRoom { room_id })
        }
        Command::List => Reaction::Print(MessageFormatter::format_listing(view)),
        Command::Similar(draft) => {
            Reaction::Print(MessageFormatter::format_similarity(view.similarity_hint(&draft)))
        }
        Command::Export(path) => Reaction::Export {
            path,
            text: view.export_text(),
        },
        Command::Help => Reaction::Print(MessageFormatter::format_notice(command::HELP)),
        Command::Quit => Reaction::Quit,
    }
}

fn no_such_doubt(number: usize) -> Reaction {
    Reaction::Print(MessageFormatter::format_notice(&format!(
        "No doubt #{}. Type /list.",
        number
    )))
}

fn host_only(command: &str) -> Reaction {
    Reaction::Print(MessageFormatter::format_notice(&format!(
        "{} is only available to the host.",
        command
    )))
}

/// Render the output for one applied event, if any
fn render(change: &ViewChange, view: &RoomView) -> Option<String> {
    let body_of = |doubt_id: &str| {
        view.listing()
            .into_iter()
            .find(|d| d.id == doubt_id)
            .map(|d| d.body.clone())
            .unwrap_or_default()
    };

    match change {
        ViewChange::Joined => Some(MessageFormatter::format_room_info(view)),
        ViewChange::Snapshot(_) => Some(MessageFormatter::format_listing(view)),
        ViewChange::Created(doubt) => Some(MessageFormatter::format_created(doubt)),
        ViewChange::Voted { doubt_id, upvotes } => {
            Some(MessageFormatter::format_voted(&body_of(doubt_id.as_str()), *upvotes))
        }
        ViewChange::Answered { doubt_id, answered } => {
            Some(MessageFormatter::format_answered(&body_of(doubt_id.as_str()), *answered))
        }
        ViewChange::Closed => Some(MessageFormatter::format_room_closed(&view.room_id)),
        ViewChange::NotFound(room_id) => Some(MessageFormatter::format_room_not_found(room_id)),
        ViewChange::Rejected { action, reason } => {
            Some(MessageFormatter::format_rejected(action, reason))
        }
        ViewChange::Ignored => None,
    }
}

/// Run one WebSocket session.
///
/// Lines typed by the user arrive on `input_rx`, which outlives the session
/// so the line editor survives reconnects.
pub async fn run_client_session(
    config: &SessionConfig,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = connect_async(config.url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", config.url);

    let (mut write, mut read) = ws_stream.split();

    let join = ClientMessage::JoinRoom {
        room_id: config.room_id.clone(),
        role: config.role.clone(),
        identity: config.identity.clone(),
    };
    let json = serde_json::to_string(&join)
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let view = Arc::new(Mutex::new(RoomView::new(
        config.room_id.clone(),
        config.identity.clone(),
    )));

    // Spawn a task to apply incoming events to the view
    let view_for_read = Arc::clone(&view);
    let prompt = config.prompt.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let server_message = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("Ignoring unrecognized frame: {}", e);
                            continue;
                        }
                    };

                    let (output, end) = {
                        let Ok(mut view) = view_for_read.lock() else {
                            return ReadEnd::Lost;
                        };
                        let change = view.apply(&server_message);
                        let end = match change {
                            ViewChange::Closed => Some(ReadEnd::RoomClosed),
                            ViewChange::NotFound(_) => Some(ReadEnd::RoomNotFound),
                            _ => None,
                        };
                        (render(&change, &view), end)
                    };

                    if let Some(output) = output {
                        print!("{}", output);
                    }
                    if let Some(end) = end {
                        return end;
                    }
                    redisplay_prompt(&prompt);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        ReadEnd::Lost
    });

    let result = loop {
        tokio::select! {
            read_result = &mut read_task => {
                break match read_result {
                    Ok(ReadEnd::RoomClosed) => Ok(SessionEnd::RoomClosed),
                    Ok(ReadEnd::RoomNotFound) => {
                        Err(ClientError::RoomNotFound(config.room_id.clone()))
                    }
                    _ => Err(ClientError::ConnectionError("Connection lost".to_string())),
                };
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    break Ok(SessionEnd::UserQuit);
                };

                let reaction = match view.lock() {
                    Ok(mut view) => interpret(&line, &mut view),
                    Err(_) => break Err(ClientError::ConnectionError("view poisoned".to_string())),
                };

                let message = match reaction {
                    Reaction::Send(message) => Some(message),
                    Reaction::Submit { hint, message } => {
                        if let Some(hint) = hint {
                            print!("{}", hint);
                        }
                        Some(message)
                    }
                    Reaction::Print(output) => {
                        print!("{}", output);
                        None
                    }
                    Reaction::Export { path, text } => {
                        let notice = match tokio::fs::write(&path, format!("{}\n", text)).await {
                            Ok(()) => format!("Exported to {}", path),
                            Err(e) => format!("Export failed: {}", e),
                        };
                        print!("{}", MessageFormatter::format_notice(&notice));
                        None
                    }
                    Reaction::Quit => break Ok(SessionEnd::UserQuit),
                };

                if let Some(message) = message {
                    let json = match serde_json::to_string(&message) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        break Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
                redisplay_prompt(&config.prompt);
            }
        }
    };

    read_task.abort();
    write.close().await.ok();
    result
}
