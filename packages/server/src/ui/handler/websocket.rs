//! WebSocket connection handlers.
//!
//! One task per connection reads inbound frames and dispatches them in order;
//! a second task drains the connection's outbound queue into the socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomEvent, Session, VoteDirection},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::{JoinRoomError, RoomEventError, binding::require_session},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards the outbound queue to the WebSocket sink.
///
/// When every sender of the queue is dropped (room closed, or the connection
/// was evicted as a slow consumer) the remaining messages are flushed and the
/// socket is closed.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::channel(state.config.outbound_capacity());
    let connection_id = state.connect_client_usecase.execute(tx).await;
    let mut send_task = pusher_loop(rx, sender);

    let mut session: Option<Session> = None;
    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    dispatch(&state, connection_id, &mut session, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    send_task.abort();
    state
        .disconnect_client_usecase
        .execute(&connection_id, session.as_ref())
        .await;
}

/// Handle one inbound frame. Failures never end the connection.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    session: &mut Option<Session>,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropping unparseable frame from '{}': {}", connection_id, e);
            return;
        }
    };
    let action = message.action();

    let result = match message {
        ClientMessage::JoinRoom {
            room_id,
            role,
            identity,
        } => match state
            .join_room_usecase
            .execute(
                connection_id,
                session.as_ref(),
                room_id,
                role.as_deref(),
                identity,
            )
            .await
        {
            Ok(joined) => {
                *session = Some(joined);
                Ok(())
            }
            // room-not-found has already been sent
            Err(JoinRoomError::RoomNotFound(_)) => Ok(()),
            Err(e) => Err(e.to_string()),
        },
        other => room_event(state, session.as_ref(), other)
            .await
            .map_err(|e| {
                if matches!(e, RoomEventError::IdentityMismatch) {
                    tracing::warn!(
                        "Connection '{}' sent '{}' as another identity",
                        connection_id,
                        action
                    );
                }
                e.to_string()
            }),
    };

    if let Err(reason) = result {
        reject(state, connection_id, action, reason).await;
    }
}

async fn room_event(
    state: &AppState,
    session: Option<&Session>,
    message: ClientMessage,
) -> Result<(), RoomEventError> {
    let session = require_session(session)?;
    match message {
        ClientMessage::SubmitDoubt {
            room_id,
            body,
            submitter,
        } => state
            .submit_doubt_usecase
            .execute(session, &room_id, body, submitter.as_deref())
            .await
            .map(|_| ()),
        ClientMessage::VoteUp {
            room_id,
            doubt_id,
            voter,
        } => state
            .vote_doubt_usecase
            .execute(session, &room_id, doubt_id, voter.as_deref(), VoteDirection::Up)
            .await
            .map(|_| ()),
        ClientMessage::VoteDown {
            room_id,
            doubt_id,
            voter,
        } => state
            .vote_doubt_usecase
            .execute(
                session,
                &room_id,
                doubt_id,
                voter.as_deref(),
                VoteDirection::Down,
            )
            .await
            .map(|_| ()),
        ClientMessage::ToggleAnswered { room_id, doubt_id } => state
            .toggle_answered_usecase
            .execute(session, &room_id, doubt_id)
            .await
            .map(|_| ()),
        ClientMessage::CloseRoom { room_id } => state
            .close_room_usecase
            .execute_live(session, &room_id)
            .await
            .map(|_| ()),
        // joins never reach here, see `dispatch`
        ClientMessage::JoinRoom { .. } => Ok(()),
    }
}

/// Dropped events are silent unless `notify_rejections` is set
async fn reject(
    state: &AppState,
    connection_id: ConnectionId,
    action: &'static str,
    reason: String,
) {
    tracing::debug!(
        "Dropped '{}' from connection '{}': {}",
        action,
        connection_id,
        reason
    );
    if state.config.notify_rejections {
        let _ = state
            .message_pusher
            .push_to(&connection_id, &RoomEvent::ActionRejected { action, reason })
            .await;
    }
}
