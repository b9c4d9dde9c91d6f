//! Shared application state.

use std::sync::Arc;

use undoubt_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    domain::{DoubtRepository, MessagePusher, RoomRepository},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryDoubtRepository, InMemoryRoomRepository},
    },
    usecase::{
        CloseRoomUseCase, ConnectClientUseCase, CreateRoomUseCase, DisconnectClientUseCase,
        GetRoomUseCase, JoinRoomUseCase, RoomSyncGate, SubmitDoubtUseCase, ToggleAnsweredUseCase,
        VoteDoubtUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub config: ServerConfig,
    /// MessagePusher（グループ人数の参照用）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub get_room_usecase: Arc<GetRoomUseCase>,
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub submit_doubt_usecase: Arc<SubmitDoubtUseCase>,
    pub vote_doubt_usecase: Arc<VoteDoubtUseCase>,
    pub toggle_answered_usecase: Arc<ToggleAnsweredUseCase>,
    pub close_room_usecase: Arc<CloseRoomUseCase>,
}

impl AppState {
    /// Wire every use case on top of the given stores and pusher
    pub fn new(
        config: ServerConfig,
        rooms: Arc<dyn RoomRepository>,
        doubts: Arc<dyn DoubtRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = Arc::new(RoomSyncGate::new());

        Self {
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                rooms.clone(),
                clock.clone(),
                config.room_id_attempts,
            )),
            get_room_usecase: Arc::new(GetRoomUseCase::new(rooms.clone(), doubts.clone())),
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                rooms.clone(),
                doubts.clone(),
                message_pusher.clone(),
                gate.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                message_pusher.clone(),
            )),
            submit_doubt_usecase: Arc::new(SubmitDoubtUseCase::new(
                rooms.clone(),
                doubts.clone(),
                message_pusher.clone(),
                gate.clone(),
                clock,
            )),
            vote_doubt_usecase: Arc::new(VoteDoubtUseCase::new(
                doubts.clone(),
                message_pusher.clone(),
                gate.clone(),
            )),
            toggle_answered_usecase: Arc::new(ToggleAnsweredUseCase::new(
                doubts.clone(),
                message_pusher.clone(),
                gate.clone(),
            )),
            close_room_usecase: Arc::new(CloseRoomUseCase::new(
                rooms,
                doubts,
                message_pusher.clone(),
                gate,
            )),
            message_pusher,
            config,
        }
    }

    /// State backed by the in-memory stores and the WebSocket pusher
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryDoubtRepository::new()),
            Arc::new(WebSocketMessagePusher::new()),
            Arc::new(SystemClock),
        )
    }
}
