//! End-to-end tests: a server on an ephemeral port, driven over HTTP and
//! WebSocket the way real clients drive it.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use undoubt_server::{
    config::ServerConfig,
    domain::Role,
    infrastructure::dto::websocket::{DoubtDto, ServerMessage},
    ui::{AppState, Server},
};

const ROOM: &str = "12345";
const HOST: &str = "host-1";
const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(AppState::in_memory(config));
    tokio::spawn(async move {
        server
            .serve(listener, std::future::pending())
            .await
            .unwrap();
    });
    addr
}

async fn create_room(addr: SocketAddr, room_id: &str, host: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}/api/rooms"))
        .json(&json!({
            "room_id": room_id,
            "host_id": host,
            "host_contact": format!("{host}@example.com"),
            "topic": "Concurrency",
        }))
        .send()
        .await
        .unwrap()
}

async fn get_json(url: String) -> (reqwest::StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn list_doubts(addr: SocketAddr, room_id: &str) -> Vec<DoubtDto> {
    reqwest::get(format!("http://{addr}/api/rooms/{room_id}/doubts"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        Self { stream }
    }

    /// Connect, join and consume room-info + doubt-snapshot
    async fn join(
        addr: SocketAddr,
        room_id: &str,
        identity: &str,
        claimed: &str,
    ) -> (Self, Role, Vec<DoubtDto>) {
        let mut client = Self::connect(addr).await;
        client
            .send(json!({
                "type": "join-room",
                "room_id": room_id,
                "role": claimed,
                "identity": identity,
            }))
            .await;
        let ServerMessage::RoomInfo { role, .. } = client.recv().await else {
            panic!("expected room-info");
        };
        let ServerMessage::DoubtSnapshot { doubts } = client.recv().await else {
            panic!("expected doubt-snapshot");
        };
        (client, role, doubts)
    }

    async fn send(&mut self, value: Value) {
        self.stream
            .send(Message::Text(value.to_string().into()))
            .await
            .unwrap();
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> ServerMessage {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a message")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Nothing arrives for a while
    async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(QUIET_PERIOD, self.stream.next()).await
        {
            panic!("unexpected message: {}", text.as_str());
        }
    }

    /// The server closes the socket without sending anything else
    async fn expect_closed(&mut self) {
        loop {
            let next = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("socket was not closed");
            match next {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(Message::Text(text))) => panic!("unexpected message: {}", text.as_str()),
                Some(Ok(_)) => {}
            }
        }
    }
}

async fn submit(client: &mut WsClient, body: &str) -> DoubtDto {
    client
        .send(json!({"type": "submit-doubt", "room_id": ROOM, "body": body}))
        .await;
    let ServerMessage::DoubtCreated { doubt } = client.recv().await else {
        panic!("expected doubt-created");
    };
    doubt
}

#[tokio::test]
async fn test_scenario_a_roles_and_submission() {
    // テスト項目: ホスト / 参加者のロール解決と、投稿が全員に届くこと
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    assert_eq!(create_room(addr, ROOM, HOST).await.status(), 201);
    let (mut host, host_role, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, alice_role, _) = WsClient::join(addr, ROOM, "alice", "host").await;

    // when (操作):
    alice
        .send(json!({
            "type": "submit-doubt",
            "room_id": ROOM,
            "body": "What is a mutex?",
            "submitter": "alice",
        }))
        .await;

    // then (期待する結果):
    assert_eq!(host_role, Role::Host);
    assert_eq!(alice_role, Role::Participant);
    let ServerMessage::DoubtCreated { doubt: seen_by_host } = host.recv().await else {
        panic!("expected doubt-created");
    };
    let ServerMessage::DoubtCreated { doubt: seen_by_alice } = alice.recv().await else {
        panic!("expected doubt-created");
    };
    assert_eq!(seen_by_host.id, seen_by_alice.id);
    assert_eq!(seen_by_host.body, "What is a mutex?");
    assert_eq!(seen_by_alice.submitter, "alice");
}

#[tokio::test]
async fn test_scenario_b_duplicate_vote_counts_once() {
    // テスト項目: 同じ参加者の 2 回連続の up は 1 票で、配信も 1 回
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut host, _, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    let doubt = submit(&mut alice, "Why is Rc not Send?").await;
    host.recv().await;

    // when (操作):
    for _ in 0..2 {
        alice
            .send(json!({
                "type": "vote-up",
                "room_id": ROOM,
                "doubt_id": doubt.id,
                "voter": "alice",
            }))
            .await;
    }

    // then (期待する結果):
    assert_eq!(
        host.recv().await,
        ServerMessage::VoteUpApplied {
            doubt_id: doubt.id.clone()
        }
    );
    host.expect_silence().await;
    let doubts = list_doubts(addr, ROOM).await;
    assert_eq!(doubts[0].upvotes, 1);
    assert_eq!(doubts[0].voters, vec!["alice".to_string()]);
}

#[tokio::test]
async fn test_scenario_c_host_toggles_answered() {
    // テスト項目: ホストの切り替えが全員に届き、2 回目で元に戻る
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut host, _, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    let doubt = submit(&mut alice, "When do I need Pin?").await;
    host.recv().await;

    for expected in [true, false] {
        // when (操作):
        host.send(json!({"type": "toggle-answered", "room_id": ROOM, "doubt_id": doubt.id}))
            .await;

        // then (期待する結果):
        let message = ServerMessage::AnsweredToggled {
            doubt_id: doubt.id.clone(),
            answered: expected,
        };
        assert_eq!(host.recv().await, message);
        assert_eq!(alice.recv().await, message);
    }
}

#[tokio::test]
async fn test_scenario_d_close_room() {
    // テスト項目: クローズで全員に room-closed が届いて切断され、後から参加すると room-not-found
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut host, _, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    submit(&mut alice, "Is this on the exam?").await;
    host.recv().await;

    // when (操作):
    host.send(json!({"type": "close-room", "room_id": ROOM})).await;

    // then (期待する結果):
    assert_eq!(host.recv().await, ServerMessage::RoomClosed);
    assert_eq!(alice.recv().await, ServerMessage::RoomClosed);
    host.expect_closed().await;
    alice.expect_closed().await;

    let mut late = WsClient::connect(addr).await;
    late.send(json!({"type": "join-room", "room_id": ROOM, "identity": "bob"}))
        .await;
    assert_eq!(
        late.recv().await,
        ServerMessage::RoomNotFound {
            room_id: ROOM.to_string()
        }
    );

    let (status, body) = get_json(format!("http://{addr}/api/rooms/{ROOM}")).await;
    assert_eq!(status, 404);
    assert_eq!(body["exists"], false);
    assert!(list_doubts(addr, ROOM).await.is_empty());
}

#[tokio::test]
async fn test_participant_cannot_toggle_or_close() {
    // テスト項目: 参加者の切り替え・クローズは破棄され、ストアも変化しない
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut host, _, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "host").await;
    let doubt = submit(&mut alice, "Who can mark this?").await;
    host.recv().await;

    // when (操作):
    alice
        .send(json!({"type": "toggle-answered", "room_id": ROOM, "doubt_id": doubt.id}))
        .await;
    alice.send(json!({"type": "close-room", "room_id": ROOM})).await;

    // then (期待する結果):
    host.expect_silence().await;
    alice.expect_silence().await;
    let doubts = list_doubts(addr, ROOM).await;
    assert_eq!(doubts.len(), 1);
    assert!(!doubts[0].answered);
    let (status, _) = get_json(format!("http://{addr}/api/rooms/{ROOM}")).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_rejections_are_reported_when_enabled() {
    // テスト項目: notify_rejections が有効なら、破棄されたイベントの送信者にだけ通知される
    // given (前提条件):
    let addr = spawn_server(ServerConfig {
        notify_rejections: true,
        ..ServerConfig::default()
    })
    .await;
    create_room(addr, ROOM, HOST).await;
    let (mut host, _, _) = WsClient::join(addr, ROOM, HOST, "host").await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;

    // when (操作):
    alice.send(json!({"type": "close-room", "room_id": ROOM})).await;

    // then (期待する結果):
    let ServerMessage::ActionRejected { action, .. } = alice.recv().await else {
        panic!("expected action-rejected");
    };
    assert_eq!(action, "close-room");
    host.expect_silence().await;
}

#[tokio::test]
async fn test_connection_survives_bad_frames() {
    // テスト項目: 不正なフレームや参加前のイベントで接続は切れない
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let mut client = WsClient::connect(addr).await;

    // when (操作):
    client.send_raw("not json").await;
    client
        .send(json!({"type": "submit-doubt", "room_id": ROOM, "body": "too early"}))
        .await;
    client
        .send(json!({"type": "join-room", "room_id": ROOM, "identity": "alice"}))
        .await;

    // then (期待する結果):
    assert!(matches!(client.recv().await, ServerMessage::RoomInfo { .. }));
    assert_eq!(
        client.recv().await,
        ServerMessage::DoubtSnapshot { doubts: vec![] }
    );
    assert!(list_doubts(addr, ROOM).await.is_empty());
}

#[tokio::test]
async fn test_late_joiner_receives_snapshot() {
    // テスト項目: 後から参加した接続はスナップショットで既存の Doubt を受け取る
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    let doubt = submit(&mut alice, "Does async need Send?").await;

    // when (操作):
    let (_bob, _, snapshot) = WsClient::join(addr, ROOM, "bob", "participant").await;

    // then (期待する結果):
    assert_eq!(snapshot, vec![doubt]);
}

#[tokio::test]
async fn test_join_succeeds_with_smallest_queue() {
    // テスト項目: 送信キュー容量 1 を指定しても参加時の 2 メッセージで切断されない
    // given (前提条件):
    let addr = spawn_server(ServerConfig {
        outbound_queue_capacity: 1,
        ..ServerConfig::default()
    })
    .await;
    create_room(addr, ROOM, HOST).await;

    // when (操作):
    let (mut alice, role, snapshot) = WsClient::join(addr, ROOM, "alice", "participant").await;
    let doubt = submit(&mut alice, "Is a queue of one enough?").await;

    // then (期待する結果):
    assert_eq!(role, Role::Participant);
    assert!(snapshot.is_empty());
    assert_eq!(list_doubts(addr, ROOM).await, vec![doubt]);
}

#[tokio::test]
async fn test_http_room_lifecycle() {
    // テスト項目: HTTP API での作成・参照・ホスト判定・クローズ
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    // when (操作) / then (期待する結果): ヘルスチェック
    let (status, health) = get_json(format!("http://{addr}/api/health")).await;
    assert_eq!(status, 200);
    assert_eq!(health["status"], "ok");

    // when (操作) / then (期待する結果): 作成
    assert_eq!(create_room(addr, ROOM, HOST).await.status(), 201);
    assert_eq!(create_room(addr, ROOM, "someone").await.status(), 409);
    let missing_host = client
        .post(format!("http://{addr}/api/rooms"))
        .json(&json!({"room_id": "22222", "host_contact": "x@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_host.status(), 400);
    let generated = client
        .post(format!("http://{addr}/api/rooms"))
        .json(&json!({"hostId": "host-2", "hostEmail": "h2@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(generated.status(), 201);
    let generated: Value = generated.json().await.unwrap();
    assert_eq!(generated["room"]["room_id"].as_str().unwrap().len(), 5);

    // 参照
    let (status, body) = get_json(format!("http://{addr}/api/rooms/{ROOM}")).await;
    assert_eq!(status, 200);
    assert_eq!(body["exists"], true);
    assert_eq!(body["room"]["topic"], "Concurrency");

    // ホスト判定
    let (_, body) = get_json(format!("http://{addr}/api/rooms/{ROOM}/host/{HOST}")).await;
    assert_eq!(body["is_host"], true);
    let (_, body) = get_json(format!("http://{addr}/api/rooms/{ROOM}/host/alice")).await;
    assert_eq!(body["is_host"], false);
    let (status, _) = get_json(format!("http://{addr}/api/rooms/99999/host/{HOST}")).await;
    assert_eq!(status, 404);

    // クローズ（ホスト以外は 403、ホストなら参加者に room-closed）
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    let forbidden = client
        .delete(format!("http://{addr}/api/rooms/{ROOM}?identity=alice"))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status(), 403);
    let closed = client
        .delete(format!("http://{addr}/api/rooms/{ROOM}?identity={HOST}"))
        .send()
        .await
        .unwrap();
    assert_eq!(closed.status(), 200);
    assert_eq!(alice.recv().await, ServerMessage::RoomClosed);
    alice.expect_closed().await;
    let gone = client
        .delete(format!("http://{addr}/api/rooms/{ROOM}?identity={HOST}"))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn test_similarity_and_debug_endpoints() {
    // テスト項目: 類似度ヒントとデバッグ情報
    // given (前提条件):
    let addr = spawn_server(ServerConfig::default()).await;
    create_room(addr, ROOM, HOST).await;
    let (mut alice, _, _) = WsClient::join(addr, ROOM, "alice", "participant").await;
    submit(&mut alice, "What is recursion?").await;
    submit(&mut alice, "How do I bake bread").await;

    // when (操作):
    let (_, hint) = get_json(format!(
        "http://{addr}/api/rooms/{ROOM}/similarity?text=what%20is%20recursion"
    ))
    .await;
    let (_, debug) = get_json(format!("http://{addr}/debug/rooms/{ROOM}")).await;

    // then (期待する結果):
    assert_eq!(hint["level"], "high");
    assert_eq!(hint["best_match"]["body"], "What is recursion?");
    assert_eq!(debug["members"], 1);
    assert_eq!(debug["doubts"].as_array().unwrap().len(), 2);
}
