//! Undoubt terminal client with reconnection support.
//!
//! `create` opens a new room over HTTP and joins it as host; `join` enters an
//! existing room. Plain lines become doubts; `/help` lists the commands.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval), but not after the room is closed or if it does not exist.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin undoubt-client -- create --identity alice --contact alice@example.com --topic Lifetimes
//! cargo run --bin undoubt-client -- join 12345 --identity bob
//! ```

use clap::{Parser, Subcommand};

use undoubt_client::{
    SessionConfig, SessionEnd,
    api::{RoomApi, websocket_url},
    run_client,
    ui::prompt,
};
use undoubt_server::infrastructure::dto::http::CreateRoomRequest;
use undoubt_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "undoubt-client")]
#[command(about = "Ask, vote on and answer classroom doubts in real time", long_about = None)]
struct Args {
    /// Server origin
    #[arg(short = 's', long, env = "UNDOUBT_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Identity used to join (your host id when hosting)
    #[arg(short = 'i', long, global = true)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Create a room and join it as host
    Create {
        /// Contact shown to participants
        #[arg(short = 'c', long)]
        contact: String,

        #[arg(short = 't', long)]
        topic: Option<String>,

        /// Request a specific room id instead of a generated one
        #[arg(long)]
        room_id: Option<String>,
    },
    /// Join an existing room
    Join {
        room_id: String,

        /// Claimed role; the server decides the actual role
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
}

async fn run(args: Args) -> Result<SessionEnd, Box<dyn std::error::Error>> {
    let Some(identity) = args.identity.filter(|i| !i.trim().is_empty()) else {
        return Err("--identity is required".into());
    };
    let api = RoomApi::new(args.server.as_str());

    let (room_id, role) = match args.command {
        Action::Create {
            contact,
            topic,
            room_id,
        } => {
            let room = api
                .create_room(&CreateRoomRequest {
                    room_id,
                    host_id: identity.clone(),
                    host_contact: contact,
                    topic,
                })
                .await?;
            println!("Created room {}. Share this id with participants.", room.room_id);
            (room.room_id, Some("host".to_string()))
        }
        Action::Join { room_id, role } => {
            if api.get_room(&room_id).await?.is_none() {
                return Err(format!("Room '{}' not found", room_id).into());
            }
            if api.is_host(&room_id, &identity).await? {
                println!("You host room {}.", room_id);
            }
            (room_id, role)
        }
    };

    let config = SessionConfig {
        url: websocket_url(&args.server),
        prompt: prompt(&room_id, &identity),
        room_id,
        identity,
        role,
    };

    Ok(run_client(config).await?)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    match run(args).await {
        Ok(SessionEnd::RoomClosed) => println!("The room is closed. Bye."),
        Ok(SessionEnd::UserQuit) => println!("Bye."),
        Err(e) => {
            tracing::error!("Client error: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
