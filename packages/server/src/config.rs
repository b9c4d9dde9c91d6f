//! Server configuration.

/// Runtime settings of the server
///
/// Built by the binary from command-line arguments and environment
/// variables; tests construct it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of each connection's outbound queue. A connection whose queue
    /// fills up is disconnected.
    pub outbound_queue_capacity: usize,
    /// Send `action-rejected` to the sender of a dropped event
    pub notify_rejections: bool,
    /// Attempts to find a free generated room id
    pub room_id_attempts: usize,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;
    pub const DEFAULT_ROOM_ID_ATTEMPTS: usize = 20;
    /// A join queues `room-info` and `doubt-snapshot` back to back
    pub const MIN_OUTBOUND_QUEUE_CAPACITY: usize = 2;

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective outbound queue capacity
    pub fn outbound_capacity(&self) -> usize {
        self.outbound_queue_capacity.max(Self::MIN_OUTBOUND_QUEUE_CAPACITY)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            outbound_queue_capacity: Self::DEFAULT_OUTBOUND_QUEUE_CAPACITY,
            notify_rejections: false,
            room_id_attempts: Self::DEFAULT_ROOM_ID_ATTEMPTS,
        }
    }
}
