//! Value objects.
//!
//! Every constructor validates and normalizes its input, so a value that
//! exists is a value that is well-formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

const ROOM_ID_MAX_LEN: usize = 32;
const IDENTITY_MAX_LEN: usize = 128;
const HOST_CONTACT_MAX_LEN: usize = 256;
const TOPIC_MAX_LEN: usize = 200;
const DOUBT_BODY_MAX_LEN: usize = 2000;

fn required(field: &'static str, value: String, max_len: usize) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(ValueObjectError::TooLong { field, max_len });
    }
    Ok(trimmed.to_string())
}

/// Room identifier (short, human-shareable)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = required("room_id", value, ROOM_ID_MAX_LEN)?;
        if value.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::InvalidFormat("room_id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Generates room codes in the 5-digit range `10000..=99999`.
pub struct RoomIdFactory;

impl RoomIdFactory {
    const LOWEST: u128 = 10_000;
    const SPAN: u128 = 90_000;

    pub fn generate() -> RoomId {
        let code = Self::LOWEST + Uuid::new_v4().as_u128() % Self::SPAN;
        RoomId(code.to_string())
    }
}

/// Acting identity of a user (host, submitter or voter)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        required("identity", value, IDENTITY_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact label of a room host (e.g. an e-mail address)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HostContact(String);

impl HostContact {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        required("host_contact", value, HOST_CONTACT_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-text topic of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Blank topics are treated as absent.
    pub fn parse(value: Option<String>) -> Result<Option<Self>, ValueObjectError> {
        match value {
            Some(value) if !value.trim().is_empty() => {
                required("topic", value, TOPIC_MAX_LEN).map(|v| Some(Self(v)))
            }
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Doubt identifier, unique within a room
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DoubtId(String);

impl DoubtId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        required("doubt_id", value, IDENTITY_MAX_LEN).map(Self)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DoubtId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Text of a doubt (trimmed, never empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DoubtBody(String);

impl DoubtBody {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        required("body", value, DOUBT_BODY_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DoubtBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Live WebSocket connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a connection within the room it joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Participant,
}

impl Role {
    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host)
    }
}
