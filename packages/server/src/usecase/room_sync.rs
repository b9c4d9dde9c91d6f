//! Per-room barrier between joins and room mutations.
//!
//! Mutating events (submit, vote, toggle) hold the shared side of a room's
//! lock across persist and fan-out. Join (group registration plus snapshot)
//! and close hold the exclusive side. A joining connection therefore receives
//! every delta committed after its snapshot, and none committed before it.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::domain::RoomId;

#[derive(Default)]
pub struct RoomSyncGate {
    gates: Mutex<HashMap<RoomId, Arc<RwLock<()>>>>,
}

impl RoomSyncGate {
    pub fn new() -> Self {
        Self::default()
    }

    async fn gate(&self, room_id: &RoomId) -> Arc<RwLock<()>> {
        let mut gates = self.gates.lock().await;
        gates.entry(room_id.clone()).or_default().clone()
    }

    /// Shared access for a mutating event
    pub async fn mutation(&self, room_id: &RoomId) -> OwnedRwLockReadGuard<()> {
        self.gate(room_id).await.read_owned().await
    }

    /// Exclusive access for join and close
    pub async fn exclusive(&self, room_id: &RoomId) -> OwnedRwLockWriteGuard<()> {
        self.gate(room_id).await.write_owned().await
    }

    /// Drop the lock of a closed room
    pub async fn forget(&self, room_id: &RoomId) {
        self.gates.lock().await.remove(room_id);
    }

    pub async fn tracked_rooms(&self) -> usize {
        self.gates.lock().await.len()
    }
}
