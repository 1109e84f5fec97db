//! Unique identifiers for scheduling entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable index of a simulated process
///
/// Pids are dense: a table of N processes uses `Pid(0)..Pid(N-1)`.
/// They double as the round-robin position of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pid(usize);

impl Pid {
    /// Creates a pid from a table index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the table index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Opaque handle to a workload actor
///
/// The kernel stores this in the PCB and uses it to address commands.
/// Actors stamp it on every event they emit, so the kernel can map an
/// event back to its PCB (or drop it when the handle is unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Creates a new random actor ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an actor ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_index() {
        let pid = Pid::new(7);
        assert_eq!(pid.index(), 7);
        assert_eq!(format!("{}", pid), "P7");
    }

    #[test]
    fn test_pid_ordering_follows_index() {
        assert!(Pid::new(1) < Pid::new(2));
    }

    #[test]
    fn test_actor_id_creation() {
        let id1 = ActorId::new();
        let id2 = ActorId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_actor_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ActorId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn test_actor_id_display() {
        let id = ActorId::new();
        assert!(format!("{}", id).starts_with("Actor("));
    }

    #[test]
    fn test_actor_id_serialization() {
        let id = ActorId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ActorId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
