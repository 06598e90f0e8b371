use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::entity::EventRecord;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    InFlight,
    Published,
    Failed,
}

/// A committed domain event awaiting publication to the bus.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct OutboxRecord {
    pub id: u64,
    pub aggregate_id: String,
    pub sequence: u64,
    pub event_type: String,
    pub payload: Vec<u8>,
    pub occurred_at: SystemTime,
    pub status: OutboxStatus,
    pub attempts: u32,
    pub locked_by: Option<String>,
    pub locked_until: Option<SystemTime>,
    pub last_error: Option<String>,
}

impl OutboxRecord {
    /// Build a pending record from a freshly committed event.
    pub fn new(id: u64, aggregate_id: impl Into<String>, event: &EventRecord) -> Self {
        OutboxRecord {
            id,
            aggregate_id: aggregate_id.into(),
            sequence: event.sequence,
            event_type: event.event_name.clone(),
            payload: event.payload.clone(),
            occurred_at: event.timestamp,
            status: OutboxStatus::Pending,
            attempts: 0,
            locked_by: None,
            locked_until: None,
            last_error: None,
        }
    }

    /// Delivery ID carried onto the bus: stable across retries so
    /// consumers can recognize redeliveries.
    pub fn delivery_id(&self) -> String {
        format!("{}:{}", self.aggregate_id, self.sequence)
    }
}
