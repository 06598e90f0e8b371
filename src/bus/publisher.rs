use std::error::Error;
use std::fmt;

/// An event envelope on the bus: a delivery ID, the domain event's name,
/// and its bitcode payload.
#[derive(Clone, Debug)]
pub struct BusEvent {
    /// Unique identifier for this event (stable across redeliveries).
    pub id: String,
    /// Domain event name (e.g. "ParticipantBooked").
    pub event_type: String,
    /// Bitcode-serialized domain event.
    pub payload: Vec<u8>,
}

impl BusEvent {
    pub fn new(id: impl Into<String>, event_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            event_type: event_type.into(),
            payload,
        }
    }

    /// Create an event with a bitcode-serialized payload.
    pub fn encode<T: serde::Serialize>(
        id: impl Into<String>,
        event_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self, PublishError> {
        let bytes = bitcode::serialize(payload)
            .map_err(|e| PublishError::SerializationFailed(e.to_string()))?;
        Ok(Self::new(id, event_type, bytes))
    }

    /// Decode the payload back into a domain event.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, PublishError> {
        bitcode::deserialize(&self.payload)
            .map_err(|e| PublishError::SerializationFailed(e.to_string()))
    }
}

/// Error type for publish and poll operations.
#[derive(Debug)]
pub enum PublishError {
    /// Serialization of the event payload failed.
    SerializationFailed(String),
    /// The bus rejected the event.
    Rejected(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::SerializationFailed(msg) => write!(f, "Serialization failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "Event rejected: {}", msg),
            PublishError::Other(e) => write!(f, "Publish error: {}", e),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Trait for publishing events to a message bus.
pub trait Publisher: Send + Sync {
    /// Publish a single event to the bus.
    fn publish(&self, event: BusEvent) -> Result<(), PublishError>;

    /// Publish multiple events to the bus.
    ///
    /// Default implementation publishes events sequentially.
    fn publish_batch(&self, events: Vec<BusEvent>) -> Result<(), PublishError> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}
