//! Event-sourced entity core: an identity plus an ordered, append-only
//! sequence of event records. Current state is derived by folding an
//! `apply` function over the log; the same fold serves live updates and
//! cold-start replay.

mod entity;
mod event_record;

pub use entity::Entity;
pub use event_record::{EventRecord, PayloadError};
