//! Test doubles shared by handler tests.

use std::sync::Mutex;

use crate::domain::events::{DomainEvent, EventKind};
use crate::ports::EventPublisher;

/// Records every published event and hands out sequential numbers.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(DomainEvent::kind).collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: DomainEvent) -> u64 {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        events.len() as u64
    }
}
