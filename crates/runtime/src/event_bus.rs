use foundation::Time;

/// Minimal event type for traceability.
///
/// Structured text stamped with the host time it was emitted at; the shell
/// drains these into the log once per animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub at: Time,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, at: Time, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            at,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use foundation::Time;

    #[test]
    fn records_events_with_time() {
        let mut bus = EventBus::new();
        bus.emit(Time(16.0), "focus", "world");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].at, Time(16.0));
        assert_eq!(bus.kinds(), vec!["focus"]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Time(0.0), "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
