//! Observability subsystem
//!
//! - Structured logging (JSON, one line per event)
//! - Typed events
//! - Counters
//!
//! Observability is read-only: nothing here influences mapping or
//! indexing decisions.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event with fields; severity follows from the event.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else if event.is_rejection() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

/// Log an event without fields
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event(Event::MappingsLoaded);
        log_event_with_fields(Event::MappingUpdated, &[("type", "mytype")]);
        log_event_with_fields(Event::MappingRejected, &[("type", "mytype")]);
    }
}
