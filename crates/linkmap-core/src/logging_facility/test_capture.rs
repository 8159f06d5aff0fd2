//! In-memory event recorder for tests
//!
//! `init_test_capture` installs a process-wide subscriber that keeps every
//! event in one shared buffer. Tests in the same binary see each other's
//! events, so assertions should filter on an `op` (or a row key) no other
//! test in that binary uses.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use linkmap_core_types::schema::{
    FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ENTRY_PK, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_EVENT, FIELD_OP, FIELD_PARENT_PK,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event; values are kept as rendered text keyed by field name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn err_kind(&self) -> Option<&str> {
        self.field(FIELD_ERR_KIND)
    }

    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }

    /// Parent the event was logged for
    pub fn parent_pk(&self) -> Option<u64> {
        self.number(FIELD_PARENT_PK)
    }

    /// Entry the event was logged for
    pub fn entry_pk(&self) -> Option<u64> {
        self.number(FIELD_ENTRY_PK)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.number(FIELD_DURATION_MS)
    }

    fn number(&self, name: &str) -> Option<u64> {
        self.field(name)?.parse().ok()
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct FieldRecorder<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    sink: Sink,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Shared handle onto the recorded events
#[derive(Clone, Default)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// First `event` logged for `op`, if any
    pub fn find_event(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.events().into_iter().find(|e| e.is(op, event))
    }

    /// Like `find_event`, panicking when nothing matches
    ///
    /// # Panics
    ///
    /// When no `event` was logged for `op`.
    pub fn expect_event(&self, op: &str, event: &str) -> CapturedEvent {
        match self.find_event(op, event) {
            Some(found) => found,
            None => panic!(
                "no {} event for op {} among {} captured",
                event,
                op,
                self.events().len()
            ),
        }
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.sink.lock() {
            events.clear();
        }
    }

    fn layer(&self) -> CaptureLayer {
        CaptureLayer {
            sink: Arc::clone(&self.sink),
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the recorder as the global subscriber (once) and return its handle
///
/// ```
/// use linkmap_core::log_op_start;
/// use linkmap_core::logging_facility::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_save", parent_pk = 7u64);
/// assert_eq!(capture.expect_event("doc_save", "start").parent_pk(), Some(7));
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            tracing_subscriber::registry()
                .with(capture.layer())
                .init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(fields: &[(&str, &str)]) -> CapturedEvent {
        CapturedEvent {
            level: Level::INFO,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let e = event(&[
            (FIELD_OP, "save_entry"),
            (FIELD_EVENT, "start"),
            (FIELD_ENTRY_PK, "123"),
            (FIELD_DURATION_MS, "4"),
        ]);

        assert!(e.is("save_entry", "start"));
        assert_eq!(e.entry_pk(), Some(123));
        assert_eq!(e.duration_ms(), Some(4));
        assert_eq!(e.parent_pk(), None);
    }

    #[test]
    fn test_non_numeric_key_reads_as_none() {
        let e = event(&[(FIELD_PARENT_PK, "abc")]);
        assert_eq!(e.parent_pk(), None);
    }

    #[test]
    fn test_handle_without_subscriber_is_empty() {
        let capture = TestCapture::default();
        assert!(capture.events().is_empty());
        assert!(capture.find_event("any", "start").is_none());
    }
}
