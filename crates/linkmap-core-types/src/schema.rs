//! Field and event names shared by every linkmap log event
//!
//! Logging call sites never spell a field name inline; they go through
//! these constants (directly, or via the `log_op_*` macros in
//! `linkmap-core`), so the capture layer and log consumers can rely on them.

// Envelope of every operation event
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Row identity
pub const FIELD_PARENT_PK: &str = "parent_pk";
pub const FIELD_ENTRY_PK: &str = "entry_pk";

// Statement execution
pub const FIELD_TABLE: &str = "table";
pub const FIELD_SQL: &str = "sql";

// Fold/unfold sizes
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_LINK_COUNT: &str = "link_count";

// Connection and schema setup
pub const FIELD_JOURNAL_MODE: &str = "journal_mode";
pub const FIELD_FOREIGN_KEYS: &str = "foreign_keys";
pub const FIELD_MIGRATION_ID: &str = "migration_id";

// Failure classification
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

/// `event` value marking the start of an operation
pub const EVENT_START: &str = "start";
/// `event` value for an operation that returned `Ok`
pub const EVENT_END: &str = "end";
/// `event` value for an operation that returned `Err`
pub const EVENT_END_ERROR: &str = "end_error";
