//! Operation logging macros
//!
//! Every engine operation is bracketed by one `start` event and exactly one
//! of `end` / `end_error`. Extra fields are written `name = value`, where
//! `name` must be one of the row-identity, statement or size fields known
//! to `__log_field!`; an unknown name is a compile error rather than a new,
//! unregistered field.

/// Resolve a field identifier to its name constant in `linkmap-core-types`
#[doc(hidden)]
#[macro_export]
macro_rules! __log_field {
    (parent_pk) => {
        $crate::linkmap_core_types::schema::FIELD_PARENT_PK
    };
    (entry_pk) => {
        $crate::linkmap_core_types::schema::FIELD_ENTRY_PK
    };
    (duration_ms) => {
        $crate::linkmap_core_types::schema::FIELD_DURATION_MS
    };
    (table) => {
        $crate::linkmap_core_types::schema::FIELD_TABLE
    };
    (entry_count) => {
        $crate::linkmap_core_types::schema::FIELD_ENTRY_COUNT
    };
    (link_count) => {
        $crate::linkmap_core_types::schema::FIELD_LINK_COUNT
    };
}

/// Shared envelope: component, op and event, then caller fields
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr, $msg:literal $(, $key:ident = $val:expr)*) => {
        tracing::$level!(
            { $crate::linkmap_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::linkmap_core_types::schema::FIELD_OP } = $op,
            { $crate::linkmap_core_types::schema::FIELD_EVENT } = $event,
            $({ $crate::__log_field!($key) } = $val,)*
            $msg
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use linkmap_core::log_op_start;
/// log_op_start!("save_parent", parent_pk = 1u64);
/// log_op_start!("find_entry", entry_pk = 123u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $key:ident = $val:expr)* $(,)?) => {{
        $crate::__log_op_event!(
            info,
            $op,
            $crate::linkmap_core_types::schema::EVENT_START,
            "operation started"
            $(, $key = $val)*
        );
    }};
}

/// Log the successful end of an operation
///
/// ```
/// # use linkmap_core::log_op_end;
/// log_op_end!("save_parent", duration_ms = 3u64, parent_pk = 1u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr $(, $key:ident = $val:expr)* $(,)?) => {{
        $crate::__log_op_event!(
            info,
            $op,
            $crate::linkmap_core_types::schema::EVENT_END,
            "operation finished"
            $(, $key = $val)*
        );
    }};
}

/// Log a failed operation, classified by its `ExError` kind and code
///
/// `$err` is anything convertible into `ExError`.
///
/// ```
/// # use linkmap_core::{log_op_error, errors::LinkMapError};
/// log_op_error!("find_parent", LinkMapError::ParentNotFound { parent_pk: 1 }, parent_pk = 1u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr $(, $key:ident = $val:expr)* $(,)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            { $crate::linkmap_core_types::schema::FIELD_COMPONENT } = module_path!(),
            { $crate::linkmap_core_types::schema::FIELD_OP } = $op,
            { $crate::linkmap_core_types::schema::FIELD_EVENT } =
                $crate::linkmap_core_types::schema::EVENT_END_ERROR,
            { $crate::linkmap_core_types::schema::FIELD_ERR_KIND } = ?ex_err.kind(),
            { $crate::linkmap_core_types::schema::FIELD_ERR_CODE } = ex_err.code(),
            $({ $crate::__log_field!($key) } = $val,)*
            "operation failed: {}",
            ex_err
        );
    }};
}
