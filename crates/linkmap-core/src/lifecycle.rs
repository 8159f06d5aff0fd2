//! Extension points a persistence engine invokes around reads and writes
//!
//! The engine owns statement generation, execution and transactions. It
//! calls back into the row types at three fixed moments:
//!
//! - `after_read`: the row's columns and its immediate child rows are
//!   populated. Invoked child-before-parent.
//! - `before_write`: the caller has finished setting the aggregate. Invoked
//!   parent-before-child, so a parent's unfolded child rows exist before
//!   their own `before_write` runs.
//! - `after_write`: the engine is done with the row, whether the write
//!   committed or not.

use crate::errors::{ExError, Result};

/// Engine-supplied context for one hook invocation
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    op: &'static str,
    upstream_error: Option<&'a ExError>,
}

impl<'a> HookContext<'a> {
    /// Context for a hook running inside engine operation `op`
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            upstream_error: None,
        }
    }

    /// Attach the error the engine's own step reported, if any
    pub fn with_upstream_error(mut self, err: Option<&'a ExError>) -> Self {
        self.upstream_error = err;
        self
    }

    /// Engine operation name
    pub fn op(&self) -> &'static str {
        self.op
    }

    /// Error reported by the engine before this hook ran
    pub fn upstream_error(&self) -> Option<&'a ExError> {
        self.upstream_error
    }

    /// True when the row state may be partial or undefined
    pub fn has_upstream_error(&self) -> bool {
        self.upstream_error.is_some()
    }
}

/// Load/save transformations attached to a row type
pub trait RowLifecycle {
    /// Fold populated child rows into the aggregate.
    ///
    /// Must leave the row untouched when `ctx` carries an upstream error.
    ///
    /// # Errors
    ///
    /// Returns `DataIntegrity` when the stored rows violate an invariant.
    fn after_read(&mut self, ctx: &HookContext<'_>) -> Result<()>;

    /// Unfold the aggregate into child rows for the engine to persist.
    ///
    /// # Errors
    ///
    /// Returns an error when the aggregate cannot be represented as rows;
    /// the engine aborts the enclosing write.
    fn before_write(&mut self, ctx: &HookContext<'_>) -> Result<()>;

    /// Discard the staged child rows.
    ///
    /// # Errors
    ///
    /// Implementations in this crate never fail.
    fn after_write(&mut self, ctx: &HookContext<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_context_without_error() {
        let ctx = HookContext::new("find_parent");
        assert_eq!(ctx.op(), "find_parent");
        assert!(!ctx.has_upstream_error());
    }

    #[test]
    fn test_context_carries_upstream_error() {
        let err = ExError::new(ExErrorKind::Persistence).with_message("no such table");
        let ctx = HookContext::new("find_entry").with_upstream_error(Some(&err));
        assert!(ctx.has_upstream_error());
        assert_eq!(
            ctx.upstream_error().map(|e| e.kind()),
            Some(ExErrorKind::Persistence)
        );
    }
}
