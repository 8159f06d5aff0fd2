use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers, tests and the CLI
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Integrity/Validation
    /// Stored or staged rows violate a structural rule (e.g. empty link key)
    DataIntegrity,
    InvalidInput,
    NotFound,
    ConstraintViolation,

    // Pipeline
    /// A persistence step failed before the lifecycle hook ran
    Upstream,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DataIntegrity => "ERR_DATA_INTEGRITY",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Upstream => "ERR_UPSTREAM",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus
/// optional context (operation, entity, message, source) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for the mapping pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkMapError {
    /// A link row carried an empty key
    #[error("empty key for entry links (entry_pk: {entry_pk})")]
    EmptyLinkKey { entry_pk: u64 },

    /// A link key does not fit the VARCHAR(64) key column
    #[error("link key for entry {entry_pk} is {len} characters, limit is {max}")]
    LinkKeyTooLong { entry_pk: u64, len: usize, max: usize },

    /// No parent row with this key
    #[error("Parent not found: {parent_pk}")]
    ParentNotFound { parent_pk: u64 },

    /// No entry row with this key
    #[error("Entry not found: {entry_pk}")]
    EntryNotFound { entry_pk: u64 },

    /// A u64 key cannot be represented by the INT8 column
    #[error("Key {value} for column {column} exceeds the INT8 range")]
    KeyOutOfRange { column: String, value: u64 },

    /// A stored key is negative and cannot become a u64 key
    #[error("Stored key {value} in column {column} is negative")]
    NegativeStoredKey { column: String, value: i64 },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<LinkMapError> for ExError {
    fn from(err: LinkMapError) -> Self {
        let message = err.to_string();
        match err {
            LinkMapError::EmptyLinkKey { entry_pk } => ExError::new(ExErrorKind::DataIntegrity)
                .with_entity_id(entry_pk.to_string())
                .with_message(message),

            LinkMapError::LinkKeyTooLong { entry_pk, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(entry_pk.to_string())
                    .with_message(message)
            }

            LinkMapError::ParentNotFound { parent_pk } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(parent_pk.to_string())
                .with_op("find_parent")
                .with_message("Parent not found"),

            LinkMapError::EntryNotFound { entry_pk } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(entry_pk.to_string())
                .with_op("find_entry")
                .with_message("Entry not found"),

            LinkMapError::KeyOutOfRange { value, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(value.to_string())
                .with_message(message),

            LinkMapError::NegativeStoredKey { value, .. } => {
                ExError::new(ExErrorKind::DataIntegrity)
                    .with_entity_id(value.to_string())
                    .with_message(message)
            }

            LinkMapError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for LinkMapError {
    fn from(err: serde_json::Error) -> Self {
        LinkMapError::Serialization {
            message: err.to_string(),
        }
    }
}
