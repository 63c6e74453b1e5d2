use insuretrack_core_types::schema::FIELD_REQUEST_ID;
use insuretrack_core_types::RequestId;
use thiserror::Error;

/// Result type alias for domain-level checks
pub type Result<T> = std::result::Result<T, TrackerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that crosses a crate boundary is classified by one of these
/// kinds. Each kind maps to a stable code used by the CLI, by tests, and in
/// structured log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    ConstraintViolation,

    // Backup
    /// A snapshot file parsed but failed schema or referential validation
    InvalidSnapshot,

    // Auth
    Unauthorised,
    Forbidden,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Configuration,

    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, entity, field) a user-facing message needs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            request_id: None,
            message: String::new(),
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

    /// Name the input field a validation or uniqueness failure belongs to
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
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
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " ({}: {})", FIELD_REQUEST_ID, request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for InsureTrack operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Policy not found: {policy_id}")]
    PolicyNotFound { policy_id: i64 },

    #[error("Claim not found: {claim_id}")]
    ClaimNotFound { claim_id: i64 },

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: i64 },

    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Policy number already exists: {policy_number}")]
    DuplicatePolicyNumber { policy_number: String },

    #[error("Claim number already exists: {claim_number}")]
    DuplicateClaimNumber { claim_number: String },

    /// A single input field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// A stored or submitted enum column holds an unknown value
    #[error("Unknown {kind} value: {value}")]
    InvalidEnumValue { kind: String, value: String },

    /// The policy a claim references belongs to somebody else
    #[error("Policy {policy_id} does not belong to user {user_id}")]
    ClaimPolicyOwnerMismatch { policy_id: i64, user_id: i64 },

    #[error("Policy {policy_id} is not active")]
    PolicyNotActive { policy_id: i64 },

    #[error("Access denied for {action}: {reason}")]
    AccessDenied { action: String, reason: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is deactivated: {username}")]
    AccountInactive { username: String },

    #[error("Cannot deactivate your own account")]
    CannotDeactivateSelf { user_id: i64 },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl TrackerError {
    /// Shorthand for a field validation failure
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        TrackerError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Conversion from TrackerError to ExError
impl From<TrackerError> for ExError {
    fn from(err: TrackerError) -> Self {
        let message = err.to_string();
        match err {
            TrackerError::UserNotFound { user_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(user_id.to_string())
                .with_message(message),

            TrackerError::PolicyNotFound { policy_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(policy_id.to_string())
                .with_message(message),

            TrackerError::ClaimNotFound { claim_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(claim_id.to_string())
                .with_message(message),

            TrackerError::NotificationNotFound { notification_id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(notification_id.to_string())
                    .with_message(message)
            }

            TrackerError::DuplicateUsername { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_field("username")
                .with_message(message),

            TrackerError::DuplicateEmail { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_field("email")
                .with_message(message),

            TrackerError::DuplicatePolicyNumber { .. } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_field("policy_number")
                    .with_message(message)
            }

            TrackerError::DuplicateClaimNumber { .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_field("claim_number")
                .with_message(message),

            TrackerError::InvalidField { field, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_field(field)
                .with_message(message),

            TrackerError::InvalidEnumValue { kind, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_field(kind)
                    .with_message(message)
            }

            TrackerError::ClaimPolicyOwnerMismatch { policy_id, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_entity_id(policy_id.to_string())
                    .with_field("policy_id")
                    .with_message(message)
            }

            TrackerError::PolicyNotActive { policy_id } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(policy_id.to_string())
                .with_field("policy_id")
                .with_message(message),

            TrackerError::AccessDenied { action, .. } => ExError::new(ExErrorKind::Forbidden)
                .with_op(action)
                .with_message(message),

            TrackerError::InvalidCredentials => {
                ExError::new(ExErrorKind::Unauthorised).with_message(message)
            }

            TrackerError::AccountInactive { username } => ExError::new(ExErrorKind::Unauthorised)
                .with_entity_id(username)
                .with_message(message),

            TrackerError::CannotDeactivateSelf { user_id } => {
                ExError::new(ExErrorKind::Forbidden)
                    .with_entity_id(user_id.to_string())
                    .with_message(message)
            }

            TrackerError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization {
            message: err.to_string(),
        }
    }
}
