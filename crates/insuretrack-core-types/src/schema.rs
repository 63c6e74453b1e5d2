//! Canonical field keys and event names for structured logging

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Acting identity
pub const FIELD_ACTOR_ID: &str = "actor_id";
pub const FIELD_ACTOR_ROLE: &str = "actor_role";

// Entity identifiers
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_POLICY_ID: &str = "policy_id";
pub const FIELD_CLAIM_ID: &str = "claim_id";
pub const FIELD_NOTIFICATION_ID: &str = "notification_id";

// Backup engine
pub const FIELD_BACKUP_FILE: &str = "backup_file";
pub const FIELD_BACKUP_TIMESTAMP: &str = "backup_timestamp";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
