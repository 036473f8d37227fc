//! Structured logging schema for quire.
//!
//! Field names every crate uses in `tracing` events, and the values of the
//! `subsystem` field. Keeping them here lets log queries filter on one
//! vocabulary across the store, inference, and HTTP layers.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed on a store or internal error |
//! | WARN  | Recoverable issue, fallback applied (bad blob, AI failure) |
//! | INFO  | Lifecycle events (startup, seed, import) |
//! | DEBUG | Per-operation completions with ids and counts |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event. Values: see `SUBSYSTEM_*`.
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem ("pool", "pages", "assist", ...).
pub const COMPONENT: &str = "component";

/// Logical operation name ("create", "import", "search", ...).
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

pub const DATABASE_ID: &str = "database_id";
pub const PAGE_ID: &str = "page_id";
pub const DASHBOARD_ID: &str = "dashboard_id";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned or affected.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Model name used for generation.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

// ─── Subsystem values ──────────────────────────────────────────────────────

pub const SUBSYSTEM_CORE: &str = "core";
pub const SUBSYSTEM_DB: &str = "database";
pub const SUBSYSTEM_INFERENCE: &str = "inference";
pub const SUBSYSTEM_API: &str = "api";
