//! Tracing/logging setup shared by every binary in the workspace.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing with the format chosen by
/// `GARAGE_LOG_FORMAT` (`json` unless set to `pretty`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
