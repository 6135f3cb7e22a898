pub mod health;
pub mod inference;
pub mod level;

pub use health::*;
pub use inference::*;
pub use level::*;

/// Version reported as `engine_version` in every inference response.
pub const ENGINE_VERSION: &str = "0.1.0";

/// Library version reported when the index document carries none.
pub const DEFAULT_LIBRARY_VERSION: &str = "v0.1.0";

/// Derailer identifier returned when a level has no candidates.
pub const NO_DERAILER_FOUND: &str = "NO_DERAILER_FOUND";

/// The only confidence bucket the stub engine ever reports.
pub const CONFIDENCE_MEDIUM: &str = "medium";

/// Marker returned by `/debug/ping`.
pub const DEBUG_PING_CODE: &str = "lnac-debug-ping";
