use serde::Serialize;

use crate::DEBUG_PING_CODE;

/// Payload returned by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Payload returned by `/debug/ping`.
///
/// The `code` marker lets operators confirm which build answered the ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingStatus {
    pub ok: bool,
    pub code: String,
}

impl Default for PingStatus {
    fn default() -> Self {
        Self {
            ok: true,
            code: DEBUG_PING_CODE.to_string(),
        }
    }
}
