//! Month-close status.

use serde::{Deserialize, Serialize};

/// Whether a calendar month still accepts attendance writes.
///
/// Scoped company-wide and owned by finance; the engine only reads it, and
/// only enforces it when the month-close feature flag is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthCloseStatus {
    /// The month is open for attendance writes.
    Open,
    /// Finance has finalized the month; writes are blocked when enforcement
    /// is enabled.
    Closed,
}

impl MonthCloseStatus {
    /// Returns true if the month is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, MonthCloseStatus::Closed)
    }
}
