//! Pure validation policy for attendance writes.
//!
//! Everything here is stateless and free of I/O: date grammar and
//! calendar checks, status/source normalization, the employment-period
//! bound, the same-day-only rule, the self-marking gate, and month-end
//! computation for month-close lookups.

mod dates;
mod marking;

pub use dates::{ensure_current_date, month_end, parse_date};
pub use marking::{
    check_self_mark, ensure_active, ensure_within_employment, parse_source, parse_status,
    require_reason,
};
