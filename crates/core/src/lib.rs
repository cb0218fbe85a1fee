//! Booking form domain logic.
//!
//! Pure-logic crate with no I/O: tagged field inputs, the four-rule
//! validation pass, and the submit-gating form state that owns typed values
//! and displayed errors between submit attempts.

pub mod booking;
pub mod clock;
pub mod error;
pub mod types;
