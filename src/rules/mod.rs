//! Pure domain rules evaluated at read time

pub mod booking_status;
pub mod listing;
pub mod venue_completeness;

pub use booking_status::{booking_timing, BookingTiming};
pub use venue_completeness::{filter_complete, is_complete, validation_details, ValidationDetails};
