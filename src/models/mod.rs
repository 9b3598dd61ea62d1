//! Data models for Courtside

pub mod booking;
pub mod enums;
pub mod pagination;
pub mod stats;
pub mod user;
pub mod venue;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails};
pub use enums::{ApprovalStatus, BookingStatus, PaymentStatus, Role, UserStatus};
pub use pagination::{PaginatedResponse, Pagination};
pub use user::{User, UserShort};
pub use venue::{Court, Venue};
