//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Batch loads for embedded collections (no N+1)
//! - Unique violations surface as conflicts instead of check-then-insert
//! - Existence check and write share one transaction

pub mod members;
pub mod teams;
pub mod feedback;

pub use members::MemberRepo;
pub use teams::TeamRepo;
pub use feedback::FeedbackRepo;
