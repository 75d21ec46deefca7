//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&mut PgConnection` as the first argument, so the same
//! methods run inside a transaction (`&mut *tx`) or on a pooled connection.

pub mod bid_repo;
pub mod bid_version_repo;
pub mod decision_repo;
pub mod employee_repo;
pub mod feedback_repo;
pub mod organization_repo;
pub mod tender_repo;
pub mod tender_version_repo;

pub use bid_repo::BidRepo;
pub use bid_version_repo::BidVersionRepo;
pub use decision_repo::DecisionRepo;
pub use employee_repo::EmployeeRepo;
pub use feedback_repo::FeedbackRepo;
pub use organization_repo::OrganizationRepo;
pub use tender_repo::TenderRepo;
pub use tender_version_repo::TenderVersionRepo;
