//! Core business logic - framework-agnostic operations over the clinic data
//! model. The HTTP layer is a thin shell around these functions; everything
//! here is exercised directly by the test suite against in-memory `SQLite`.

/// Password hashing, credential checks, API tokens, and login sessions
pub mod auth;
/// Report renderers: CSV, paginated PDF, and XLSX
pub mod export;
/// Invoice creation with snapshotted line items, totals, and lifecycle
pub mod invoice;
/// Archive/restore lifecycle states and the declared cascade policy
pub mod lifecycle;
/// Patient CRUD and lifecycle
pub mod patient;
/// Sales aggregation: summaries, dashboard buckets, staff breakdown
pub mod report;
/// Service catalog CRUD, default-price rules, seeding, and lifecycle
pub mod service;
/// Staff registration, approval workflow, and lifecycle
pub mod staff;
