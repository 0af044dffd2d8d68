//! API trait definitions split by responsibility
//!
//! This module organizes the GMP surface used by the scan workflow into
//! focused sub-traits:
//! - [`AuthApi`] - Session authentication
//! - [`ListingApi`] - Collection listing operations
//! - [`TaskApi`] - Target and task lifecycle
//! - [`ReportApi`] - Report download
//!
//! The [`GmpApi`] super-trait combines all four.

mod auth;
mod listing;
mod report;
mod task;

pub use auth::AuthApi;
pub use listing::ListingApi;
pub use report::ReportApi;
pub use task::TaskApi;

/// Everything the scan workflow needs from a scan manager session
pub trait GmpApi: AuthApi + ListingApi + TaskApi + ReportApi {}

impl<T: AuthApi + ListingApi + TaskApi + ReportApi> GmpApi for T {}
