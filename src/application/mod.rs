pub mod catalog_service;
pub mod consistency;
mod dependencies;
mod errors;
pub mod lending_service;
pub mod library;
pub mod member_service;

pub use consistency::{ConsistencyReport, Violation, check_consistency};
pub use dependencies::ServiceDependencies;
pub use errors::{ErrorKind, LibraryError, Operation, OperationFailed, Result};
pub use lending_service::{register_return, request_loan};
pub use library::{Library, LibrarySummary};
