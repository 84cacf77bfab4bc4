pub mod clock;
pub mod error;
pub mod item_directory;
pub mod loan_directory;
pub mod member_directory;

pub use clock::*;
pub use error::DirectoryError;
pub use item_directory::*;
pub use loan_directory::*;
pub use member_directory::*;
