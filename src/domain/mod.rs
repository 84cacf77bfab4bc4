pub mod commands;
pub mod errors;
pub mod item;
pub mod loan;
pub mod member;
pub mod value_objects;

pub use errors::*;
pub use item::{Item, Lendable};
pub use loan::{Loan, LoanStatus};
pub use member::Member;
pub use value_objects::*;
