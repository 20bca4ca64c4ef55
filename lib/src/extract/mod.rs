//! Small, reusable extraction routines shared by the page scrapers.
//!
//! Each function reads one shape of node and returns `None` when the shape is missing.
//! None of them mutate the document.

mod author;
mod fields;
mod links;

pub use self::author::*;
pub use self::fields::*;
pub use self::links::*;
