//! Typed records produced by the scrapers.
//!
//! Every record is a plain value: it owns its data and keeps no reference into the document
//! it came from. Optional fields are `None` when the page simply did not show them.

mod form;
mod forum;
mod message;
mod post;
mod punishment;
mod thread;
mod user;

pub use self::form::*;
pub use self::forum::*;
pub use self::message::*;
pub use self::post::*;
pub use self::punishment::*;
pub use self::thread::*;
pub use self::user::*;

use serde_derive::Serialize;

/// Position within a paginated listing, as shown by the page navigation control.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PageInfo {
    pub page_number: u32,
    pub page_count: u32,
}
