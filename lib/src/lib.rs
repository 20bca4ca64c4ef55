pub mod config;
pub mod date;
pub mod error;
pub mod extract;
mod html;
pub mod location;
pub mod model;
pub mod scraper;
pub mod store;
pub mod util;

pub use self::error::*;
pub use self::html::{parse_bytes, parse_file, parse_str, NodeExt};
pub use kuchikiki::NodeRef;
