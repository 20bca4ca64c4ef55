mod generate_config;
mod locate;
mod scrape;

pub use generate_config::*;
pub use locate::*;
pub use scrape::*;
