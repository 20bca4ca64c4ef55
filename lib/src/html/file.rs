use std::path::Path;

use kuchikiki::traits::TendrilSink;
use kuchikiki::NodeRef;

use crate::error::*;
use crate::util;

/// Parse a saved page from disk. Invalid UTF-8 sequences are replaced rather than rejected.
pub fn parse_file(filename: &Path) -> Result<NodeRef, ScrapeError> {
    let bytes = util::read_file_bytes(filename).map_err(ScrapeError::ReadFile)?;

    Ok(parse_bytes(&bytes))
}

pub fn parse_bytes(bytes: &[u8]) -> NodeRef {
    kuchikiki::parse_html().from_utf8().one(bytes)
}

pub fn parse_str(html_str: &str) -> NodeRef {
    kuchikiki::parse_html().one(html_str)
}
