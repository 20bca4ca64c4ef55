mod element;
mod file;

#[cfg(test)]
mod test_only;

pub use self::element::*;
pub use self::file::*;

#[cfg(test)]
pub use self::test_only::*;
