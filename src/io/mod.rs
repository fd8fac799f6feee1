//! Optional export of sampling output to files.

#[cfg(feature = "csv")]
pub mod csv;
