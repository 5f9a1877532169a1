//! Snapvault-Common: the shared error taxonomy.
//!
//! Every snapvault crate speaks the same failure vocabulary: what the
//! caller got wrong, what the upstream provider did, what happened to an
//! individual upload, and what the record store reported.
//!
//! # Examples
//!
//! ```
//! use snapvault_common::{Error, Result};
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("abc123"))
//! }
//! ```

pub mod error;

pub use error::{Error, Result};
