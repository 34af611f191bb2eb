//! Foundation types for Twig.
//!
//! Every other Twig crate depends on `twig-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (160-bit SHA-1 digest)
//! - [`TypeError`] -- Parse failures for identifiers

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, OBJECT_ID_HEX_LEN, OBJECT_ID_LEN};
