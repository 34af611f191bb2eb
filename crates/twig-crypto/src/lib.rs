//! Content hashing for Twig.
//!
//! Object identity is the plain SHA-1 digest of an object's bytes, with no
//! type header or domain tag, so that objects written by any Twig client
//! land at the same path under `.Twig/objects/`.

pub mod hasher;

pub use hasher::ContentHasher;
