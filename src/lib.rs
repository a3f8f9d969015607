#![warn(rust_2018_idioms, unreachable_pub, missing_docs)]
//! A zero-copy URL parser and inspection library that strictly
//! adheres to IETF [RFC 3986].
//!
//! The central type is [`UrlView`], a non-owning view over a
//! caller-supplied buffer. Parsing populates a compact index table
//! so that every component accessor is a constant-time borrowed
//! slice; nothing is allocated until a decoded form is requested.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/

/// Utilities for percent-encoding.
pub mod encoding;

/// Grammar rules and combinators underlying the parsers.
pub mod grammar;

mod authority;
mod compare;
mod error;
mod fmt;
mod index;
mod params;
mod parser;
mod scheme;
mod segments;
mod view;

pub use authority::AuthorityView;
pub use error::{ParseError, ParseErrorKind};
pub use index::HostKind;
pub use params::{EncodedParam, EncodedParams, Param, Params};
pub use scheme::SchemeId;
pub use segments::{EncodedSegments, Segments};
pub use view::UrlView;
