//! Error types.

/// Detailed cause of a [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The scheme rule was violated.
    ///
    /// The error index points to the first byte of the scheme.
    InvalidScheme,
    /// Malformed userinfo, host, or port.
    InvalidAuthority,
    /// Unbalanced brackets, or an inner address that is neither an
    /// IPv6 address nor an IPvFuture address.
    ///
    /// The error index points to the preceding left square bracket `[`.
    InvalidIpLiteral,
    /// A `dec-octet` overflowed 255 in a dotted-decimal address.
    InvalidIpv4,
    /// Malformed IPv6 address, excess `::` elisions, or a bad embedded
    /// IPv4 tail.
    InvalidIpv6,
    /// Bad version tag or body in an IPvFuture address.
    InvalidIpvFuture,
    /// A path variant was violated by its context, such as a path
    /// beginning with `//` when no authority is present.
    InvalidPath,
    /// Malformed percent-encoded octet in the query.
    InvalidQuery,
    /// Malformed percent-encoded octet in the fragment.
    InvalidFragment,
    /// A `%` not followed by two hexadecimal digits.
    ///
    /// The error index points to the percent character.
    InvalidPercent,
    /// The grammar was satisfied before the end of the input.
    ///
    /// The error index points to the first unconsumed byte.
    TrailingBytes,
}

/// An error occurred when parsing URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ParseErrorKind,
}

impl ParseError {
    /// Returns the index where the error occurred in the input string.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl std::error::Error for ParseError {}

pub(crate) type Result<T, E = ParseError> = std::result::Result<T, E>;
