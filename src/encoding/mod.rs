//! Percent-encoding utilities.

mod imp;

pub(crate) use imp::{decode_hexdig, decode_octet, decoded_len};

use ref_cast::{ref_cast_custom, RefCastCustom};
use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Options controlling percent-decoding.
///
/// The options only affect decoding in query context (the query
/// component, and parameter keys and values); everywhere else `+`
/// always stands for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode `+` as a space, as in `application/x-www-form-urlencoded`.
    pub plus_as_space: bool,
}

impl DecodeOptions {
    /// Strict RFC 3986 behavior: `+` stands for itself.
    #[must_use]
    pub const fn strict() -> Self {
        DecodeOptions {
            plus_as_space: false,
        }
    }
}

impl Default for DecodeOptions {
    /// Returns the form-urlencoded behavior: `+` decodes to a space.
    fn default() -> Self {
        DecodeOptions {
            plus_as_space: true,
        }
    }
}

/// Decodes into an owned string sized from the stored decoded length,
/// replacing invalid UTF-8 sequences with `U+FFFD`.
pub(crate) fn decode_to_string(s: &str, cap: usize, options: DecodeOptions) -> String {
    match imp::decode(s.as_bytes(), cap, options.plus_as_space) {
        Some(vec) => String::from_utf8(vec)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
        None => s.to_owned(),
    }
}

/// A string slice with valid percent-encoding.
///
/// Every `%` in the underlying string begins a `%HH` triplet with two
/// hexadecimal digits; aside from that the slice is uninterpreted.
/// Component accessors return `&PctStr` so that the raw form can be
/// inspected and the decoded form produced on demand.
///
/// # Comparison
///
/// `PctStr` slices are compared lexicographically by their byte
/// values. Normalization is **not** performed prior to comparison.
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct PctStr {
    inner: str,
}

impl PctStr {
    /// Converts a string slice to a `PctStr` slice assuming validity.
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty `PctStr` slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Converts a string slice to a `PctStr` slice, returning `None`
    /// if the string contains an invalid percent-encoding.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if imp::validate(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Converts a string slice to a `PctStr` slice.
    ///
    /// # Panics
    ///
    /// Panics if the string contains an invalid percent-encoding.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("invalid percent-encoding"),
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length of the slice in bytes of the encoded form.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of bytes the slice produces after decoding.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        imp::decoded_len(self.inner.as_bytes())
    }

    /// Decodes the slice, treating `+` as itself.
    ///
    /// This method allocates only when the slice contains a
    /// percent-encoded octet.
    #[must_use]
    pub fn decode(&self) -> Decode<'_> {
        self.decode_with(DecodeOptions::strict())
    }

    /// Decodes the slice with the given options.
    #[must_use]
    pub fn decode_with(&self, options: DecodeOptions) -> Decode<'_> {
        let bytes = self.inner.as_bytes();
        match imp::decode(bytes, self.decoded_len(), options.plus_as_space) {
            Some(vec) => Decode::Owned(vec),
            None => Decode::Borrowed(self.as_str()),
        }
    }
}

impl AsRef<str> for PctStr {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl PartialEq for PctStr {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl PartialEq<str> for PctStr {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl PartialEq<PctStr> for str {
    fn eq(&self, other: &PctStr) -> bool {
        self == &other.inner
    }
}

impl PartialEq<&str> for PctStr {
    fn eq(&self, other: &&str) -> bool {
        &self.inner == *other
    }
}

impl Eq for PctStr {}

impl std::hash::Hash for PctStr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl PartialOrd for PctStr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PctStr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl Default for &PctStr {
    /// Creates an empty `PctStr` slice.
    fn default() -> Self {
        PctStr::EMPTY
    }
}

/// A wrapper of percent-decoded bytes.
///
/// This enum is created by [`PctStr::decode`] and [`PctStr::decode_with`].
#[derive(Clone, Debug)]
pub enum Decode<'a> {
    /// No byte was rewritten by decoding.
    Borrowed(&'a str),
    /// One or more bytes were rewritten by decoding.
    Owned(Vec<u8>),
}

impl<'a> Decode<'a> {
    /// Returns a reference to the decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Borrowed(s) => s.as_bytes(),
            Self::Owned(vec) => vec,
        }
    }

    /// Consumes this `Decode` and yields the underlying decoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Cow<'a, [u8]> {
        match self {
            Self::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Self::Owned(vec) => Cow::Owned(vec),
        }
    }

    /// Converts the decoded bytes to a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the bytes are not valid UTF-8.
    pub fn into_string(self) -> Result<Cow<'a, str>, FromUtf8Error> {
        match self {
            Self::Borrowed(s) => Ok(Cow::Borrowed(s)),
            Self::Owned(vec) => String::from_utf8(vec).map(Cow::Owned),
        }
    }

    /// Converts the decoded bytes to a string, replacing invalid
    /// UTF-8 sequences with `U+FFFD`.
    #[must_use]
    pub fn into_string_lossy(self) -> Cow<'a, str> {
        match self.into_string() {
            Ok(string) => string,
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}
