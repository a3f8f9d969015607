//! Syntax-based comparison of URL views.

use crate::{
    encoding::{self, PctStr},
    grammar::charset::UNRESERVED,
    view::UrlView,
};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Iterates the bytes of a component as syntax-based normalization
/// would rewrite them, without touching the buffer: percent triplets
/// are uppercased, and those encoding unreserved characters are
/// decoded.
struct NormBytes<'a> {
    bytes: &'a [u8],
    i: usize,
    queued: [u8; 2],
    queued_len: usize,
}

impl<'a> NormBytes<'a> {
    fn new(s: &'a str) -> Self {
        NormBytes {
            bytes: s.as_bytes(),
            i: 0,
            queued: [0; 2],
            queued_len: 0,
        }
    }
}

impl Iterator for NormBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.queued_len > 0 {
            self.queued_len -= 1;
            return Some(self.queued[1 - self.queued_len]);
        }

        let &x = self.bytes.get(self.i)?;
        if x == b'%' {
            let hi = self.bytes[self.i + 1].to_ascii_uppercase();
            let lo = self.bytes[self.i + 2].to_ascii_uppercase();
            self.i += 3;

            let octet = encoding::decode_octet(hi, lo);
            if UNRESERVED.allows(octet) {
                Some(octet)
            } else {
                self.queued = [hi, lo];
                self.queued_len = 2;
                Some(b'%')
            }
        } else {
            self.i += 1;
            Some(x)
        }
    }
}

fn norm_cmp(a: &str, b: &str) -> Ordering {
    NormBytes::new(a).cmp(NormBytes::new(b))
}

fn lower_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|x| x.to_ascii_lowercase())
        .cmp(b.bytes().map(|x| x.to_ascii_lowercase()))
}

fn write_norm<H: Hasher>(state: &mut H, s: &str) {
    for x in NormBytes::new(s) {
        state.write_u8(x);
    }
    // Components are ASCII or decoded unreserved bytes, so 0xff
    // cannot occur in the stream.
    state.write_u8(0xff);
}

impl UrlView<'_> {
    /// Compares two URLs with [syntax-based normalization], yielding
    /// a total order.
    ///
    /// The scheme is compared case-insensitively; every other
    /// component is compared as if percent triplets were uppercased
    /// and escapes of unreserved characters were decoded. An absent
    /// component orders before a present one. The equality operators
    /// and the ordering operators all derive from this function.
    ///
    /// [syntax-based normalization]: https://datatracker.ietf.org/doc/html/rfc3986#section-6.2.2
    ///
    /// # Examples
    ///
    /// ```
    /// use url_view::UrlView;
    ///
    /// let a = UrlView::parse("HTTP://example.com/%7Eted")?;
    /// let b = UrlView::parse("http://example.com/~ted")?;
    /// assert_eq!(a, b);
    ///
    /// let c = UrlView::parse("http://example.com/~ted?")?;
    /// assert!(b < c);
    /// # Ok::<_, url_view::ParseError>(())
    /// ```
    #[must_use]
    pub fn compare(&self, other: &UrlView<'_>) -> Ordering {
        let opt_cmp = |x: Option<&PctStr>, y: Option<&PctStr>| match (x, y) {
            (Some(a), Some(b)) => norm_cmp(a.as_str(), b.as_str()),
            (a, b) => a.is_some().cmp(&b.is_some()),
        };

        self.has_scheme()
            .cmp(&other.has_scheme())
            .then_with(|| lower_cmp(self.scheme().unwrap_or(""), other.scheme().unwrap_or("")))
            .then_with(|| self.has_authority().cmp(&other.has_authority()))
            .then_with(|| self.has_userinfo().cmp(&other.has_userinfo()))
            .then_with(|| norm_cmp(self.user().as_str(), other.user().as_str()))
            .then_with(|| self.has_password().cmp(&other.has_password()))
            .then_with(|| norm_cmp(self.password().as_str(), other.password().as_str()))
            .then_with(|| norm_cmp(self.host().as_str(), other.host().as_str()))
            .then_with(|| self.has_port().cmp(&other.has_port()))
            .then_with(|| self.port().cmp(other.port()))
            .then_with(|| norm_cmp(self.path().as_str(), other.path().as_str()))
            .then_with(|| opt_cmp(self.query(), other.query()))
            .then_with(|| opt_cmp(self.fragment(), other.fragment()))
    }
}

impl PartialEq for UrlView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for UrlView<'_> {}

impl PartialOrd for UrlView<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for UrlView<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for UrlView<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with the normalized comparison.
        state.write_u8(self.has_scheme() as u8);
        for x in self.scheme().unwrap_or("").bytes() {
            state.write_u8(x.to_ascii_lowercase());
        }
        state.write_u8(0xff);

        state.write_u8(self.has_authority() as u8);
        state.write_u8(self.has_userinfo() as u8);
        write_norm(state, self.user().as_str());
        state.write_u8(self.has_password() as u8);
        write_norm(state, self.password().as_str());
        write_norm(state, self.host().as_str());
        state.write_u8(self.has_port() as u8);
        write_norm(state, self.port());

        write_norm(state, self.path().as_str());
        state.write_u8(self.has_query() as u8);
        write_norm(state, self.query().map_or("", PctStr::as_str));
        state.write_u8(self.has_fragment() as u8);
        write_norm(state, self.fragment().map_or("", PctStr::as_str));
    }
}
