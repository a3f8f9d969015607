//! Iterators over the parameters of a query.

use crate::{
    encoding::{self, DecodeOptions, PctStr},
    error::{ParseError, ParseErrorKind, Result},
};
use std::iter::FusedIterator;

/// A `key [ "=" value ]` unit of a query, in its raw form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedParam<'a> {
    /// The parameter key.
    pub key: &'a PctStr,
    /// The parameter value; empty when no `=` is present.
    pub value: &'a PctStr,
    /// Distinguishes `k` from `k=`.
    pub has_value: bool,
}

/// A `key [ "=" value ]` unit of a query, in its decoded form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// The decoded parameter key.
    pub key: String,
    /// The decoded parameter value; empty when no `=` is present.
    pub value: String,
    /// Distinguishes `k` from `k=`.
    pub has_value: bool,
}

/// The traversal engine shared by the encoded and decoded parameter
/// iterators.
///
/// A present query always carries at least one parameter; further
/// parameters are introduced by `&`. The element count is fixed at
/// parse time.
#[derive(Clone, Debug)]
struct ParamIter<'a> {
    rest: &'a str,
    remaining: usize,
}

impl<'a> ParamIter<'a> {
    fn new(query: &'a str, count: usize) -> Self {
        ParamIter {
            rest: query,
            remaining: count,
        }
    }

    fn next(&mut self) -> Option<EncodedParam<'a>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(split_param(match self.rest.split_once('&') {
            Some((param, rest)) => {
                self.rest = rest;
                param
            }
            None => std::mem::take(&mut self.rest),
        }))
    }

    fn next_back(&mut self) -> Option<EncodedParam<'a>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(split_param(match self.rest.rsplit_once('&') {
            Some((rest, param)) => {
                self.rest = rest;
                param
            }
            None => std::mem::take(&mut self.rest),
        }))
    }
}

fn split_param(s: &str) -> EncodedParam<'_> {
    match s.split_once('=') {
        Some((key, value)) => EncodedParam {
            key: PctStr::new_validated(key),
            value: PctStr::new_validated(value),
            has_value: true,
        },
        None => EncodedParam {
            key: PctStr::new_validated(s),
            value: PctStr::EMPTY,
            has_value: false,
        },
    }
}

/// Checks that a lookup key is properly percent-encoded.
///
/// A key that fails to decode is a parse error, not "not found".
fn check_key(key: &str) -> Result<()> {
    let bytes = key.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = i + 2 < bytes.len()
                && encoding::decode_hexdig(bytes[i + 1]).is_some()
                && encoding::decode_hexdig(bytes[i + 2]).is_some();
            if !valid {
                return Err(ParseError {
                    index: i,
                    kind: ParseErrorKind::InvalidPercent,
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Iterates the percent-decoded bytes of an encoded string.
fn decoded_bytes(s: &str) -> impl Iterator<Item = u8> + '_ {
    let bytes = s.as_bytes();
    let mut i = 0;
    std::iter::from_fn(move || {
        let &x = bytes.get(i)?;
        if x == b'%' {
            i += 3;
            Some(encoding::decode_octet(bytes[i - 2], bytes[i - 1]))
        } else {
            i += 1;
            Some(x)
        }
    })
}

/// Compares two encoded strings as if both were percent-decoded.
fn decoded_eq(a: &str, b: &str, ignore_case: bool) -> bool {
    let fold = |x: u8| if ignore_case { x.to_ascii_lowercase() } else { x };
    decoded_bytes(a).map(fold).eq(decoded_bytes(b).map(fold))
}

macro_rules! lookup_methods {
    ($item:ty) => {
        /// Checks whether a parameter with a matching key exists.
        ///
        /// The comparison is performed as if both keys were
        /// percent-decoded, case-folded when `ignore_case` is set.
        ///
        /// # Errors
        ///
        /// Returns `Err` if `key` contains an invalid percent-encoding.
        pub fn contains(&self, key: &str, ignore_case: bool) -> Result<bool> {
            self.find(key, ignore_case).map(|found| found.is_some())
        }

        /// Returns the number of parameters with a matching key.
        ///
        /// # Errors
        ///
        /// Returns `Err` if `key` contains an invalid percent-encoding.
        pub fn count(&self, key: &str, ignore_case: bool) -> Result<usize> {
            check_key(key)?;
            let mut iter = self.inner.clone();
            let mut n = 0;
            while let Some(param) = iter.next() {
                if decoded_eq(param.key.as_str(), key, ignore_case) {
                    n += 1;
                }
            }
            Ok(n)
        }

        /// Finds the first parameter with a matching key.
        ///
        /// # Errors
        ///
        /// Returns `Err` if `key` contains an invalid percent-encoding.
        pub fn find(&self, key: &str, ignore_case: bool) -> Result<Option<$item>> {
            self.find_from(0, key, ignore_case)
        }

        /// Finds the last parameter with a matching key.
        ///
        /// # Errors
        ///
        /// Returns `Err` if `key` contains an invalid percent-encoding.
        pub fn find_last(&self, key: &str, ignore_case: bool) -> Result<Option<$item>> {
            check_key(key)?;
            Ok(self
                .inner
                .clone()
                .matching_back(key, ignore_case)
                .map(|p| self.project(p)))
        }

        /// Finds the first parameter with a matching key, starting
        /// from the given parameter position.
        ///
        /// # Errors
        ///
        /// Returns `Err` if `key` contains an invalid percent-encoding.
        pub fn find_from(
            &self,
            from: usize,
            key: &str,
            ignore_case: bool,
        ) -> Result<Option<$item>> {
            check_key(key)?;
            let mut iter = self.inner.clone();
            for _ in 0..from {
                if iter.next().is_none() {
                    break;
                }
            }
            Ok(iter.matching(key, ignore_case).map(|p| self.project(p)))
        }
    };
}

impl<'a> ParamIter<'a> {
    fn matching(mut self, key: &str, ignore_case: bool) -> Option<EncodedParam<'a>> {
        while let Some(param) = self.next() {
            if decoded_eq(param.key.as_str(), key, ignore_case) {
                return Some(param);
            }
        }
        None
    }

    fn matching_back(mut self, key: &str, ignore_case: bool) -> Option<EncodedParam<'a>> {
        while let Some(param) = self.next_back() {
            if decoded_eq(param.key.as_str(), key, ignore_case) {
                return Some(param);
            }
        }
        None
    }
}

/// An iterator over the query parameters in their raw form.
///
/// This struct is created by [`UrlView::encoded_params`].
///
/// [`UrlView::encoded_params`]: crate::UrlView::encoded_params
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct EncodedParams<'a> {
    inner: ParamIter<'a>,
}

impl<'a> EncodedParams<'a> {
    pub(crate) fn new(query: &'a str, count: usize) -> Self {
        EncodedParams {
            inner: ParamIter::new(query, count),
        }
    }

    fn project(&self, param: EncodedParam<'a>) -> EncodedParam<'a> {
        param
    }

    lookup_methods!(EncodedParam<'a>);
}

impl<'a> Iterator for EncodedParams<'a> {
    type Item = EncodedParam<'a>;

    fn next(&mut self) -> Option<EncodedParam<'a>> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl DoubleEndedIterator for EncodedParams<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for EncodedParams<'_> {}

impl FusedIterator for EncodedParams<'_> {}

/// An iterator over the query parameters in their decoded form.
///
/// This struct is created by [`UrlView::params`] and
/// [`UrlView::params_with`].
///
/// [`UrlView::params`]: crate::UrlView::params
/// [`UrlView::params_with`]: crate::UrlView::params_with
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Params<'a> {
    inner: ParamIter<'a>,
    options: DecodeOptions,
}

impl<'a> Params<'a> {
    pub(crate) fn new(query: &'a str, count: usize, options: DecodeOptions) -> Self {
        Params {
            inner: ParamIter::new(query, count),
            options,
        }
    }

    fn project(&self, param: EncodedParam<'a>) -> Param {
        let decode = |s: &PctStr| s.decode_with(self.options).into_string_lossy().into_owned();
        Param {
            key: decode(param.key),
            value: decode(param.value),
            has_value: param.has_value,
        }
    }

    lookup_methods!(Param);
}

impl Iterator for Params<'_> {
    type Item = Param;

    fn next(&mut self) -> Option<Param> {
        self.inner.next().map(|param| self.project(param))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl DoubleEndedIterator for Params<'_> {
    fn next_back(&mut self) -> Option<Param> {
        self.inner.next_back().map(|param| self.project(param))
    }
}

impl ExactSizeIterator for Params<'_> {}

impl FusedIterator for Params<'_> {}
