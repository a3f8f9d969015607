use crate::{
    encoding::{DecodeOptions, PctStr},
    error::Result,
    index::{HostKind, Part, UrlIndex},
    parser,
    view::Raw,
};
use std::net::{Ipv4Addr, Ipv6Addr};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A non-owning view of an authority.
///
/// An authority view reuses the index-table machinery of
/// [`UrlView`](crate::UrlView) on a narrower buffer that carries no
/// `//` marker and no parts outside the authority. It is obtained
/// either from [`UrlView::authority`](crate::UrlView::authority) or
/// by parsing a standalone `authority` production with
/// [`parse`](Self::parse).
///
/// # Examples
///
/// ```
/// use url_view::AuthorityView;
///
/// let auth = AuthorityView::parse("user:pass@[::1]:8080")?;
/// assert_eq!(auth.user(), "user");
/// assert!(auth.has_password());
/// assert_eq!(auth.host(), "::1");
/// assert_eq!(auth.port_number(), 8080);
/// # Ok::<_, url_view::ParseError>(())
/// ```
#[derive(Clone, Copy)]
pub struct AuthorityView<'a> {
    s: &'a str,
    idx: UrlIndex,
}

impl<'a> AuthorityView<'a> {
    /// Parses an `authority` spanning the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`](crate::ParseError) carrying the kind
    /// and byte index of the first mismatch.
    pub fn parse(s: &'a str) -> Result<Self> {
        parser::parse_authority(s).map(|idx| AuthorityView { s, idx })
    }

    pub(crate) fn from_parts(s: &'a str, idx: UrlIndex) -> Self {
        AuthorityView { s, idx }
    }

    fn raw(&self) -> Raw<'a, '_> {
        Raw::new(self.s, &self.idx)
    }

    /// Returns the entire authority as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.s
    }

    /// Checks whether a userinfo subcomponent is present.
    #[must_use]
    pub fn has_userinfo(&self) -> bool {
        self.raw().has_userinfo()
    }

    /// Returns the userinfo (`user [ ":" password ]`) in its raw form.
    #[must_use]
    pub fn encoded_userinfo(&self) -> Option<&'a PctStr> {
        self.raw().userinfo()
    }

    /// Returns the decoded userinfo.
    #[must_use]
    pub fn decoded_userinfo(&self) -> Option<String> {
        self.encoded_userinfo()
            .map(|s| s.decode().into_string_lossy().into_owned())
    }

    /// Checks whether a password is present.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.raw().has_password()
    }

    /// Returns the user in its raw form; empty when no userinfo is
    /// present.
    #[must_use]
    pub fn user(&self) -> &'a PctStr {
        self.raw().user()
    }

    /// Returns the decoded user.
    #[must_use]
    pub fn decoded_user(&self) -> String {
        let raw = self.raw();
        raw.decoded(Part::User, raw.user().as_str(), DecodeOptions::strict())
    }

    /// Returns the password in its raw form; empty when absent.
    #[must_use]
    pub fn password(&self) -> &'a PctStr {
        self.raw().password()
    }

    /// Returns the decoded password.
    #[must_use]
    pub fn decoded_password(&self) -> String {
        let raw = self.raw();
        raw.decoded(Part::Pass, raw.password().as_str(), DecodeOptions::strict())
    }

    /// Returns the classification of the host.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.idx.host_kind
    }

    /// Returns the host in its raw form, brackets stripped from IP
    /// literals.
    #[must_use]
    pub fn host(&self) -> &'a PctStr {
        self.raw().host()
    }

    /// Returns the decoded host.
    #[must_use]
    pub fn decoded_host(&self) -> String {
        let raw = self.raw();
        raw.decoded(Part::Host, raw.host().as_str(), DecodeOptions::strict())
    }

    /// Returns the parsed IPv4 address, or the unspecified address
    /// when the host is not one.
    #[must_use]
    pub fn host_ipv4(&self) -> Ipv4Addr {
        self.raw().host_ipv4()
    }

    /// Returns the parsed IPv6 address, or the unspecified address
    /// when the host is not one.
    #[must_use]
    pub fn host_ipv6(&self) -> Ipv6Addr {
        self.raw().host_ipv6()
    }

    /// Returns the IPvFuture address without brackets, or an empty
    /// slice when the host is not one.
    #[must_use]
    pub fn host_ipv_future(&self) -> &'a str {
        self.raw().host_ipv_future()
    }

    /// Checks whether a port is present.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.raw().has_port()
    }

    /// Returns the port digits without the leading `:`.
    #[must_use]
    pub fn port(&self) -> &'a str {
        self.raw().port()
    }

    /// Returns the port as a number; zero when absent, empty, or not
    /// representable in 16 bits.
    #[must_use]
    pub fn port_number(&self) -> u16 {
        self.idx.port_number
    }

    /// Returns the host and port as one contiguous slice.
    #[must_use]
    pub fn encoded_host_and_port(&self) -> &'a str {
        self.raw().host_and_port()
    }
}

#[cfg(feature = "serde")]
impl Serialize for AuthorityView<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
