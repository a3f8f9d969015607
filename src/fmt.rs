use crate::{
    authority::AuthorityView,
    encoding::PctStr,
    error::{ParseError, ParseErrorKind},
    view::UrlView,
};
use std::fmt::{Debug, Display, Formatter, Result};

impl Debug for PctStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl Display for PctStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let msg = match self.kind {
            ParseErrorKind::InvalidScheme => "invalid scheme at index ",
            ParseErrorKind::InvalidAuthority => "invalid authority at index ",
            ParseErrorKind::InvalidIpLiteral => "invalid IP literal at index ",
            ParseErrorKind::InvalidIpv4 => "invalid IPv4 address at index ",
            ParseErrorKind::InvalidIpv6 => "invalid IPv6 address at index ",
            ParseErrorKind::InvalidIpvFuture => "invalid IPvFuture address at index ",
            ParseErrorKind::InvalidPath => "invalid path at index ",
            ParseErrorKind::InvalidQuery => "invalid query at index ",
            ParseErrorKind::InvalidFragment => "invalid fragment at index ",
            ParseErrorKind::InvalidPercent => "invalid percent-encoded octet at index ",
            ParseErrorKind::TrailingBytes => "unconsumed trailing bytes at index ",
        };
        write!(f, "{}{}", msg, self.index)
    }
}

impl Display for UrlView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Debug for UrlView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("UrlView")
            .field("scheme", &self.scheme())
            .field("authority", &self.authority())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl Display for AuthorityView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Debug for AuthorityView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("AuthorityView")
            .field("userinfo", &self.encoded_userinfo())
            .field("host", &self.host())
            .field("host_kind", &self.host_kind())
            .field("port", &self.port())
            .finish()
    }
}
