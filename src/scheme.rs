//! Well-known scheme identifiers.

/// Identifiers for a fixed set of well-known schemes.
///
/// A parsed URL classifies its scheme against this table without
/// interpreting it any further. Schemes are matched
/// case-insensitively, so `HTTP://…` is [`SchemeId::Http`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SchemeId {
    /// No scheme is present.
    None,
    /// A scheme is present but is not in the well-known table.
    Unknown,
    /// File Transfer Protocol.
    Ftp,
    /// Host-specific file names.
    File,
    /// Hypertext Transfer Protocol.
    Http,
    /// Secure Hypertext Transfer Protocol.
    Https,
    /// Electronic mail address.
    Mailto,
    /// Uniform Resource Name.
    Urn,
    /// WebSocket.
    Ws,
    /// Secure WebSocket.
    Wss,
}

impl SchemeId {
    /// Looks up a scheme name, matched case-insensitively.
    ///
    /// Dispatches on length and first byte to minimize comparisons.
    #[must_use]
    pub fn lookup(scheme: &str) -> SchemeId {
        const MAX_LEN: usize = 6;

        let len = scheme.len();
        if len == 0 || len > MAX_LEN {
            return if len == 0 {
                SchemeId::None
            } else {
                SchemeId::Unknown
            };
        }

        let mut buf = [0; MAX_LEN];
        for (i, x) in scheme.bytes().enumerate() {
            buf[i] = x.to_ascii_lowercase();
        }

        match (len, buf[0]) {
            (2, b'w') if &buf[..2] == b"ws" => SchemeId::Ws,
            (3, b'w') if &buf[..3] == b"wss" => SchemeId::Wss,
            (3, b'f') if &buf[..3] == b"ftp" => SchemeId::Ftp,
            (3, b'u') if &buf[..3] == b"urn" => SchemeId::Urn,
            (4, b'h') if &buf[..4] == b"http" => SchemeId::Http,
            (4, b'f') if &buf[..4] == b"file" => SchemeId::File,
            (5, b'h') if &buf[..5] == b"https" => SchemeId::Https,
            (6, b'm') if &buf[..6] == b"mailto" => SchemeId::Mailto,
            _ => SchemeId::Unknown,
        }
    }

    /// Returns the default port of the scheme if it is registered
    /// at IANA with one.
    #[must_use]
    pub fn default_port(&self) -> Option<u16> {
        match self {
            SchemeId::Ftp => Some(21),
            SchemeId::Http | SchemeId::Ws => Some(80),
            SchemeId::Https | SchemeId::Wss => Some(443),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(SchemeId::lookup("http"), SchemeId::Http);
        assert_eq!(SchemeId::lookup("HTTPS"), SchemeId::Https);
        assert_eq!(SchemeId::lookup("wS"), SchemeId::Ws);
        assert_eq!(SchemeId::lookup("wss"), SchemeId::Wss);
        assert_eq!(SchemeId::lookup("ftp"), SchemeId::Ftp);
        assert_eq!(SchemeId::lookup("File"), SchemeId::File);
        assert_eq!(SchemeId::lookup("mailto"), SchemeId::Mailto);
        assert_eq!(SchemeId::lookup("urn"), SchemeId::Urn);
        assert_eq!(SchemeId::lookup("gemini"), SchemeId::Unknown);
        assert_eq!(SchemeId::lookup("ftps"), SchemeId::Unknown);
        assert_eq!(SchemeId::lookup(""), SchemeId::None);
    }

    #[test]
    fn default_ports() {
        assert_eq!(SchemeId::Http.default_port(), Some(80));
        assert_eq!(SchemeId::Wss.default_port(), Some(443));
        assert_eq!(SchemeId::Mailto.default_port(), None);
        assert_eq!(SchemeId::Unknown.default_port(), None);
    }
}
