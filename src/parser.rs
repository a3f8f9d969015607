//! RFC 3986 rules and the four top-level parsers.

use crate::{
    encoding,
    error::{ParseError, ParseErrorKind, Result},
    grammar::{
        ahead,
        charset::{ALPHA, DIGIT, FRAGMENT, HEXDIG, IPV_FUTURE, PASSWORD, PCHAR, QUERY, REG_NAME,
                  SCHEME, SEGMENT_NZ_NC, USER},
        lit, non_empty, one_of, opt, pct_run, ranged, run, seq2, seq3, seq4, CharSet, Cursor,
        Mismatch, MismatchKind,
    },
    index::{HostKind, Part, UrlIndex},
    scheme::SchemeId,
};

/// Returns immediately with a parse error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError {
            index: $index,
            kind: ParseErrorKind::$kind,
        })
    };
}

/// Maps a kernel mismatch into the error taxonomy of its context.
///
/// A malformed percent octet keeps the query and fragment kinds and
/// becomes `InvalidPercent` everywhere else.
fn ctx_err(m: Mismatch, kind: ParseErrorKind) -> ParseError {
    let kind = match m.kind {
        MismatchKind::PctOctet => match kind {
            ParseErrorKind::InvalidQuery | ParseErrorKind::InvalidFragment => kind,
            _ => ParseErrorKind::InvalidPercent,
        },
        MismatchKind::Char => kind,
    };
    ParseError {
        index: m.index,
        kind,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Uri,
    AbsoluteUri,
    RelativeRef,
    UriReference,
}

/// `URI = scheme ":" hier-part [ "?" query ] [ "#" fragment ]`
pub(crate) fn parse_uri(s: &str) -> Result<UrlIndex> {
    parse(s, Flavor::Uri)
}

/// `absolute-URI = scheme ":" hier-part [ "?" query ]`
pub(crate) fn parse_absolute_uri(s: &str) -> Result<UrlIndex> {
    parse(s, Flavor::AbsoluteUri)
}

/// `relative-ref = relative-part [ "?" query ] [ "#" fragment ]`
pub(crate) fn parse_relative_ref(s: &str) -> Result<UrlIndex> {
    parse(s, Flavor::RelativeRef)
}

/// `URI-reference = URI / relative-ref`
pub(crate) fn parse_uri_reference(s: &str) -> Result<UrlIndex> {
    parse(s, Flavor::UriReference)
}

/// `authority = [ userinfo "@" ] host [ ":" port ]`, spanning the
/// whole input with no `//` marker.
pub(crate) fn parse_authority(s: &str) -> Result<UrlIndex> {
    let mut parser = Parser {
        cur: Cursor::new(s),
        out: UrlIndex::EMPTY,
    };
    parser.out.authority_scope = true;
    parser.parse_authority_parts(0)?;
    if parser.cur.has_remaining() {
        err!(parser.cur.pos(), TrailingBytes);
    }
    Ok(parser.out)
}

fn parse(s: &str, flavor: Flavor) -> Result<UrlIndex> {
    let mut parser = Parser {
        cur: Cursor::new(s),
        out: UrlIndex::EMPTY,
    };

    let has_scheme = match flavor {
        Flavor::Uri | Flavor::AbsoluteUri => {
            parser.parse_scheme()?;
            true
        }
        Flavor::RelativeRef => false,
        // alt(URI, relative-ref): retry from the start on a failed scheme.
        Flavor::UriReference => parser.try_scheme(),
    };

    if has_scheme {
        parser.parse_hier_part()?;
    } else {
        parser.parse_relative_part()?;
    }

    parser.parse_query()?;
    if flavor != Flavor::AbsoluteUri {
        parser.parse_fragment()?;
    }

    if parser.cur.has_remaining() {
        err!(parser.cur.pos(), TrailingBytes);
    }
    Ok(parser.out)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PathCtx {
    /// After an authority: `path-abempty`.
    AbEmpty,
    /// After `scheme:` with no authority:
    /// `path-absolute / path-rootless / path-empty`.
    Scheme,
    /// In a relative reference with no authority:
    /// `path-absolute / path-noscheme / path-empty`.
    NoScheme,
}

struct Parser<'a> {
    cur: Cursor<'a>,
    out: UrlIndex,
}

enum Group {
    /// `h16`: one to four hexadecimal digits.
    Hex(u16),
    /// Digits leading into a dotted IPv4 tail; nothing consumed yet.
    V4Tail,
}

enum V4Err {
    Shape,
    Overflow(usize),
}

enum V6Err {
    Structure,
    V4Overflow(usize),
}

impl<'a> Parser<'a> {
    fn set_part(&mut self, part: Part, len: usize, decoded: usize) {
        self.out.len[part as usize] = len;
        self.out.decoded[part as usize] = decoded;
    }

    fn record_scheme(&mut self) {
        let text = self.cur.taken(0);
        let name = &text[..text.len() - 1];
        self.set_part(Part::Scheme, text.len(), name.len());
        self.out.scheme_id = SchemeId::lookup(name);
    }

    fn parse_scheme(&mut self) -> Result<()> {
        match self.cur.apply(seq3(one_of(ALPHA), run(SCHEME), lit(b':'))) {
            Ok(_) => {
                self.record_scheme();
                Ok(())
            }
            Err(m) => err!(m.index, InvalidScheme),
        }
    }

    fn try_scheme(&mut self) -> bool {
        let matched = self
            .cur
            .apply(seq3(one_of(ALPHA), run(SCHEME), lit(b':')))
            .is_ok();
        if matched {
            self.record_scheme();
        }
        matched
    }

    fn parse_hier_part(&mut self) -> Result<()> {
        if self.cur.eat("//") {
            self.parse_authority_parts(2)?;
            self.check_after_authority()?;
            self.parse_path(PathCtx::AbEmpty)
        } else {
            self.parse_path(PathCtx::Scheme)
        }
    }

    fn parse_relative_part(&mut self) -> Result<()> {
        if self.cur.eat("//") {
            self.parse_authority_parts(2)?;
            self.check_after_authority()?;
            self.parse_path(PathCtx::AbEmpty)
        } else {
            self.parse_path(PathCtx::NoScheme)
        }
    }

    /// Parses `[ userinfo "@" ] host [ ":" port ]` at the cursor.
    ///
    /// `marker_len` is the length of the already consumed authority
    /// marker, counted into the user part: 2 for a URL, 0 for an
    /// authority-only view.
    fn parse_authority_parts(&mut self, marker_len: usize) -> Result<()> {
        let start = self.cur.pos();

        // The '@' terminator decides userinfo presence; look it up
        // ahead before consuming anything.
        let probe = ahead(seq3(
            pct_run(USER),
            opt(seq2(lit(b':'), pct_run(PASSWORD))),
            lit(b'@'),
        ));
        if let Ok((user, (pass, ()))) = self.cur.apply(probe) {
            let user_len = user.text.len();
            // The pass part runs from the ':' through the '@'.
            let pass_len = pass.as_ref().map_or(0, |(_, p)| p.text.len() + 1) + 1;
            self.cur.skip(user_len + pass_len);

            self.set_part(Part::User, marker_len + user_len, user.decoded_len);
            self.set_part(
                Part::Pass,
                pass_len,
                pass.as_ref().map_or(0, |(_, p)| p.decoded_len),
            );
        } else {
            self.set_part(Part::User, marker_len, 0);
        }

        self.parse_host()?;
        self.parse_port();
        Ok(())
    }

    /// The byte after an authority must begin a path, query or
    /// fragment, or end the input.
    fn check_after_authority(&self) -> Result<()> {
        match self.cur.peek(0) {
            None | Some(b'/' | b'?' | b'#') => Ok(()),
            Some(_) => err!(self.cur.pos(), InvalidAuthority),
        }
    }

    /// `host = IP-literal / IPv4address / reg-name`
    fn parse_host(&mut self) -> Result<()> {
        let start = self.cur.pos();

        if self.cur.peek(0) == Some(b'[') {
            self.parse_ip_literal(start)?;
            let len = self.cur.pos() - start;
            self.set_part(Part::Host, len, len);
            return Ok(());
        }

        // An IPv4 address wins only when nothing of a reg-name
        // follows it; a failed dotted quad is a reg-name.
        let v4 = scan_v4(&mut self.cur);
        let v4_end = self.cur.pos();
        let rest = self
            .cur
            .apply(pct_run(REG_NAME))
            .map_err(|m| ctx_err(m, ParseErrorKind::InvalidAuthority))?;

        match v4 {
            Ok(octets) if self.cur.pos() == v4_end => {
                self.out.host_kind = HostKind::Ipv4;
                self.out.ip_bytes[..4].copy_from_slice(&octets);
            }
            _ => self.out.host_kind = HostKind::Name,
        }
        self.set_part(
            Part::Host,
            self.cur.pos() - start,
            (v4_end - start) + rest.decoded_len,
        );
        Ok(())
    }

    /// `IP-literal = "[" ( IPv6address / IPvFuture ) "]"`
    fn parse_ip_literal(&mut self, bracket: usize) -> Result<()> {
        self.cur.skip(1);
        let inner = self.cur.pos();

        match self.cur.peek(0) {
            Some(b'v' | b'V') => {
                const V_TAG: &CharSet = &CharSet::new(b"vV");
                let rule = seq4(
                    one_of(V_TAG),
                    non_empty(run(HEXDIG)),
                    lit(b'.'),
                    non_empty(run(IPV_FUTURE)),
                );
                if let Err(m) = self.cur.apply(rule) {
                    err!(m.index, InvalidIpvFuture);
                }
                self.out.host_kind = HostKind::IpvFuture;
            }
            Some(x) if x == b':' || encoding::decode_hexdig(x).is_some() => {
                match scan_v6(&mut self.cur) {
                    Ok(segs) => {
                        for (i, seg) in segs.iter().enumerate() {
                            self.out.ip_bytes[2 * i..2 * i + 2]
                                .copy_from_slice(&seg.to_be_bytes());
                        }
                        self.out.host_kind = HostKind::Ipv6;
                    }
                    Err(V6Err::V4Overflow(index)) => err!(index, InvalidIpv4),
                    Err(V6Err::Structure) => err!(inner, InvalidIpv6),
                }
            }
            _ => err!(bracket, InvalidIpLiteral),
        }

        if !self.cur.eat("]") {
            err!(bracket, InvalidIpLiteral);
        }
        Ok(())
    }

    /// `port = *DIGIT`, numeric value saturating to zero above 65535.
    fn parse_port(&mut self) {
        if self.cur.eat(":") {
            let digits = self.cur.apply(run(DIGIT)).unwrap_or("");
            self.set_part(Part::Port, 1 + digits.len(), digits.len());
            self.out.port_number = port_number(digits);
        }
    }

    fn parse_path(&mut self, ctx: PathCtx) -> Result<()> {
        let start = self.cur.pos();
        let segment = pct_run(PCHAR);
        let kind = |m| ctx_err(m, ParseErrorKind::InvalidPath);

        let mut count = if self.cur.peek(0) == Some(b'/') {
            // path-abempty or path-absolute. A leading "//" cannot
            // reach this point; it is always consumed as the
            // authority marker by the caller.
            let (_, n) = self
                .cur
                .apply(seq2(lit(b'/'), ranged(segment, lit(b'/'), 1, usize::MAX)))
                .map_err(kind)?;
            n
        } else {
            match ctx {
                // path-abempty is empty here.
                PathCtx::AbEmpty => 0,
                PathCtx::Scheme => {
                    // path-rootless, or path-empty when nothing matches.
                    let n = self
                        .cur
                        .apply(ranged(segment, lit(b'/'), 1, usize::MAX))
                        .map_err(kind)?;
                    if self.cur.pos() == start {
                        0
                    } else {
                        n
                    }
                }
                PathCtx::NoScheme => {
                    // The first segment of path-noscheme has no colon.
                    let first = self
                        .cur
                        .apply(pct_run(SEGMENT_NZ_NC))
                        .map_err(kind)?;
                    if self.cur.peek(0) == Some(b':') {
                        err!(self.cur.pos(), InvalidPath);
                    }
                    if first.text.is_empty() {
                        0
                    } else if self.cur.eat("/") {
                        1 + self
                            .cur
                            .apply(ranged(segment, lit(b'/'), 1, usize::MAX))
                            .map_err(kind)?
                    } else {
                        1
                    }
                }
            }
        };

        let text = self.cur.taken(start);
        if text == "/" {
            count = 0;
        }
        self.set_part(Part::Path, text.len(), encoding::decoded_len(text.as_bytes()));
        self.out.segment_count = count;
        Ok(())
    }

    /// `query = *( pchar / "/" / "?" )`, with parameters counted in a
    /// second pass over the accepted text.
    fn parse_query(&mut self) -> Result<()> {
        if self.cur.eat("?") {
            let span = self
                .cur
                .apply(pct_run(QUERY))
                .map_err(|m| ctx_err(m, ParseErrorKind::InvalidQuery))?;
            self.set_part(Part::Query, 1 + span.text.len(), span.decoded_len);
            self.out.param_count = span.text.bytes().filter(|&x| x == b'&').count() + 1;
        }
        Ok(())
    }

    fn parse_fragment(&mut self) -> Result<()> {
        if self.cur.eat("#") {
            let span = self
                .cur
                .apply(pct_run(FRAGMENT))
                .map_err(|m| ctx_err(m, ParseErrorKind::InvalidFragment))?;
            self.set_part(Part::Fragment, 1 + span.text.len(), span.decoded_len);
        }
        Ok(())
    }
}

fn port_number(digits: &str) -> u16 {
    let digits = digits.trim_start_matches('0');
    if digits.len() > 5 {
        return 0;
    }
    match digits.parse::<u32>() {
        Ok(v) if v <= u16::MAX as u32 => v as u16,
        _ => 0,
    }
}

/// `IPv4address = dec-octet "." dec-octet "." dec-octet "." dec-octet`
///
/// Restores the cursor on failure. An overflowing `dec-octet` is
/// reported apart from a shape mismatch so that an embedded address
/// inside an IPv6 literal can surface it.
fn scan_v4(cur: &mut Cursor<'_>) -> Result<[u8; 4], V4Err> {
    let start = cur.pos();
    let mut octets = [0; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        if i > 0 && !cur.eat(".") {
            cur.rewind(start);
            return Err(V4Err::Shape);
        }
        match scan_v4_octet(cur) {
            Ok(x) => *octet = x,
            Err(e) => {
                cur.rewind(start);
                return Err(e);
            }
        }
    }
    Ok(octets)
}

/// `dec-octet`: 0-255 with no leading zero on multi-digit octets.
fn scan_v4_octet(cur: &mut Cursor<'_>) -> Result<u8, V4Err> {
    let start = cur.pos();
    let first = match cur.peek(0) {
        Some(x) if x.is_ascii_digit() => x,
        _ => return Err(V4Err::Shape),
    };
    cur.skip(1);
    if first == b'0' {
        return Ok(0);
    }

    let mut res = u32::from(first - b'0');
    for _ in 1..3 {
        match cur.peek(0) {
            Some(x) if x.is_ascii_digit() => {
                res = res * 10 + u32::from(x - b'0');
                cur.skip(1);
            }
            _ => break,
        }
    }

    if res > 255 {
        Err(V4Err::Overflow(start))
    } else {
        Ok(res as u8)
    }
}

/// `IPv6address`: eight 16-bit groups, with at most one `::` elision
/// and an optional dotted IPv4 tail taking the last two groups.
///
/// Groups read before the elision fill the result from the left.
/// Groups read after it cannot be placed until the address ends, so
/// they are held in a second buffer and copied against the right
/// edge once their number is known.
fn scan_v6(cur: &mut Cursor<'_>) -> Result<[u16; 8], V6Err> {
    let mut head = [0u16; 8];
    let mut tail = [0u16; 8];
    let mut head_n = 0;
    let mut tail_n = 0;
    let mut elided = cur.eat("::");
    let mut sep_needed = false;

    loop {
        let slot = head_n + tail_n;
        if slot == 8 {
            break;
        }

        // Every group except the first, and except the one directly
        // following an elision, is introduced by a single colon; a
        // second colon is the elision itself.
        let mut group_required = false;
        if sep_needed {
            if !cur.eat(":") {
                break;
            }
            if cur.eat(":") {
                if elided {
                    return Err(V6Err::Structure);
                }
                elided = true;
                sep_needed = false;
                continue;
            }
            group_required = true;
        }

        match scan_h16(cur) {
            Some(Group::Hex(g)) => {
                let (buf, n) = if elided {
                    (&mut tail, &mut tail_n)
                } else {
                    (&mut head, &mut head_n)
                };
                buf[*n] = g;
                *n += 1;
                sep_needed = true;
            }
            Some(Group::V4Tail) => {
                if slot > 6 {
                    return Err(V6Err::Structure);
                }
                let o = scan_v4(cur).map_err(|e| match e {
                    V4Err::Overflow(index) => V6Err::V4Overflow(index),
                    V4Err::Shape => V6Err::Structure,
                })?;
                let (buf, n) = if elided {
                    (&mut tail, &mut tail_n)
                } else {
                    (&mut head, &mut head_n)
                };
                buf[*n] = u16::from(o[0]) << 8 | u16::from(o[1]);
                buf[*n + 1] = u16::from(o[2]) << 8 | u16::from(o[3]);
                *n += 2;
                // The tail ends the address.
                break;
            }
            None => {
                // A lone colon cannot end the address; a trailing
                // elision or a terminator byte can.
                if group_required {
                    return Err(V6Err::Structure);
                }
                break;
            }
        }
    }

    let total = head_n + tail_n;
    if !elided {
        if total != 8 {
            return Err(V6Err::Structure);
        }
        return Ok(head);
    }
    if total == 8 {
        // The elision must stand for at least one zero group.
        return Err(V6Err::Structure);
    }
    for k in 0..tail_n {
        head[8 - tail_n + k] = tail[k];
    }
    Ok(head)
}

/// Reads one `h16` group of an IPv6 address.
///
/// Digits are only peeked until the byte after them is known: a `.`
/// there means the digits begin the dotted IPv4 tail, which the
/// caller re-reads as decimal from an untouched cursor.
fn scan_h16(cur: &mut Cursor<'_>) -> Option<Group> {
    let mut value: u16 = 0;
    let mut digits = 0;
    while digits < 4 {
        match cur.peek(digits).and_then(encoding::decode_hexdig) {
            Some(v) => {
                value = value << 4 | u16::from(v);
                digits += 1;
            }
            None => break,
        }
    }

    if digits == 0 {
        return None;
    }
    if cur.peek(digits) == Some(b'.') {
        return Some(Group::V4Tail);
    }
    cur.skip(digits);
    Some(Group::Hex(value))
}
