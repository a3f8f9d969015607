use crate::scheme::SchemeId;
use std::ops::Range;

/// The parts a URL is partitioned into, in buffer order.
///
/// Each part's length counts its literal delimiters: the scheme keeps
/// its trailing `:`, the user part keeps the leading `//` marker of
/// the authority (so a nonzero user length means an authority is
/// present), the pass part keeps its leading `:` and trailing `@`,
/// the port its leading `:`, the query its leading `?` and the
/// fragment its leading `#`. The concatenation of all parts tiles the
/// buffer exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Part {
    Scheme = 0,
    User = 1,
    Pass = 2,
    Host = 3,
    Port = 4,
    Path = 5,
    Query = 6,
    Fragment = 7,
    End = 8,
}

pub(crate) const PART_COUNT: usize = 9;

/// The classification of the host production.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// No authority is present.
    None,
    /// A registered name, possibly empty.
    Name,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address.
    Ipv6,
    /// An IP address of future version.
    IpvFuture,
}

/// The index table of a parsed URL.
///
/// Holds per-part encoded and decoded lengths plus the side channels
/// recognised at parse time. Offsets are cumulative sums of the
/// lengths of prior parts, so every component is a constant-time
/// slice of the buffer.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UrlIndex {
    pub len: [usize; PART_COUNT],
    /// Decoded byte counts of each part's content, delimiters excluded.
    pub decoded: [usize; PART_COUNT],
    pub host_kind: HostKind,
    /// Raw octets of the parsed IP address. An IPv4 address occupies
    /// the first 4 bytes, an IPv6 address all 16; unused otherwise.
    pub ip_bytes: [u8; 16],
    /// Zero when the port is absent, empty, or exceeds 65535.
    pub port_number: u16,
    pub scheme_id: SchemeId,
    pub segment_count: usize,
    pub param_count: usize,
    /// Distinguishes an authority-only view, whose buffer carries no
    /// `//` marker and no parts outside the authority.
    pub authority_scope: bool,
}

impl UrlIndex {
    pub(crate) const EMPTY: UrlIndex = UrlIndex {
        len: [0; PART_COUNT],
        decoded: [0; PART_COUNT],
        host_kind: HostKind::None,
        ip_bytes: [0; 16],
        port_number: 0,
        scheme_id: SchemeId::None,
        segment_count: 0,
        param_count: 0,
        authority_scope: false,
    };

    /// Returns the offset of a part: the sum of all prior parts' lengths.
    pub(crate) fn offset(&self, part: Part) -> usize {
        self.len[..part as usize].iter().sum()
    }

    pub(crate) fn len_of(&self, part: Part) -> usize {
        self.len[part as usize]
    }

    /// Returns the buffer range covered by a part, delimiters included.
    pub(crate) fn range(&self, part: Part) -> Range<usize> {
        let start = self.offset(part);
        start..start + self.len_of(part)
    }
}

impl Default for UrlIndex {
    fn default() -> Self {
        Self::EMPTY
    }
}
