//! Grammar kernel: cursors, rules and combinators.
//!
//! A [`Rule`] recognises a prefix of the input at the cursor position.
//! On success it advances the cursor past the consumed bytes and yields
//! its output; on failure it leaves the cursor where it started and
//! reports the position of the first offending byte. Backtracking is
//! total within a single rule; [`alt2`] and friends retry from the
//! starting position of their own attempt only.

pub mod charset;

pub use charset::{ByteSet, CharSet, Pred};

use charset::HEXDIG;

/// The element of the input a failed rule could not match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MismatchKind {
    /// An unexpected byte or end of input.
    Char,
    /// A `%` not followed by two hexadecimal digits.
    PctOctet,
}

/// A rule mismatch, carrying the index of the first offending byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Index of the mismatch in the input.
    pub index: usize,
    /// What failed to match.
    pub kind: MismatchKind,
}

/// The result of applying a rule.
pub type RuleResult<T> = Result<T, Mismatch>;

fn mismatch(index: usize) -> Mismatch {
    Mismatch {
        index,
        kind: MismatchKind::Char,
    }
}

/// A cursor over the bytes of an input string.
///
/// The invariants hold that `pos <= len` and that `pos` always lies on
/// an ASCII boundary of the consumed grammar, so slicing the input at
/// rule boundaries is valid.
#[derive(Debug)]
pub struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of the input.
    #[must_use]
    pub fn new(s: &'a str) -> Cursor<'a> {
        Cursor { s, pos: 0 }
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to an earlier position.
    pub fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }

    /// Checks whether any input remains.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.pos < self.s.len()
    }

    /// Returns the byte at the given offset from the cursor, if any.
    #[must_use]
    pub fn peek(&self, i: usize) -> Option<u8> {
        self.s.as_bytes().get(self.pos + i).copied()
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.s.len());
    }

    /// Consumes the given literal if the remaining input starts with it.
    pub fn eat(&mut self, t: &str) -> bool {
        if self.s.as_bytes()[self.pos..].starts_with(t.as_bytes()) {
            self.skip(t.len());
            true
        } else {
            false
        }
    }

    /// Returns the input between an earlier position and the cursor.
    #[must_use]
    pub fn taken(&self, start: usize) -> &'a str {
        &self.s[start..self.pos]
    }

    /// Applies a rule at the cursor.
    ///
    /// # Errors
    ///
    /// Propagates the rule's mismatch; the cursor is unchanged then.
    pub fn apply<R: Rule<'a>>(&mut self, rule: R) -> RuleResult<R::Output> {
        rule.parse(self)
    }
}

/// A parse rule over a cursor.
pub trait Rule<'a> {
    /// The value produced on success.
    type Output;

    /// Attempts to recognise a prefix of the remaining input.
    ///
    /// # Errors
    ///
    /// Returns the position and kind of the first mismatch; the cursor
    /// is left at its starting position.
    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<Self::Output>;
}

/// Matches exactly the given byte.
pub fn lit(b: u8) -> Lit {
    Lit(b)
}

/// See [`lit`].
#[derive(Clone, Copy, Debug)]
pub struct Lit(u8);

impl<'a> Rule<'a> for Lit {
    type Output = ();

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<()> {
        if cur.peek(0) == Some(self.0) {
            cur.skip(1);
            Ok(())
        } else {
            Err(mismatch(cur.pos()))
        }
    }
}

/// Matches exactly one byte from the set.
pub fn one_of<S: ByteSet>(set: S) -> OneOf<S> {
    OneOf(set)
}

/// See [`one_of`].
#[derive(Clone, Copy, Debug)]
pub struct OneOf<S>(S);

impl<'a, S: ByteSet> Rule<'a> for OneOf<S> {
    type Output = u8;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<u8> {
        match cur.peek(0) {
            Some(x) if self.0.contains(x) => {
                cur.skip(1);
                Ok(x)
            }
            _ => Err(mismatch(cur.pos())),
        }
    }
}

/// Consumes the maximal prefix of bytes from the set.
///
/// Never fails; the consumed slice may be empty.
pub fn run<S: ByteSet>(set: S) -> Run<S> {
    Run(set)
}

/// See [`run`].
#[derive(Clone, Copy, Debug)]
pub struct Run<S>(S);

impl<'a, S: ByteSet> Rule<'a> for Run<S> {
    type Output = &'a str;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<&'a str> {
        let start = cur.pos();
        while let Some(x) = cur.peek(0) {
            if !self.0.contains(x) {
                break;
            }
            cur.skip(1);
        }
        Ok(cur.taken(start))
    }
}

/// Wraps a rule so that zero-length success becomes failure.
pub fn non_empty<R>(rule: R) -> NonEmpty<R> {
    NonEmpty(rule)
}

/// See [`non_empty`].
#[derive(Clone, Copy, Debug)]
pub struct NonEmpty<R>(R);

impl<'a, R: Rule<'a>> Rule<'a> for NonEmpty<R> {
    type Output = R::Output;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<R::Output> {
        let start = cur.pos();
        let out = self.0.parse(cur)?;
        if cur.pos() == start {
            Err(mismatch(start))
        } else {
            Ok(out)
        }
    }
}

/// Attempts a rule, reporting success with `None` on failure.
pub fn opt<R>(rule: R) -> Opt<R> {
    Opt(rule)
}

/// See [`opt`].
#[derive(Clone, Copy, Debug)]
pub struct Opt<R>(R);

impl<'a, R: Rule<'a>> Rule<'a> for Opt<R> {
    type Output = Option<R::Output>;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<Option<R::Output>> {
        let start = cur.pos();
        match self.0.parse(cur) {
            Ok(out) => Ok(Some(out)),
            Err(_) => {
                cur.rewind(start);
                Ok(None)
            }
        }
    }
}

/// Tries two rules in order, succeeding with the first match.
///
/// The cursor is restored before each attempt; on failure the
/// highest-progress mismatch is reported.
pub fn alt2<A, B>(a: A, b: B) -> Alt2<A, B> {
    Alt2(a, b)
}

/// See [`alt2`].
#[derive(Clone, Copy, Debug)]
pub struct Alt2<A, B>(A, B);

impl<'a, A, B> Rule<'a> for Alt2<A, B>
where
    A: Rule<'a>,
    B: Rule<'a, Output = A::Output>,
{
    type Output = A::Output;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<A::Output> {
        let start = cur.pos();
        let e0 = match self.0.parse(cur) {
            Ok(out) => return Ok(out),
            Err(e) => e,
        };
        cur.rewind(start);
        match self.1.parse(cur) {
            Ok(out) => Ok(out),
            Err(e1) => {
                cur.rewind(start);
                Err(if e1.index > e0.index { e1 } else { e0 })
            }
        }
    }
}

/// Tries three rules in order, succeeding with the first match.
pub fn alt3<A, B, C>(a: A, b: B, c: C) -> Alt2<A, Alt2<B, C>> {
    alt2(a, alt2(b, c))
}

/// Matches two rules in sequence.
///
/// The cursor is restored to the starting position if either fails.
pub fn seq2<A, B>(a: A, b: B) -> Seq2<A, B> {
    Seq2(a, b)
}

/// See [`seq2`].
#[derive(Clone, Copy, Debug)]
pub struct Seq2<A, B>(A, B);

impl<'a, A: Rule<'a>, B: Rule<'a>> Rule<'a> for Seq2<A, B> {
    type Output = (A::Output, B::Output);

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<(A::Output, B::Output)> {
        let start = cur.pos();
        let a = self.0.parse(cur)?;
        match self.1.parse(cur) {
            Ok(b) => Ok((a, b)),
            Err(e) => {
                cur.rewind(start);
                Err(e)
            }
        }
    }
}

/// Matches three rules in sequence.
pub fn seq3<A, B, C>(a: A, b: B, c: C) -> Seq2<A, Seq2<B, C>> {
    seq2(a, seq2(b, c))
}

/// Matches four rules in sequence.
pub fn seq4<A, B, C, D>(a: A, b: B, c: C, d: D) -> Seq2<A, Seq2<B, Seq2<C, D>>> {
    seq2(a, seq3(b, c, d))
}

/// Repeats `elem` separated by `sep`, between `min` and `max` times.
///
/// Reports the element count. A separator is consumed only when
/// another element follows it, and an iteration that consumes nothing
/// ends the repetition.
pub fn ranged<E, S>(elem: E, sep: S, min: usize, max: usize) -> Ranged<E, S> {
    Ranged {
        elem,
        sep,
        min,
        max,
    }
}

/// See [`ranged`].
#[derive(Clone, Copy, Debug)]
pub struct Ranged<E, S> {
    elem: E,
    sep: S,
    min: usize,
    max: usize,
}

impl<'a, E: Rule<'a>, S: Rule<'a>> Rule<'a> for Ranged<E, S> {
    type Output = usize;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<usize> {
        let start = cur.pos();
        let mut count = 0;

        match self.elem.parse(cur) {
            Ok(_) => count = 1,
            Err(e) => {
                cur.rewind(start);
                if e.kind == MismatchKind::PctOctet || self.min > 0 {
                    return Err(e);
                }
                return Ok(0);
            }
        }

        while count < self.max {
            let mark = cur.pos();
            match self
                .sep
                .parse(cur)
                .and_then(|_| self.elem.parse(cur).map(|_| ()))
            {
                Ok(()) => {}
                // A malformed percent octet is not a repetition boundary.
                Err(e) if e.kind == MismatchKind::PctOctet => {
                    cur.rewind(start);
                    return Err(e);
                }
                Err(_) => {
                    cur.rewind(mark);
                    break;
                }
            }
            if cur.pos() == mark {
                // Neither the separator nor the element consumed input.
                break;
            }
            count += 1;
        }

        if count < self.min {
            cur.rewind(start);
            return Err(mismatch(cur.pos()));
        }
        Ok(count)
    }
}

/// Parses a rule without consuming input.
pub fn ahead<R>(rule: R) -> Ahead<R> {
    Ahead(rule)
}

/// See [`ahead`].
#[derive(Clone, Copy, Debug)]
pub struct Ahead<R>(R);

impl<'a, R: Rule<'a>> Rule<'a> for Ahead<R> {
    type Output = R::Output;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<R::Output> {
        let start = cur.pos();
        let out = self.0.parse(cur)?;
        cur.rewind(start);
        Ok(out)
    }
}

/// A run of percent-encoded text with its decoded length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PctSpan<'a> {
    /// The consumed text in its encoded form.
    pub text: &'a str,
    /// The number of bytes the text produces after percent-decoding.
    pub decoded_len: usize,
}

/// Consumes the maximal run of bytes from the set and `%HH` triplets.
///
/// Reports the encoded text and its decoded length without
/// materialising the decoded bytes. Fails on a `%` that is not
/// followed by two hexadecimal digits.
pub fn pct_run<S: ByteSet>(set: S) -> PctRun<S> {
    PctRun(set)
}

/// See [`pct_run`].
#[derive(Clone, Copy, Debug)]
pub struct PctRun<S>(S);

impl<'a, S: ByteSet> Rule<'a> for PctRun<S> {
    type Output = PctSpan<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> RuleResult<PctSpan<'a>> {
        let start = cur.pos();
        let mut decoded_len = 0;

        while let Some(x) = cur.peek(0) {
            if x == b'%' {
                match (cur.peek(1), cur.peek(2)) {
                    (Some(hi), Some(lo)) if HEXDIG.allows(hi) && HEXDIG.allows(lo) => {
                        cur.skip(3);
                    }
                    _ => {
                        let index = cur.pos();
                        cur.rewind(start);
                        return Err(Mismatch {
                            index,
                            kind: MismatchKind::PctOctet,
                        });
                    }
                }
            } else if self.0.contains(x) {
                cur.skip(1);
            } else {
                break;
            }
            decoded_len += 1;
        }

        Ok(PctSpan {
            text: cur.taken(start),
            decoded_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{charset::*, *};

    fn at(index: usize) -> Mismatch {
        Mismatch {
            index,
            kind: MismatchKind::Char,
        }
    }

    #[test]
    fn lit_and_one_of() {
        let mut cur = Cursor::new("a1");
        assert_eq!(lit(b'a').parse(&mut cur), Ok(()));
        assert_eq!(one_of(DIGIT).parse(&mut cur), Ok(b'1'));
        assert_eq!(lit(b'x').parse(&mut cur), Err(at(2)));
        assert_eq!(cur.pos(), 2);
    }

    #[test]
    fn run_is_maximal_and_total() {
        let mut cur = Cursor::new("abc123");
        assert_eq!(run(ALPHA).parse(&mut cur), Ok("abc"));
        assert_eq!(run(ALPHA).parse(&mut cur), Ok(""));
        assert_eq!(run(DIGIT).parse(&mut cur), Ok("123"));
        assert!(!cur.has_remaining());
    }

    #[test]
    fn non_empty_rejects_zero_length() {
        let mut cur = Cursor::new("123");
        assert_eq!(non_empty(run(ALPHA)).parse(&mut cur), Err(at(0)));
        assert_eq!(cur.pos(), 0);
        assert_eq!(non_empty(run(DIGIT)).parse(&mut cur), Ok("123"));
    }

    #[test]
    fn opt_restores_on_failure() {
        let mut cur = Cursor::new("x");
        assert_eq!(opt(lit(b'y')).parse(&mut cur), Ok(None));
        assert_eq!(cur.pos(), 0);
        assert_eq!(opt(lit(b'x')).parse(&mut cur), Ok(Some(())));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn alt_backtracks_between_branches() {
        let r = alt2(seq2(lit(b'a'), lit(b'b')), seq2(lit(b'a'), lit(b'c')));
        let mut cur = Cursor::new("ac");
        assert!(r.parse(&mut cur).is_ok());
        assert_eq!(cur.pos(), 2);

        // The highest-progress failure wins.
        let mut cur = Cursor::new("ax");
        assert_eq!(r.parse(&mut cur), Err(at(1)));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn seq_restores_on_partial_match() {
        let mut cur = Cursor::new("a1x");
        let r = seq3(lit(b'a'), one_of(DIGIT), lit(b'y'));
        assert_eq!(r.parse(&mut cur), Err(at(2)));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn ranged_counts_elements() {
        let octet = non_empty(run(DIGIT));
        let mut cur = Cursor::new("1.22.333");
        assert_eq!(ranged(octet, lit(b'.'), 1, usize::MAX).parse(&mut cur), Ok(3));
        assert!(!cur.has_remaining());

        // A trailing separator is not consumed without an element.
        let mut cur = Cursor::new("1.2.");
        assert_eq!(ranged(octet, lit(b'.'), 1, usize::MAX).parse(&mut cur), Ok(2));
        assert_eq!(cur.pos(), 3);

        // Bounded repetition.
        let mut cur = Cursor::new("1.2.3.4");
        assert_eq!(ranged(octet, lit(b'.'), 1, 2).parse(&mut cur), Ok(2));
        assert_eq!(cur.pos(), 3);

        // Minimum not reached.
        let mut cur = Cursor::new("1");
        assert!(ranged(octet, lit(b'.'), 2, 4).parse(&mut cur).is_err());
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn ranged_with_empty_elements() {
        let seg = pct_run(PCHAR);
        let mut cur = Cursor::new("a//b/");
        assert_eq!(ranged(seg, lit(b'/'), 1, usize::MAX).parse(&mut cur), Ok(4));
        assert!(!cur.has_remaining());
    }

    #[test]
    fn ahead_does_not_consume() {
        let mut cur = Cursor::new("ab");
        assert_eq!(ahead(lit(b'a')).parse(&mut cur), Ok(()));
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn pct_run_counts_decoded_length() {
        let mut cur = Cursor::new("a%20b%C2%A1!");
        let span = pct_run(UNRESERVED).parse(&mut cur).unwrap();
        assert_eq!(span.text, "a%20b%C2%A1");
        assert_eq!(span.decoded_len, 5);
        assert_eq!(cur.pos(), 11);
    }

    #[test]
    fn pct_run_rejects_bad_octets() {
        for (s, index) in [("ab%zz", 2), ("ab%a", 2), ("%", 0)] {
            let mut cur = Cursor::new(s);
            assert_eq!(
                pct_run(UNRESERVED).parse(&mut cur),
                Err(Mismatch {
                    index,
                    kind: MismatchKind::PctOctet
                })
            );
            assert_eq!(cur.pos(), 0);
        }
    }
}
