// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Recursive-descent reader for the text grammar.

use crate::base::{BaseType, Interpolation};
use crate::boxes::{STBox, TBox};
use crate::error::{Error, ParseError, Result};
use crate::geom::SRID_DEFAULT;
use crate::period::Period;
use crate::period_set::PeriodSet;
use crate::range::Range;
use crate::temporal::{
    TInstant, TInstantSet, TSequence, TSequenceSet, TemporalDuration, TemporalValue,
};
use crate::time::{parse_time_at, TimePoint};
use crate::timestamp_set::TimestampSet;

/// Characters that end a time literal.
const TIME_DELIMITERS: &str = ",)]}\n";

/// Cursor over a text input.
///
/// Each `next_*` method skips leading whitespace, reads one value and leaves
/// the cursor right after it. Errors carry the byte offset where reading
/// failed.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // ── cursor ──────────────────────────────────────────────────────────

    /// Byte offset of the cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether any input is left, whitespace included.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.pos < self.input.len()
    }

    /// The unread part of the input.
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Move the cursor `n` bytes forward, clamped to the end of the input.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    pub fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        let trimmed = rest.trim_start_matches([' ', '\t', '\n', '\r']);
        self.pos += rest.len() - trimmed.len();
    }

    /// The `n`-th character after the cursor.
    pub fn peek(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consume `c`, which must be the next character.
    pub fn consume_char(&mut self, c: char) -> Result<()> {
        match self.peek(0) {
            Some(found) if found == c => {
                self.advance(c.len_utf8());
                Ok(())
            }
            found => Err(ParseError::expected(format!("'{c}'"), found, self.pos).into()),
        }
    }

    /// Consume the next character if it is one of `chars`, and return it.
    pub fn consume_one_of(&mut self, chars: &str) -> Result<char> {
        match self.peek(0) {
            Some(found) if chars.contains(found) => {
                self.advance(found.len_utf8());
                Ok(found)
            }
            found => Err(ParseError::expected(one_of(chars), found, self.pos).into()),
        }
    }

    /// Consume `keyword` if the input continues with it, ignoring ASCII case.
    pub fn consume_keyword(&mut self, keyword: &str) -> bool {
        let matches = self
            .remaining()
            .get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword));
        if matches {
            self.advance(keyword.len());
        }
        matches
    }

    /// Consume everything up to, not including, the first of `delimiters`
    /// (or the end of the input) and return it.
    pub fn read_until_one_of(&mut self, delimiters: &str) -> &'a str {
        let rest = self.remaining();
        let len = rest.find(|c| delimiters.contains(c)).unwrap_or(rest.len());
        self.advance(len);
        &rest[..len]
    }

    /// Fail unless only whitespace is left.
    pub fn expect_end(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.has_next() {
            return Err(ParseError::expected("end of input", self.peek(0), self.pos).into());
        }
        Ok(())
    }

    /// Shift a parse error produced on a sub-slice so that its position is
    /// relative to the whole input. Other errors pass through.
    pub(crate) fn relocate(error: Error, offset: usize) -> Error {
        match error {
            Error::Parse(e) => ParseError::new(e.message(), offset + e.position()).into(),
            other => other,
        }
    }

    // ── prefixes ────────────────────────────────────────────────────────

    /// Read an optional `SRID=n;` prefix.
    pub fn next_srid_prefix(&mut self) -> Result<Option<i32>> {
        self.skip_whitespace();
        if !self.consume_keyword("SRID=") {
            return Ok(None);
        }
        let start = self.pos;
        let text = self.read_until_one_of(";");
        let srid = text
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseError::new(format!("Could not parse SRID '{text}'"), start))?;
        self.consume_char(';')?;
        Ok(Some(srid))
    }

    /// Read an optional `Interp=Stepwise;` or `Interp=Linear;` prefix.
    pub fn next_interp_prefix(&mut self) -> Result<Option<Interpolation>> {
        self.skip_whitespace();
        if !self.consume_keyword("Interp=") {
            return Ok(None);
        }
        let start = self.pos;
        let interpolation = self
            .read_until_one_of(";")
            .parse::<Interpolation>()
            .map_err(|e| Self::relocate(e, start))?;
        self.consume_char(';')?;
        Ok(Some(interpolation))
    }

    /// Read the SRID and interpolation prefixes of a sequence, in any order.
    fn next_sequence_prefixes(&mut self) -> Result<(Option<i32>, Option<Interpolation>)> {
        let mut srid = self.next_srid_prefix()?;
        let interpolation = self.next_interp_prefix()?;
        if srid.is_none() {
            srid = self.next_srid_prefix()?;
        }
        Ok((srid, interpolation))
    }

    /// Validate an SRID prefix found at `position` against the base type.
    fn check_srid<T: BaseType>(srid: Option<i32>, position: usize) -> Result<i32> {
        match srid {
            Some(_) if !T::SPATIAL => {
                Err(ParseError::new("SRID prefix is only allowed on point values", position).into())
            }
            Some(srid) => Ok(srid),
            None => Ok(SRID_DEFAULT),
        }
    }

    /// Read `item`s separated by commas up to one of `closers`. The opening
    /// bracket must already be consumed. Returns the items and the closer.
    fn next_members<R>(
        &mut self,
        closers: &str,
        mut item: impl FnMut(&mut Self) -> Result<R>,
    ) -> Result<(Vec<R>, char)> {
        let mut members = vec![item(self)?];
        loop {
            self.skip_whitespace();
            match self.peek(0) {
                Some(',') => {
                    self.advance(1);
                    members.push(item(self)?);
                }
                Some(c) if closers.contains(c) => {
                    self.advance(c.len_utf8());
                    return Ok((members, c));
                }
                found => {
                    let expected = format!("',' or {}", one_of(closers));
                    return Err(ParseError::expected(expected, found, self.pos).into());
                }
            }
        }
    }

    // ── primitives ──────────────────────────────────────────────────────

    /// Read an ISO-8601 literal up to the next delimiter.
    pub fn next_time(&mut self) -> Result<TimePoint> {
        self.skip_whitespace();
        let start = self.pos;
        let text = self.read_until_one_of(TIME_DELIMITERS);
        parse_time_at(text, start)
    }

    /// Read one base value.
    pub fn next_value<T: BaseType>(&mut self) -> Result<T> {
        T::read(self)
    }

    pub fn next_period(&mut self) -> Result<Period> {
        self.skip_whitespace();
        let opening = self.consume_one_of("[(")?;
        let lower = self.next_time()?;
        self.skip_whitespace();
        self.consume_char(',')?;
        let upper = self.next_time()?;
        self.skip_whitespace();
        let closing = self.consume_one_of("])")?;
        Period::new(lower, upper, opening == '[', closing == ']')
    }

    pub fn next_period_set(&mut self) -> Result<PeriodSet> {
        self.skip_whitespace();
        self.consume_char('{')?;
        let (periods, _) = self.next_members("}", Self::next_period)?;
        PeriodSet::new(periods)
    }

    pub fn next_timestamp_set(&mut self) -> Result<TimestampSet> {
        self.skip_whitespace();
        self.consume_char('{')?;
        let (timestamps, _) = self.next_members("}", Self::next_time)?;
        TimestampSet::new(timestamps)
    }

    /// Read `[lower, upper)` over a base type. Bounds must be ordered.
    pub fn next_range<T: BaseType>(&mut self) -> Result<Range<T>> {
        self.skip_whitespace();
        let opening = self.consume_one_of("[(")?;
        let lower = T::read(self)?;
        self.skip_whitespace();
        self.consume_char(',')?;
        let upper = T::read(self)?;
        self.skip_whitespace();
        let closing = self.consume_one_of("])")?;
        Range::try_new(lower, upper, opening == '[', closing == ']')
    }

    // ── temporal values ─────────────────────────────────────────────────

    /// Read `[SRID=n;]value@time`.
    pub fn next_tinstant<T: BaseType>(&mut self) -> Result<TInstant<T>> {
        self.skip_whitespace();
        let start = self.pos;
        let srid = Self::check_srid::<T>(self.next_srid_prefix()?, start)?;
        let value = T::read(self)?;
        self.consume_char('@')?;
        let timestamp = self.next_time()?;
        TInstant::with_srid(value, timestamp, srid)
    }

    /// Read `[SRID=n;]{instant, ...}`.
    pub fn next_tinstant_set<T: BaseType>(&mut self) -> Result<TInstantSet<T>> {
        self.skip_whitespace();
        let start = self.pos;
        let srid = Self::check_srid::<T>(self.next_srid_prefix()?, start)?;
        self.skip_whitespace();
        self.consume_char('{')?;
        let (instants, _) = self.next_members("}", Self::next_tinstant::<T>)?;
        TInstantSet::with_srid(instants, srid)
    }

    /// Read `[SRID=n;][Interp=X;][instant, ...)`.
    ///
    /// A single-instant sequence with an exclusive bound is accepted here even
    /// though [`TSequence::new`] rejects it.
    pub fn next_tsequence<T: BaseType>(&mut self) -> Result<TSequence<T>> {
        self.skip_whitespace();
        let start = self.pos;
        let (srid, interpolation) = self.next_sequence_prefixes()?;
        let srid = Self::check_srid::<T>(srid, start)?;
        let interpolation = interpolation.unwrap_or_else(T::default_interpolation);
        self.next_sequence_body(interpolation, srid)
    }

    /// Bracketed instants of a sequence, without prefixes.
    fn next_sequence_body<T: BaseType>(
        &mut self,
        interpolation: Interpolation,
        srid: i32,
    ) -> Result<TSequence<T>> {
        self.skip_whitespace();
        let opening = self.consume_one_of("[(")?;
        let (instants, closing) = self.next_members("])", Self::next_tinstant::<T>)?;
        TSequence::build(instants, opening == '[', closing == ']', interpolation, srid, false)
    }

    /// Read `[SRID=n;][Interp=X;]{sequence, ...}`.
    ///
    /// The set interpolation is the set prefix when present, otherwise the
    /// first member prefix, otherwise the default of `T`. A member prefix
    /// that disagrees with it is an error.
    pub fn next_tsequence_set<T: BaseType>(&mut self) -> Result<TSequenceSet<T>> {
        self.skip_whitespace();
        let start = self.pos;
        let (srid, set_interpolation) = self.next_sequence_prefixes()?;
        let srid = Self::check_srid::<T>(srid, start)?;
        self.skip_whitespace();
        self.consume_char('{')?;

        let fallback = set_interpolation.unwrap_or_else(T::default_interpolation);
        let (members, _) = self.next_members("}", |de| {
            de.skip_whitespace();
            let member_start = de.pos;
            let (member_srid, explicit) = de.next_sequence_prefixes()?;
            let member_srid = Self::check_srid::<T>(member_srid, member_start)?;
            let sequence = de.next_sequence_body::<T>(explicit.unwrap_or(fallback), member_srid)?;
            Ok((sequence, explicit))
        })?;

        let interpolation = match set_interpolation {
            Some(interpolation) => interpolation,
            None => match members.iter().find_map(|(_, explicit)| *explicit) {
                Some(interpolation) => {
                    tracing::debug!(
                        %interpolation,
                        "adopting member interpolation for sequence set"
                    );
                    interpolation
                }
                None => T::default_interpolation(),
            },
        };
        if members
            .iter()
            .any(|(_, explicit)| explicit.is_some_and(|e| e != interpolation))
        {
            return Err(Error::MixedInterpolation);
        }
        TSequenceSet::build(members.into_iter().map(|(s, _)| s), Some(interpolation), srid)
    }

    /// Read a temporal value of any shape, chosen by looking past the
    /// prefixes at the first brackets.
    pub fn next_temporal<T: BaseType>(&mut self) -> Result<TemporalValue<T>> {
        self.skip_whitespace();
        let mut probe = self.clone();
        probe.next_sequence_prefixes()?;
        probe.skip_whitespace();
        let first = probe.peek(0);
        probe.advance(first.map_or(0, char::len_utf8));
        probe.skip_whitespace();
        let second = probe.peek(0);

        let duration = match (first, second) {
            (Some('[' | '('), _) => TemporalDuration::Sequence,
            (Some('{'), Some('[' | '(')) => TemporalDuration::SequenceSet,
            (Some('{'), _) => TemporalDuration::InstantSet,
            _ => TemporalDuration::Instant,
        };
        tracing::trace!(%duration, position = self.pos, "reading temporal value");

        Ok(match duration {
            TemporalDuration::Instant => self.next_tinstant::<T>()?.into(),
            TemporalDuration::InstantSet => self.next_tinstant_set::<T>()?.into(),
            TemporalDuration::Sequence => self.next_tsequence::<T>()?.into(),
            TemporalDuration::SequenceSet => self.next_tsequence_set::<T>()?.into(),
        })
    }

    // ── boxes ───────────────────────────────────────────────────────────

    /// Read `TBOX((x, t), (x, t))` or one of its partial forms.
    pub fn next_tbox(&mut self) -> Result<TBox> {
        self.skip_whitespace();
        let start = self.pos;
        if !self.consume_keyword("TBOX") {
            return Err(ParseError::expected("'TBOX'", self.peek(0), start).into());
        }
        self.skip_whitespace();
        self.consume_char('(')?;
        self.skip_whitespace();
        if self.peek(0) == Some(')') {
            self.advance(1);
            return Ok(TBox::empty());
        }

        let lower = self.next_corner()?;
        self.skip_whitespace();
        self.consume_char(',')?;
        let upper = self.next_corner()?;
        self.skip_whitespace();
        self.consume_char(')')?;

        let [x_lower, t_lower] = lower.fields::<2>(start)?;
        let [x_upper, t_upper] = upper.fields::<2>(start)?;
        let x = paired(
            x_lower.map(|f| f.float()).transpose()?,
            x_upper.map(|f| f.float()).transpose()?,
            start,
        )?;
        let t = paired(
            t_lower.map(|f| f.time()).transpose()?,
            t_upper.map(|f| f.time()).transpose()?,
            start,
        )?;
        if x.is_none() && t.is_none() {
            return Err(ParseError::new("A TBOX needs a value or a time extent", start).into());
        }
        TBox::from_extents(x, t)
    }

    /// Read `[SRID=n;]STBOX ZT((x, y, z, t), (x, y, z, t))`, a `GEODSTBOX`,
    /// or one of their partial forms.
    pub fn next_stbox(&mut self) -> Result<STBox> {
        self.skip_whitespace();
        let start = self.pos;
        let srid = self.next_srid_prefix()?.unwrap_or(SRID_DEFAULT);
        self.skip_whitespace();
        let geodetic = if self.consume_keyword("GEODSTBOX") {
            true
        } else if self.consume_keyword("STBOX") {
            false
        } else {
            let found = self.peek(0);
            return Err(ParseError::expected("'STBOX' or 'GEODSTBOX'", found, self.pos).into());
        };
        self.skip_whitespace();
        let (has_z, has_t) = if self.consume_keyword("ZT") {
            (true, true)
        } else if self.consume_keyword("Z") {
            (true, false)
        } else if self.consume_keyword("T") {
            (false, true)
        } else {
            (false, false)
        };
        self.skip_whitespace();
        self.consume_char('(')?;
        self.skip_whitespace();
        if self.peek(0) == Some(')') {
            self.advance(1);
            return STBox::from_extents(None, None, None, geodetic, srid);
        }

        let lower = self.next_corner()?;
        self.skip_whitespace();
        self.consume_char(',')?;
        let upper = self.next_corner()?;
        self.skip_whitespace();
        self.consume_char(')')?;

        let time_only = has_t && lower.is_time_only();
        if time_only {
            let [_, _, t_lower] = lower.fields::<3>(start)?;
            let [_, _, t_upper] = upper.fields::<3>(start)?;
            let t = paired(
                t_lower.map(|f| f.time()).transpose()?,
                t_upper.map(|f| f.time()).transpose()?,
                start,
            )?;
            return STBox::from_extents(None, None, t, geodetic, srid);
        }

        let has_z = has_z || geodetic;
        let lower = lower.spatial(has_z, has_t, start)?;
        let upper = upper.spatial(has_z, has_t, start)?;
        let xy = Some(((lower.x, upper.x), (lower.y, upper.y)));
        let z = paired(lower.z, upper.z, start)?;
        let t = paired(lower.t, upper.t, start)?;
        STBox::from_extents(xy, z, t, geodetic, srid)
    }

    /// Read `(field, field, ...)` where every field may be blank.
    fn next_corner(&mut self) -> Result<Corner<'a>> {
        self.skip_whitespace();
        self.consume_char('(')?;
        let (fields, _) = self.next_members(")", |de| {
            de.skip_whitespace();
            let position = de.pos;
            let text = de.read_until_one_of(",)").trim_end();
            Ok(Field { text, position })
        })?;
        Ok(Corner { fields })
    }
}

fn one_of(chars: &str) -> String {
    let quoted: Vec<String> = chars.chars().map(|c| format!("'{c}'")).collect();
    quoted.join(" or ")
}

/// Combine the lower and upper values of one box axis.
fn paired<V>(lower: Option<V>, upper: Option<V>, position: usize) -> Result<Option<(V, V)>> {
    match (lower, upper) {
        (Some(l), Some(u)) => Ok(Some((l, u))),
        (None, None) => Ok(None),
        _ => {
            let msg = "A box axis must be set on both corners or neither";
            Err(ParseError::new(msg, position).into())
        }
    }
}

/// One raw field of a box corner.
#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    text: &'a str,
    position: usize,
}

impl Field<'_> {
    fn float(self) -> Result<f64> {
        self.text
            .parse::<f64>()
            .map_err(|_| {
                let msg = format!("Could not parse float '{}'", self.text);
                ParseError::new(msg, self.position).into()
            })
    }

    fn time(self) -> Result<TimePoint> {
        parse_time_at(self.text, self.position)
    }
}

/// Corner of a box, as read.
#[derive(Debug)]
struct Corner<'a> {
    fields: Vec<Field<'a>>,
}

/// Parsed spatial corner of an `STBOX`.
struct SpatialCorner {
    x: f64,
    y: f64,
    z: Option<f64>,
    t: Option<TimePoint>,
}

impl<'a> Corner<'a> {
    /// Exactly `N` fields, blanks turned into `None`.
    fn fields<const N: usize>(&self, position: usize) -> Result<[Option<Field<'a>>; N]> {
        if self.fields.len() != N {
            return Err(ParseError::new(
                format!("Expected {N} box coordinates, got {}", self.fields.len()),
                position,
            )
            .into());
        }
        let mut out = [None; N];
        for (slot, field) in out.iter_mut().zip(&self.fields) {
            if !field.text.is_empty() {
                *slot = Some(*field);
            }
        }
        Ok(out)
    }

    /// `( , , t)`: only the last field is set.
    fn is_time_only(&self) -> bool {
        self.fields.len() == 3 && self.fields[..2].iter().all(|f| f.text.is_empty())
    }

    fn spatial(&self, has_z: bool, has_t: bool, position: usize) -> Result<SpatialCorner> {
        let expected = 2 + usize::from(has_z) + usize::from(has_t);
        if self.fields.len() != expected {
            return Err(ParseError::new(
                format!("Expected {expected} box coordinates, got {}", self.fields.len()),
                position,
            )
            .into());
        }
        let x = self.fields[0].float()?;
        let y = self.fields[1].float()?;
        let z = if has_z { Some(self.fields[2].float()?) } else { None };
        let t = if has_t {
            Some(self.fields[expected - 1].time()?)
        } else {
            None
        };
        Ok(SpatialCorner { x, y, z, t })
    }
}
