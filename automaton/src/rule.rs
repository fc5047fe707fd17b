// rule.rs - Birth/survival rules and the transition predicate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleParseError;

/// Largest neighbor count in a Moore neighborhood.
pub const MAX_NEIGHBORS: u8 = 8;

/// A set of neighbor counts in `0..=8`, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NeighborSet(u16);

impl NeighborSet {
    pub const EMPTY: NeighborSet = NeighborSet(0);

    pub fn insert(&mut self, count: u8) {
        if count <= MAX_NEIGHBORS {
            self.0 |= 1 << count;
        }
    }

    pub fn contains(self, count: u8) -> bool {
        count <= MAX_NEIGHBORS && self.0 & (1 << count) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Counts in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..=MAX_NEIGHBORS).filter(move |&n| self.contains(n))
    }
}

impl fmt::Display for NeighborSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in self.iter() {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

/// A totalistic birth/survival rule such as `B3/S23`.
///
/// Rules are plain data; every rule is evaluated by the same
/// [`RuleSpec::next_state`] predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleSpec {
    births: NeighborSet,
    survivals: NeighborSet,
}

impl RuleSpec {
    /// Parses a rule string of the form `B<digits>/S<digits>`.
    ///
    /// Digits may repeat and appear in any order; either list may be empty.
    pub fn parse(text: &str) -> Result<Self, RuleParseError> {
        let text = text.trim();
        let found = text.matches('/').count();
        let Some((birth, survival)) = text.split_once('/').filter(|_| found == 1) else {
            return Err(RuleParseError::Separator { found });
        };

        Ok(Self {
            births: parse_section(birth, 'B')?,
            survivals: parse_section(survival, 'S')?,
        })
    }

    pub fn births(&self) -> NeighborSet {
        self.births
    }

    pub fn survivals(&self) -> NeighborSet {
        self.survivals
    }

    /// Next state of one cell given its state and live neighbor count.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.survivals.contains(neighbors)
        } else {
            self.births.contains(neighbors)
        }
    }
}

fn parse_section(section: &str, prefix: char) -> Result<NeighborSet, RuleParseError> {
    let mut chars = section.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&prefix) => {}
        _ => return Err(RuleParseError::MissingPrefix { expected: prefix }),
    }

    let mut set = NeighborSet::EMPTY;
    for ch in chars {
        let count = ch.to_digit(10).ok_or(RuleParseError::NotADigit { ch })?;
        if count > u32::from(MAX_NEIGHBORS) {
            return Err(RuleParseError::CountOutOfRange { count });
        }
        set.insert(count as u8);
    }
    Ok(set)
}

impl FromStr for RuleSpec {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RuleSpec {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RuleSpec> for String {
    fn from(rule: RuleSpec) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}/S{}", self.births, self.survivals)
    }
}
