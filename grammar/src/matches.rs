//! Values produced by matching a pattern against input.
//!
//! A [`Match`] records the pattern it belongs to, the matched child values
//! and, optionally, where in the source it was found. Equality ignores the
//! location; [`Match::key`] gives a view whose equality and hash include it.

use crate::error::MatchError;
use crate::pattern::{Pattern, PatternKind, PatternNode};
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchValue {
    /// Text matched by a literal or a character class.
    Text(String),
    /// The value of the alternative that matched.
    Alternative(Box<Match>),
    /// One value per element of a concatenation, or per repetition.
    Sequence(Vec<Match>),
}

#[derive(Clone, Debug)]
pub struct Match {
    pattern: Pattern,
    value: MatchValue,
    location: Option<Range<usize>>,
}

impl Match {
    fn new(pattern: &Pattern, value: MatchValue) -> Self {
        Self {
            pattern: pattern.clone(),
            value,
            location: None,
        }
    }

    /// Text matched by a literal, or a single character of a class.
    pub fn text(pattern: &Pattern, text: impl Into<String>) -> Result<Self, MatchError> {
        let text = text.into();
        let target = underlying(pattern)?;
        match target.node() {
            PatternNode::Literal(expected) if *expected == text => {}
            PatternNode::Class(class) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if class.includes(ch) => {}
                    _ => return Err(MatchError::Mismatch(text)),
                }
            }
            PatternNode::Literal(_) => return Err(MatchError::Mismatch(text)),
            _ => {
                return Err(MatchError::Kind {
                    expected: PatternKind::Literal,
                    actual: target.kind(),
                })
            }
        }
        Ok(Self::new(pattern, MatchValue::Text(text)))
    }

    pub fn alternation(pattern: &Pattern, value: Match) -> Result<Self, MatchError> {
        let target = underlying(pattern)?;
        let PatternNode::Alternation(elements) = target.node() else {
            return Err(MatchError::Kind {
                expected: PatternKind::Alternation,
                actual: target.kind(),
            });
        };
        let chosen = underlying(&value.pattern).ok();
        let belongs = elements.iter().any(|element| {
            *element == value.pattern || underlying(element).ok() == chosen
        });
        if !belongs {
            return Err(MatchError::NotAnAlternative);
        }
        Ok(Self::new(pattern, MatchValue::Alternative(Box::new(value))))
    }

    /// A concatenation match takes exactly one value per element.
    pub fn concatenation(pattern: &Pattern, values: Vec<Match>) -> Result<Self, MatchError> {
        let target = underlying(pattern)?;
        let PatternNode::Concatenation(elements) = target.node() else {
            return Err(MatchError::Kind {
                expected: PatternKind::Concatenation,
                actual: target.kind(),
            });
        };
        if elements.len() != values.len() {
            return Err(MatchError::Arity {
                expected: elements.len(),
                actual: values.len(),
            });
        }
        Ok(Self::new(pattern, MatchValue::Sequence(values)))
    }

    pub fn repetition(pattern: &Pattern, values: Vec<Match>) -> Result<Self, MatchError> {
        let target = underlying(pattern)?;
        let PatternNode::Repetition { min, max, .. } = *target.node() else {
            return Err(MatchError::Kind {
                expected: PatternKind::Repetition,
                actual: target.kind(),
            });
        };
        let count = values.len();
        let too_few = count < min as usize;
        let too_many = max.is_some_and(|max| count > max as usize);
        if too_few || too_many {
            return Err(MatchError::Bounds {
                min,
                max,
                actual: count,
            });
        }
        Ok(Self::new(pattern, MatchValue::Sequence(values)))
    }

    /// Tag this match with the span of source it was found at.
    pub fn with_location(mut self, location: Range<usize>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn location(&self) -> Option<Range<usize>> {
        self.location.clone()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn value(&self) -> &MatchValue {
        &self.value
    }

    /// Child values: empty for text, the chosen value for an alternation.
    pub fn values(&self) -> &[Match] {
        match &self.value {
            MatchValue::Text(_) => &[],
            MatchValue::Alternative(chosen) => core::slice::from_ref(chosen.as_ref()),
            MatchValue::Sequence(values) => values,
        }
    }

    /// Matched length in characters.
    pub fn length(&self) -> usize {
        match &self.value {
            MatchValue::Text(text) => text.chars().count(),
            _ => self.values().iter().map(Match::length).sum(),
        }
    }

    /// A view of this match whose equality and hash take locations into
    /// account.
    pub fn key(&self) -> MatchKey<'_> {
        MatchKey(self)
    }

    fn strict_eq(&self, other: &Match) -> bool {
        if self.location != other.location || self.pattern != other.pattern {
            return false;
        }
        match (&self.value, &other.value) {
            (MatchValue::Text(a), MatchValue::Text(b)) => a == b,
            (MatchValue::Alternative(a), MatchValue::Alternative(b)) => a.strict_eq(b),
            (MatchValue::Sequence(a), MatchValue::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.strict_eq(b))
            }
            _ => false,
        }
    }

    fn strict_hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.location.hash(state);
        match &self.value {
            MatchValue::Text(text) => {
                0u8.hash(state);
                text.hash(state);
            }
            MatchValue::Alternative(chosen) => {
                1u8.hash(state);
                chosen.strict_hash(state);
            }
            MatchValue::Sequence(values) => {
                2u8.hash(state);
                values.len().hash(state);
                for value in values {
                    value.strict_hash(state);
                }
            }
        }
    }
}

/// Follow latches and bound recursions to the pattern that does the matching.
fn underlying(pattern: &Pattern) -> Result<Pattern, MatchError> {
    let mut current = pattern.clone();
    let mut seen = Vec::new();
    while matches!(current.kind(), PatternKind::Latch | PatternKind::Recursion) {
        let id = current.identity();
        if seen.contains(&id) {
            return Err(MatchError::NotMatchable);
        }
        seen.push(id);
        current = current.target().ok_or(MatchError::NotMatchable)?;
    }
    Ok(current)
}

impl PartialEq for Match {
    fn eq(&self, other: &Match) -> bool {
        self.pattern == other.pattern && self.value == other.value
    }
}

impl Eq for Match {}

impl Hash for Match {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.value.hash(state);
    }
}

impl PartialEq<str> for Match {
    fn eq(&self, other: &str) -> bool {
        let mut rest = other;
        self.strip_from(&mut rest) && rest.is_empty()
    }
}

impl PartialEq<&str> for Match {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Match {
    fn strip_from(&self, rest: &mut &str) -> bool {
        match &self.value {
            MatchValue::Text(text) => {
                let current: &str = *rest;
                match current.strip_prefix(text.as_str()) {
                    Some(remaining) => {
                        *rest = remaining;
                        true
                    }
                    None => false,
                }
            }
            _ => self.values().iter().all(|value| value.strip_from(rest)),
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            MatchValue::Text(text) => f.write_str(text),
            _ => self
                .values()
                .iter()
                .try_for_each(|value| fmt::Display::fmt(value, f)),
        }
    }
}

/// Location-aware identity of a [`Match`], for use as a map or set key.
#[derive(Copy, Clone, Debug)]
pub struct MatchKey<'a>(&'a Match);

impl PartialEq for MatchKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.strict_eq(other.0)
    }
}

impl Eq for MatchKey<'_> {}

impl Hash for MatchKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.strict_hash(state);
    }
}
