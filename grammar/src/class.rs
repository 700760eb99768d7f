//! Character classes: ordered sets of characters and inclusive ranges.
//!
//! A [`CharacterClass`] keeps its members in the order they were given. Set
//! difference through [`CharacterClass::except`] truncates or splits ranges
//! so that the member list never holds an inverted range.

use crate::error::ClassError;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{BitOr, RangeInclusive};

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClassItem {
    Char(char),
    Range { start: char, end: char },
}

impl ClassItem {
    pub const fn range(start: char, end: char) -> Self {
        Self::Range { start, end }
    }

    pub const fn matches(&self, ch: char) -> bool {
        match *self {
            Self::Char(c) => c == ch,
            Self::Range { start, end } => start <= ch && ch <= end,
        }
    }

    const fn bounds(&self) -> (char, char) {
        match *self {
            Self::Char(c) => (c, c),
            Self::Range { start, end } => (start, end),
        }
    }

    fn validate(self) -> Result<Self, ClassError> {
        match self {
            Self::Range { start, end } if start > end => {
                Err(ClassError::InvertedRange { start, end })
            }
            item => Ok(item),
        }
    }
}

impl From<char> for ClassItem {
    fn from(ch: char) -> Self {
        Self::Char(ch)
    }
}

impl From<RangeInclusive<char>> for ClassItem {
    fn from(range: RangeInclusive<char>) -> Self {
        Self::Range {
            start: *range.start(),
            end: *range.end(),
        }
    }
}

impl fmt::Debug for ClassItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassItem::Char(ch) => write!(f, "{:?}", ch),
            ClassItem::Range { start, end } => write!(f, "[{:?}-{:?}]", start, end),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CharacterClass {
    items: Vec<ClassItem>,
}

impl CharacterClass {
    pub fn new<I, T>(items: I) -> Result<Self, ClassError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ClassItem>,
    {
        let items = items
            .into_iter()
            .map(|item| item.into().validate())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ClassItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn includes(&self, ch: char) -> bool {
        self.items.iter().any(|item| item.matches(ch))
    }

    /// Remove every character covered by `removed` from this class.
    ///
    /// Ranges overlapping a removed item are truncated, or split in two when
    /// the removed item falls strictly inside them. Single characters covered
    /// by a removed item are dropped.
    pub fn except<I, T>(&self, removed: I) -> Result<Self, ClassError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ClassItem>,
    {
        let mut items = self.items.clone();
        for cut in removed {
            let cut = cut.into().validate()?;
            items = items
                .into_iter()
                .flat_map(|item| subtract(item, cut))
                .collect();
        }
        Ok(Self { items })
    }

    pub fn union(&self, other: &CharacterClass) -> Self {
        let mut items = self.items.clone();
        items.extend_from_slice(&other.items);
        Self { items }
    }

    fn with_item(&self, item: ClassItem) -> Result<Self, ClassError> {
        let mut items = self.items.clone();
        items.push(item.validate()?);
        Ok(Self { items })
    }
}

/// Residue of `item` once every character in `cut` is removed.
fn subtract(item: ClassItem, cut: ClassItem) -> Vec<ClassItem> {
    let (lo, hi) = cut.bounds();
    match item {
        ClassItem::Char(ch) if lo <= ch && ch <= hi => Vec::new(),
        ClassItem::Char(_) => alloc::vec![item],
        ClassItem::Range { start, end } if hi < start || end < lo => alloc::vec![item],
        ClassItem::Range { start, end } => {
            let mut residue = Vec::with_capacity(2);
            if start < lo {
                if let Some(left_end) = prev_char(lo) {
                    residue.push(ClassItem::range(start, left_end));
                }
            }
            if hi < end {
                if let Some(right_start) = next_char(hi) {
                    residue.push(ClassItem::range(right_start, end));
                }
            }
            residue
        }
    }
}

fn prev_char(ch: char) -> Option<char> {
    match ch {
        '\u{E000}' => Some('\u{D7FF}'),
        _ => char::from_u32((ch as u32).checked_sub(1)?),
    }
}

fn next_char(ch: char) -> Option<char> {
    match ch {
        '\u{D7FF}' => Some('\u{E000}'),
        _ => char::from_u32(ch as u32 + 1),
    }
}

impl BitOr for CharacterClass {
    type Output = CharacterClass;

    fn bitor(self, rhs: CharacterClass) -> CharacterClass {
        self.union(&rhs)
    }
}

impl BitOr<char> for CharacterClass {
    type Output = CharacterClass;

    fn bitor(mut self, rhs: char) -> CharacterClass {
        self.items.push(ClassItem::Char(rhs));
        self
    }
}

impl BitOr<ClassItem> for CharacterClass {
    type Output = Result<CharacterClass, ClassError>;

    fn bitor(self, rhs: ClassItem) -> Self::Output {
        self.with_item(rhs)
    }
}

impl fmt::Debug for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("class[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", item)?;
        }
        f.write_str("]")
    }
}
