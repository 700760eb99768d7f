//! Grammar patterns.
//!
//! A pattern is an immutable node in a grammar graph, wrapped in a cheaply
//! clonable [`Pattern`] handle. Children are shared rather than copied, so
//! equality and hashing are structural. The only node whose content can
//! change after construction is a [`Recursion`] slot, and every traversal
//! here guards against the cycles such slots create.

use crate::class::CharacterClass;
use crate::error::ClassError;
use crate::recursion::Recursion;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, BitOr};

pub(crate) type Identity = *const ();

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Literal,
    Class,
    Alternation,
    Concatenation,
    Repetition,
    Latch,
    Recursion,
}

#[derive(Clone)]
pub enum PatternNode {
    Literal(String),
    Class(CharacterClass),
    Alternation(Vec<Pattern>),
    Concatenation(Vec<Pattern>),
    Repetition {
        inner: Pattern,
        min: u32,
        max: Option<u32>,
    },
    Latch(Pattern),
    Recursion(Rc<Recursion>),
}

impl PatternNode {
    pub const fn kind(&self) -> PatternKind {
        match self {
            PatternNode::Literal(_) => PatternKind::Literal,
            PatternNode::Class(_) => PatternKind::Class,
            PatternNode::Alternation(_) => PatternKind::Alternation,
            PatternNode::Concatenation(_) => PatternKind::Concatenation,
            PatternNode::Repetition { .. } => PatternKind::Repetition,
            PatternNode::Latch(_) => PatternKind::Latch,
            PatternNode::Recursion(_) => PatternKind::Recursion,
        }
    }
}

struct Node {
    body: PatternNode,
    name: Option<Rc<str>>,
}

#[derive(Clone)]
pub struct Pattern {
    node: Rc<Node>,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Edge {
    Any,
    Leading,
}

impl Pattern {
    fn from_node(body: PatternNode) -> Self {
        Self {
            node: Rc::new(Node { body, name: None }),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::from_node(PatternNode::Literal(text.into()))
    }

    pub fn class(class: CharacterClass) -> Self {
        Self::from_node(PatternNode::Class(class))
    }

    pub fn alternation<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Pattern>,
    {
        Self::from_node(PatternNode::Alternation(
            elements.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn concatenation<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Pattern>,
    {
        Self::from_node(PatternNode::Concatenation(
            elements.into_iter().map(Into::into).collect(),
        ))
    }

    /// Repeat `inner` between `min` and `max` times inclusive. A `max` of
    /// `None` leaves the repetition unbounded.
    pub fn repetition(inner: impl Into<Pattern>, min: u32, max: Option<u32>) -> Self {
        Self::from_node(PatternNode::Repetition {
            inner: inner.into(),
            min,
            max,
        })
    }

    /// A named alias for `target`, used to expose a sub-rule to its siblings.
    pub fn latch(name: &str, target: impl Into<Pattern>) -> Self {
        Self {
            node: Rc::new(Node {
                body: PatternNode::Latch(target.into()),
                name: Some(name.into()),
            }),
        }
    }

    pub(crate) fn from_recursion(cell: Rc<Recursion>) -> Self {
        Self::from_node(PatternNode::Recursion(cell))
    }

    /// The same pattern carrying a rule name. Names take no part in equality.
    pub fn named(&self, name: &str) -> Self {
        Self {
            node: Rc::new(Node {
                body: self.node.body.clone(),
                name: Some(name.into()),
            }),
        }
    }

    pub fn node(&self) -> &PatternNode {
        &self.node.body
    }

    pub fn kind(&self) -> PatternKind {
        self.node.body.kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.node.name.as_deref()
    }

    pub fn elements(&self) -> Vec<Pattern> {
        match self.node() {
            PatternNode::Literal(_) | PatternNode::Class(_) => Vec::new(),
            PatternNode::Alternation(elements) | PatternNode::Concatenation(elements) => {
                elements.clone()
            }
            PatternNode::Repetition { inner, .. } => vec![inner.clone()],
            PatternNode::Latch(target) => vec![target.clone()],
            PatternNode::Recursion(cell) => cell.grammar().into_iter().collect(),
        }
    }

    pub fn as_recursion(&self) -> Option<&Recursion> {
        match self.node() {
            PatternNode::Recursion(cell) => Some(cell.as_ref()),
            _ => None,
        }
    }

    /// The pattern a latch or a bound recursion stands for.
    pub fn target(&self) -> Option<Pattern> {
        match self.node() {
            PatternNode::Latch(target) => Some(target.clone()),
            PatternNode::Recursion(cell) => cell.grammar(),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<(u32, Option<u32>)> {
        match self.node() {
            PatternNode::Repetition { min, max, .. } => Some((*min, *max)),
            _ => None,
        }
    }

    /// Reference identity. Patterns built from the same placeholder are
    /// identical even when they are distinct handles.
    pub fn ptr_eq(a: &Pattern, b: &Pattern) -> bool {
        a.identity() == b.identity()
    }

    pub(crate) fn identity(&self) -> Identity {
        match self.node() {
            PatternNode::Recursion(cell) => Rc::as_ptr(cell).cast(),
            _ => Rc::as_ptr(&self.node).cast(),
        }
    }

    pub fn inspect(&self) -> String {
        format!("{:?}", self)
    }
}

// Composition
impl Pattern {
    /// Append `other` as a further alternative. An anonymous alternation is
    /// flattened into the result; a named one is kept whole.
    pub fn alternate(&self, other: impl Into<Pattern>) -> Pattern {
        let mut elements = match self.node() {
            PatternNode::Alternation(elements) if self.name().is_none() => elements.clone(),
            _ => vec![self.clone()],
        };
        elements.push(other.into());
        Pattern::alternation(elements)
    }

    /// Append `other` to the sequence, flattening an anonymous concatenation.
    pub fn concatenate(&self, other: impl Into<Pattern>) -> Pattern {
        let mut elements = match self.node() {
            PatternNode::Concatenation(elements) if self.name().is_none() => elements.clone(),
            _ => vec![self.clone()],
        };
        elements.push(other.into());
        Pattern::concatenation(elements)
    }

    pub fn drop_first(&self, count: usize) -> Option<Pattern> {
        match self.node() {
            PatternNode::Concatenation(elements) => {
                Some(Pattern::concatenation(elements.iter().skip(count).cloned()))
            }
            _ => None,
        }
    }
}

// Repetition combinators
impl Pattern {
    pub fn any(&self) -> Pattern {
        Pattern::repetition(self.clone(), 0, None)
    }

    pub fn zero_or_more(&self) -> Pattern {
        self.any()
    }

    pub fn one_or_more(&self) -> Pattern {
        self.at_least(1)
    }

    /// Zero or one. A recursion is already optional and is returned as is.
    pub fn optional(&self) -> Pattern {
        match self.node() {
            PatternNode::Recursion(_) => self.clone(),
            _ => Pattern::repetition(self.clone(), 0, Some(1)),
        }
    }

    pub fn maybe(&self) -> Pattern {
        self.optional()
    }

    pub fn at_least(&self, min: u32) -> Pattern {
        Pattern::repetition(self.clone(), min, None)
    }

    pub fn at_most(&self, max: u32) -> Pattern {
        Pattern::repetition(self.clone(), 0, Some(max))
    }

    /// Up to, but not including, `max` repetitions. `None` when `max` is 0.
    pub fn less_than(&self, max: u32) -> Option<Pattern> {
        max.checked_sub(1).map(|max| self.at_most(max))
    }

    pub fn more_than(&self, min: u32) -> Pattern {
        self.at_least(min.saturating_add(1))
    }

    pub fn repeat(&self, count: u32) -> Pattern {
        Pattern::repetition(self.clone(), count, Some(count))
    }

    pub fn repeat_between(&self, min: u32, max: u32) -> Pattern {
        Pattern::repetition(self.clone(), min, Some(max))
    }

    pub fn one(&self) -> Pattern {
        self.repeat(1)
    }

    pub fn is_any(&self) -> bool {
        matches!(self.bounds(), Some((0, None)))
    }

    pub fn is_one_or_more(&self) -> bool {
        matches!(self.bounds(), Some((1, None)))
    }

    pub fn is_at_least(&self, count: u32) -> bool {
        matches!(self.bounds(), Some((min, None)) if min <= count)
    }

    pub fn is_optional(&self) -> bool {
        match self.node() {
            PatternNode::Repetition {
                min: 0,
                max: Some(1),
                ..
            } => true,
            PatternNode::Latch(target) => target.is_optional(),
            PatternNode::Recursion(_) => true,
            _ => false,
        }
    }
}

// Traversal
impl Pattern {
    /// True if this pattern can reach itself through its children.
    pub fn is_recursive(&self) -> bool {
        self.descend(self.identity(), &mut vec![self.identity()], Edge::Any)
    }

    /// True if `root` is this pattern or is reachable from it.
    pub fn recurses_into(&self, root: &Pattern) -> bool {
        self.visit(root.identity(), &mut Vec::new(), Edge::Any)
    }

    /// True if this pattern can reach itself through leading positions only.
    pub fn is_left_recursive(&self) -> bool {
        self.descend(self.identity(), &mut vec![self.identity()], Edge::Leading)
    }

    /// True if `root` is this pattern or is reachable from it without first
    /// passing a non-leading element of a concatenation.
    pub fn left_recurses_into(&self, root: &Pattern) -> bool {
        self.visit(root.identity(), &mut Vec::new(), Edge::Leading)
    }

    fn visit(&self, root: Identity, path: &mut Vec<Identity>, edge: Edge) -> bool {
        let id = self.identity();
        if id == root {
            return true;
        }
        // Already on the path: a cycle, but not through the root.
        if path.contains(&id) {
            return false;
        }
        path.push(id);
        self.descend(root, path, edge)
    }

    fn descend(&self, root: Identity, path: &mut Vec<Identity>, edge: Edge) -> bool {
        match self.node() {
            PatternNode::Literal(_) | PatternNode::Class(_) => false,
            PatternNode::Alternation(elements) => elements
                .iter()
                .any(|element| element.visit(root, path, edge)),
            PatternNode::Concatenation(elements) => match edge {
                Edge::Leading => elements
                    .first()
                    .is_some_and(|first| first.visit(root, path, edge)),
                Edge::Any => elements
                    .iter()
                    .any(|element| element.visit(root, path, edge)),
            },
            PatternNode::Repetition { inner, .. } => inner.visit(root, path, edge),
            PatternNode::Latch(target) => target.visit(root, path, edge),
            PatternNode::Recursion(cell) => cell
                .grammar()
                .is_some_and(|grammar| grammar.visit(root, path, edge)),
        }
    }

    /// Fixed width in characters, when every match has the same width.
    pub fn length(&self) -> Option<usize> {
        self.width(&mut Vec::new())
    }

    fn width(&self, active: &mut Vec<Identity>) -> Option<usize> {
        match self.node() {
            PatternNode::Literal(text) => Some(text.chars().count()),
            PatternNode::Class(_) => Some(1),
            PatternNode::Concatenation(elements) => elements
                .iter()
                .try_fold(0usize, |total, element| total.checked_add(element.width(active)?)),
            PatternNode::Alternation(elements) => {
                let (first, rest) = elements.split_first()?;
                let width = first.width(active)?;
                for element in rest {
                    if element.width(active)? != width {
                        return None;
                    }
                }
                Some(width)
            }
            PatternNode::Repetition { inner, min, max } => match *max {
                Some(max) if max == *min => inner.width(active)?.checked_mul(max as usize),
                _ => None,
            },
            PatternNode::Latch(target) => target.width(active),
            PatternNode::Recursion(cell) => {
                let id = self.identity();
                if active.contains(&id) {
                    return None;
                }
                let grammar = cell.grammar()?;
                active.push(id);
                let width = grammar.width(active);
                active.pop();
                width
            }
        }
    }
}

// Structural equality
impl Pattern {
    fn eq_in(&self, other: &Pattern, seen: &mut Vec<(Identity, Identity)>) -> bool {
        if Rc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        match (self.node(), other.node()) {
            (PatternNode::Literal(a), PatternNode::Literal(b)) => a == b,
            (PatternNode::Class(a), PatternNode::Class(b)) => a == b,
            (PatternNode::Alternation(a), PatternNode::Alternation(b))
            | (PatternNode::Concatenation(a), PatternNode::Concatenation(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.eq_in(b, seen))
            }
            (
                PatternNode::Repetition {
                    inner: a,
                    min: a_min,
                    max: a_max,
                },
                PatternNode::Repetition {
                    inner: b,
                    min: b_min,
                    max: b_max,
                },
            ) => a_min == b_min && a_max == b_max && a.eq_in(b, seen),
            (PatternNode::Latch(a), PatternNode::Latch(b)) => a.eq_in(b, seen),
            (PatternNode::Recursion(a), PatternNode::Recursion(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                // Comparing this pair already: assume equal and let the
                // enclosing comparison decide.
                let pair = (self.identity(), other.identity());
                if seen.contains(&pair) {
                    return true;
                }
                seen.push(pair);
                let equal = match (a.grammar(), b.grammar()) {
                    (Some(a), Some(b)) => a.eq_in(&b, seen),
                    (None, None) => true,
                    _ => false,
                };
                seen.pop();
                equal
            }
            _ => false,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Pattern) -> bool {
        self.eq_in(other, &mut Vec::new())
    }
}

impl Eq for Pattern {}

impl PartialEq<str> for Pattern {
    fn eq(&self, other: &str) -> bool {
        matches!(self.node(), PatternNode::Literal(text) if text == other)
    }
}

impl PartialEq<&str> for Pattern {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self.node() {
            PatternNode::Literal(text) => text.hash(state),
            PatternNode::Class(class) => class.hash(state),
            PatternNode::Alternation(elements) | PatternNode::Concatenation(elements) => {
                elements.len().hash(state);
                for element in elements {
                    element.hash(state);
                }
            }
            PatternNode::Repetition { inner, min, max } => {
                inner.hash(state);
                min.hash(state);
                max.hash(state);
            }
            PatternNode::Latch(target) => target.hash(state),
            // Recursions may close a cycle, so only the kind is hashed.
            PatternNode::Recursion(_) => {}
        }
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Pattern::literal(text)
    }
}

impl From<String> for Pattern {
    fn from(text: String) -> Self {
        Pattern::literal(text)
    }
}

impl From<char> for Pattern {
    fn from(ch: char) -> Self {
        Pattern::literal(ch)
    }
}

impl From<CharacterClass> for Pattern {
    fn from(class: CharacterClass) -> Self {
        Pattern::class(class)
    }
}

impl From<&Pattern> for Pattern {
    fn from(pattern: &Pattern) -> Self {
        pattern.clone()
    }
}

impl<T: Into<Pattern>> BitOr<T> for Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: T) -> Pattern {
        self.alternate(rhs)
    }
}

impl<T: Into<Pattern>> BitOr<T> for &Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: T) -> Pattern {
        self.alternate(rhs)
    }
}

impl BitOr<Pattern> for &str {
    type Output = Pattern;

    fn bitor(self, rhs: Pattern) -> Pattern {
        Pattern::literal(self).alternate(rhs)
    }
}

impl<T: Into<Pattern>> Add<T> for Pattern {
    type Output = Pattern;

    fn add(self, rhs: T) -> Pattern {
        self.concatenate(rhs)
    }
}

impl<T: Into<Pattern>> Add<T> for &Pattern {
    type Output = Pattern;

    fn add(self, rhs: T) -> Pattern {
        self.concatenate(rhs)
    }
}

impl Add<Pattern> for &str {
    type Output = Pattern;

    fn add(self, rhs: Pattern) -> Pattern {
        Pattern::literal(self).concatenate(rhs)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            write!(f, "{}:", name)?;
        }
        self.render_body(f, &mut Vec::new())
    }
}

impl Pattern {
    fn render(&self, f: &mut fmt::Formatter<'_>, active: &mut Vec<Identity>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => self.render_body(f, active),
        }
    }

    fn render_body(&self, f: &mut fmt::Formatter<'_>, active: &mut Vec<Identity>) -> fmt::Result {
        match self.node() {
            PatternNode::Literal(text) => write!(f, "literal({:?})", text),
            PatternNode::Class(class) => write!(f, "{:?}", class),
            PatternNode::Alternation(parts) => {
                f.write_str("alt(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" | ")?;
                    }
                    part.render(f, active)?;
                }
                f.write_str(")")
            }
            PatternNode::Concatenation(parts) => {
                f.write_str("seq(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    part.render(f, active)?;
                }
                f.write_str(")")
            }
            PatternNode::Repetition { inner, min, max } => {
                f.write_str("repeat(")?;
                inner.render(f, active)?;
                match max {
                    Some(max) => write!(f, ", {}..={})", min, max),
                    None => write!(f, ", {}..=∞)", min),
                }
            }
            PatternNode::Latch(target) => {
                f.write_str("latch(")?;
                target.render(f, active)?;
                f.write_str(")")
            }
            PatternNode::Recursion(cell) => {
                let id = self.identity();
                if active.contains(&id) {
                    return f.write_str("recursion(..)");
                }
                match cell.grammar() {
                    Some(grammar) => {
                        active.push(id);
                        f.write_str("recursion(")?;
                        grammar.render(f, active)?;
                        active.pop();
                        f.write_str(")")
                    }
                    None => f.write_str("recursion(?)"),
                }
            }
        }
    }
}

pub fn alternation<I, T>(elements: I) -> Pattern
where
    I: IntoIterator<Item = T>,
    T: Into<Pattern>,
{
    Pattern::alternation(elements)
}

pub fn concatenation<I, T>(elements: I) -> Pattern
where
    I: IntoIterator<Item = T>,
    T: Into<Pattern>,
{
    Pattern::concatenation(elements)
}

pub fn repetition(inner: impl Into<Pattern>, min: u32, max: Option<u32>) -> Pattern {
    Pattern::repetition(inner, min, max)
}

pub fn character_class<I, T>(items: I) -> Result<Pattern, ClassError>
where
    I: IntoIterator<Item = T>,
    T: Into<crate::class::ClassItem>,
{
    CharacterClass::new(items).map(Pattern::class)
}
