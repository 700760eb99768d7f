//! Recursion elimination.
//!
//! A rule body is assembled with a [`Placeholder`] standing in wherever the
//! rule refers to itself. [`resolve`] inspects where those references sit
//! and, when the rule's language is regular, rewrites the body into an
//! equivalent one built from repetitions:
//!
//! | body                      | result                    |
//! |---------------------------|---------------------------|
//! | `a \| b \| R`             | `(a \| b)+`               |
//! | `b \| R a`                | `b a*`                    |
//! | `R a`                     | `a*`                      |
//! | `a R`                     | `a+`                      |
//!
//! Self-embedding bodies (`R a R`, `a R b`, or recursion through other
//! rules) are left as they are. The placeholder is bound to the body and the
//! resolved pattern is the placeholder itself.

use crate::error::ResolveError;
use crate::pattern::{Pattern, PatternNode};
use crate::recursion::Placeholder;
use alloc::vec;
use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecursionShape {
    /// The body never refers to the placeholder.
    Absent,
    /// An alternation with the bare placeholder as one of its alternatives.
    Direct,
    /// The placeholder leads the body, or leads some of its alternatives.
    Left,
    /// The placeholder ends a sequence.
    Right,
    /// The placeholder both starts and ends a sequence.
    Outer,
    /// The placeholder sits inside a sequence.
    Center,
    /// The placeholder is reached only through nested patterns or other rules.
    Indirect,
    /// The body is neither an alternation nor a concatenation.
    Opaque,
    /// The body is the placeholder itself.
    Unproductive,
}

/// Classify how `built` refers to `placeholder`.
pub fn classify(built: &Pattern, placeholder: &Placeholder) -> RecursionShape {
    shape_of(built, &placeholder.pattern())
}

/// Bind `placeholder` to the resolved form of `built` and freeze it.
///
/// Returns the rewritten pattern when recursion could be eliminated, or the
/// placeholder's own pattern when the result still refers to itself. When
/// `built` never uses the placeholder this fails with
/// [`ResolveError::RecursionNotFound`], unless `require_recursion` is false,
/// in which case `built` is returned unchanged.
pub fn resolve(
    built: Pattern,
    placeholder: Placeholder,
    require_recursion: bool,
) -> Result<Pattern, ResolveError> {
    let root = placeholder.pattern();
    let cell = placeholder.cell();
    let shape = shape_of(&built, &root);
    tracing::debug!(?shape, name = ?built.name(), "resolving recursion");

    match shape {
        RecursionShape::Absent if require_recursion => {
            return Err(ResolveError::RecursionNotFound);
        }
        RecursionShape::Absent => {
            cell.bind(built.clone());
            cell.freeze();
            return Ok(built);
        }
        RecursionShape::Unproductive => return Err(ResolveError::Unproductive),
        _ => {}
    }

    let grammar = match rewrite(shape, &built, &root) {
        Some(rewritten) => match built.name() {
            Some(name) => rewritten.named(name),
            None => rewritten,
        },
        None => built.clone(),
    };
    cell.bind(grammar.clone());
    cell.freeze();
    tracing::trace!(?grammar, "recursion resolved");

    if grammar.recurses_into(&root) {
        Ok(match built.name() {
            Some(name) => root.named(name),
            None => root,
        })
    } else {
        Ok(grammar)
    }
}

fn shape_of(built: &Pattern, root: &Pattern) -> RecursionShape {
    if Pattern::ptr_eq(built, root) {
        return RecursionShape::Unproductive;
    }
    if !built.recurses_into(root) {
        return RecursionShape::Absent;
    }

    match built.node() {
        PatternNode::Alternation(elements) => {
            let others: Vec<&Pattern> = elements
                .iter()
                .filter(|element| !Pattern::ptr_eq(element, root))
                .collect();
            let direct = others.len() != elements.len();
            if direct && !others.iter().any(|element| element.left_recurses_into(root)) {
                return RecursionShape::Direct;
            }

            if split_alternatives(elements, root).tails.is_empty() {
                RecursionShape::Indirect
            } else {
                RecursionShape::Left
            }
        }
        PatternNode::Concatenation(elements) => {
            let leads = elements
                .first()
                .is_some_and(|first| Pattern::ptr_eq(first, root));
            let ends = elements
                .last()
                .is_some_and(|last| Pattern::ptr_eq(last, root));
            match (leads, ends) {
                (true, true) => RecursionShape::Outer,
                (true, false) => RecursionShape::Left,
                (false, true) => RecursionShape::Right,
                _ if elements.iter().any(|element| Pattern::ptr_eq(element, root)) => {
                    RecursionShape::Center
                }
                _ => RecursionShape::Indirect,
            }
        }
        _ => RecursionShape::Opaque,
    }
}

fn rewrite(shape: RecursionShape, built: &Pattern, root: &Pattern) -> Option<Pattern> {
    match (shape, built.node()) {
        (RecursionShape::Direct, PatternNode::Alternation(elements)) => {
            let remaining = elements
                .iter()
                .filter(|element| !Pattern::ptr_eq(element, root))
                .cloned();
            Some(Pattern::alternation(remaining).one_or_more())
        }
        // A -> A a | b  =>  A -> b a*
        (RecursionShape::Left, PatternNode::Alternation(elements)) => {
            let Split { seed, tails } = split_alternatives(elements, root);
            Some(Pattern::concatenation([choice(seed), choice(tails).any()]))
        }
        (RecursionShape::Left, PatternNode::Concatenation(elements)) => {
            let (_, rest) = elements.split_first()?;
            sequence(rest.to_vec()).map(|rest| rest.any())
        }
        (RecursionShape::Right, PatternNode::Concatenation(elements)) => {
            let (_, rest) = elements.split_last()?;
            sequence(rest.to_vec()).map(|rest| rest.one_or_more())
        }
        _ => None,
    }
}

struct Split {
    /// Alternatives that do not start with the placeholder.
    seed: Vec<Pattern>,
    /// What follows the placeholder in the alternatives that start with it.
    tails: Vec<Pattern>,
}

fn split_alternatives(elements: &[Pattern], root: &Pattern) -> Split {
    let mut split = Split {
        seed: Vec::new(),
        tails: Vec::new(),
    };
    for element in elements {
        match strip_leading(element, root) {
            // A bare `A -> A` alternative derives nothing new.
            Some(Remainder::Empty) => {}
            Some(Remainder::Rest(tail)) => split.tails.push(tail),
            None => split.seed.push(element.clone()),
        }
    }
    split
}

enum Remainder {
    Empty,
    Rest(Pattern),
}

/// Remove a leading reference to `root` from `element`, looking through
/// nested leading concatenations.
fn strip_leading(element: &Pattern, root: &Pattern) -> Option<Remainder> {
    if Pattern::ptr_eq(element, root) {
        return Some(Remainder::Empty);
    }
    let PatternNode::Concatenation(elements) = element.node() else {
        return None;
    };
    let (first, rest) = elements.split_first()?;
    let mut tail = match strip_leading(first, root)? {
        Remainder::Empty => Vec::new(),
        Remainder::Rest(head) => match head.node() {
            PatternNode::Concatenation(parts) if head.name().is_none() => parts.clone(),
            _ => vec![head.clone()],
        },
    };
    tail.extend(rest.iter().cloned());
    Some(match sequence(tail) {
        Some(tail) => Remainder::Rest(tail),
        None => Remainder::Empty,
    })
}

fn sequence(mut parts: Vec<Pattern>) -> Option<Pattern> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Pattern::concatenation(parts)),
    }
}

fn choice(mut parts: Vec<Pattern>) -> Pattern {
    if parts.len() == 1 {
        if let Some(single) = parts.pop() {
            return single;
        }
    }
    Pattern::alternation(parts)
}
