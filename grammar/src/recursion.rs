//! Forward references for rules that refer to themselves.
//!
//! A [`Placeholder`] is the build-time handle: it is created before a rule
//! body exists, its [`Placeholder::pattern`] is embedded wherever the body
//! refers to the rule, and it is consumed by [`crate::resolve`]. The shared
//! [`Recursion`] cell it points at may be rebound until it is frozen and is
//! immutable from then on. Only a placeholder can bind its cell, and the
//! placeholder is gone once the cell is frozen, so a frozen cell cannot be
//! rebound.

use crate::pattern::Pattern;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

#[derive(Default)]
pub struct Recursion {
    grammar: RefCell<Option<Pattern>>,
    frozen: Cell<bool>,
}

impl Recursion {
    /// The pattern this recursion stands for, once bound.
    pub fn grammar(&self) -> Option<Pattern> {
        self.grammar.borrow().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.grammar.borrow().is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    pub(crate) fn bind(&self, grammar: Pattern) {
        debug_assert!(!self.frozen.get(), "frozen recursion rebound");
        *self.grammar.borrow_mut() = Some(grammar);
    }

    pub(crate) fn freeze(&self) {
        self.frozen.set(true);
    }
}

pub struct Placeholder {
    cell: Rc<Recursion>,
}

impl Placeholder {
    pub fn new() -> Self {
        Self {
            cell: Rc::new(Recursion::default()),
        }
    }

    /// A self-reference to embed in the rule body under construction.
    ///
    /// Every call yields a pattern for the same underlying slot.
    pub fn pattern(&self) -> Pattern {
        Pattern::from_recursion(Rc::clone(&self.cell))
    }

    pub(crate) fn cell(&self) -> &Rc<Recursion> {
        &self.cell
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new()
    }
}
