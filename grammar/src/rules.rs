//! Named rules that may refer to one another before they are defined.
//!
//! Every rule owns a [`Placeholder`]. [`RuleSet::reference`] hands out that
//! placeholder's pattern, so bodies can mention rules that do not exist yet.
//! [`RuleSet::finish`] then resolves the whole set in two passes: every
//! placeholder is first bound to its raw body, so cross-rule references can
//! be followed, and then each rule is resolved and frozen in definition order.

use crate::error::ResolveError;
use crate::pattern::Pattern;
use crate::recursion::Placeholder;
use crate::resolve::resolve;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

struct Rule {
    name: String,
    placeholder: Placeholder,
    body: Option<Pattern>,
}

#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    index: BTreeMap<String, usize>,
    // Indices into `rules`, in the order bodies were defined.
    order: Vec<usize>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> usize {
        if let Some(&index) = self.index.get(name) {
            return index;
        }
        let index = self.rules.len();
        self.rules.push(Rule {
            name: name.into(),
            placeholder: Placeholder::new(),
            body: None,
        });
        self.index.insert(name.into(), index);
        index
    }

    /// A pattern standing for the rule `name`, defined or not.
    pub fn reference(&mut self, name: &str) -> Pattern {
        let index = self.entry(name);
        self.rules[index].placeholder.pattern().named(name)
    }

    pub fn define(&mut self, name: &str, body: impl Into<Pattern>) -> Result<(), ResolveError> {
        let index = self.entry(name);
        let rule = &mut self.rules[index];
        if rule.body.is_some() {
            return Err(ResolveError::DuplicateRule(name.into()));
        }
        rule.body = Some(body.into());
        self.order.push(index);
        Ok(())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.index
            .get(name)
            .is_some_and(|&index| self.rules[index].body.is_some())
    }

    pub fn finish(self) -> Result<Grammar, ResolveError> {
        if let Some(rule) = self.rules.iter().find(|rule| rule.body.is_none()) {
            return Err(ResolveError::UndefinedRule(rule.name.clone()));
        }

        for rule in &self.rules {
            if let Some(body) = &rule.body {
                tracing::trace!(rule = %rule.name, "binding provisional body");
                rule.placeholder.cell().bind(body.clone());
            }
        }

        let mut pending: Vec<Option<Rule>> = self.rules.into_iter().map(Some).collect();
        let mut rules = Vec::with_capacity(pending.len());
        for index in self.order {
            let Some(Rule {
                name,
                placeholder,
                body: Some(body),
            }) = pending.get_mut(index).and_then(Option::take)
            else {
                continue;
            };
            let pattern = resolve(body, placeholder, false)?.named(&name);
            tracing::debug!(rule = %name, kind = ?pattern.kind(), "resolved rule");
            rules.push((name, pattern));
        }

        let index = rules
            .iter()
            .enumerate()
            .map(|(position, (name, _))| (name.clone(), position))
            .collect();
        Ok(Grammar { rules, index })
    }
}

/// A resolved set of rules.
pub struct Grammar {
    rules: Vec<(String, Pattern)>,
    index: BTreeMap<String, usize>,
}

impl Grammar {
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        let &position = self.index.get(name)?;
        self.rules.get(position).map(|(_, pattern)| pattern)
    }

    /// Rules in the order they were defined.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        self.rules
            .iter()
            .map(|(name, pattern)| (name.as_str(), pattern))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}
