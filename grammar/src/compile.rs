use crate::class::{CharacterClass, ClassItem};
use crate::error::CompileError;
use crate::pattern::{Identity, Pattern, PatternNode};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use regex_syntax::hir::Hir;
use regex_syntax::{Parser, ParserBuilder};

/// Matches nothing. Used for empty classes and empty alternations.
const EMPTY_CLASS: &str = r"[^\x{0}-\x{10FFFF}]";

struct Fragment {
    source: String,
    // Safe to suffix with a quantifier without wrapping it in a group.
    atomic: bool,
}

impl Pattern {
    /// Compile this pattern into regular-expression source.
    ///
    /// Fails when the graph reaches a recursion that embeds itself (its
    /// language is not regular) or a recursion that was never resolved.
    pub fn to_regex_source(&self) -> Result<String, CompileError> {
        compile_fragment(self, &mut Vec::new()).map(|fragment| fragment.source)
    }

    /// Compile and parse with a default parser.
    pub fn to_regex(&self) -> Result<Hir, CompileError> {
        self.to_regex_with(&mut ParserBuilder::new().build())
    }

    pub fn to_regex_with(&self, parser: &mut Parser) -> Result<Hir, CompileError> {
        let source = self.to_regex_source()?;
        tracing::trace!(%source, "compiled pattern");
        parser
            .parse(&source)
            .map_err(|err| CompileError::Syntax(err.to_string()))
    }
}

fn compile_fragment(
    pattern: &Pattern,
    active: &mut Vec<Identity>,
) -> Result<Fragment, CompileError> {
    match pattern.node() {
        PatternNode::Literal(text) => {
            let mut source = String::with_capacity(text.len());
            for ch in text.chars() {
                push_escaped(&mut source, ch);
            }
            Ok(Fragment {
                source,
                atomic: text.chars().count() == 1,
            })
        }
        PatternNode::Class(class) => Ok(Fragment {
            source: class_source(class),
            atomic: true,
        }),
        PatternNode::Alternation(elements) => match elements.as_slice() {
            [] => Ok(Fragment {
                source: EMPTY_CLASS.into(),
                atomic: true,
            }),
            [single] => compile_fragment(single, active),
            _ => {
                let parts = elements
                    .iter()
                    .map(|element| {
                        compile_fragment(element, active).map(|fragment| fragment.source)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Fragment {
                    source: format!("({})", parts.join("|")),
                    atomic: true,
                })
            }
        },
        PatternNode::Concatenation(elements) => {
            let mut source = String::new();
            let mut atomic = elements.len() == 1;
            for element in elements {
                let fragment = compile_fragment(element, active)?;
                atomic &= fragment.atomic;
                source.push_str(&fragment.source);
            }
            Ok(Fragment { source, atomic })
        }
        PatternNode::Repetition { inner, min, max } => {
            if let Some(max) = *max {
                if max < *min {
                    return Err(CompileError::InvalidRepeat { min: *min, max });
                }
            }
            let fragment = compile_fragment(inner, active)?;
            let Some(suffix) = repetition_suffix(*min, *max) else {
                return Ok(fragment);
            };
            let source = if fragment.atomic {
                fragment.source + &suffix
            } else {
                format!("({}){}", fragment.source, suffix)
            };
            Ok(Fragment {
                source,
                atomic: false,
            })
        }
        PatternNode::Latch(target) => compile_fragment(target, active),
        PatternNode::Recursion(cell) => {
            let id = pattern.identity();
            if active.contains(&id) {
                return Err(CompileError::NotRegular);
            }
            let grammar = cell.grammar().ok_or(CompileError::UnresolvedRecursion)?;
            active.push(id);
            let fragment = compile_fragment(&grammar, active);
            active.pop();
            fragment
        }
    }
}

/// Quantifier for `min..=max` repetitions, or `None` for exactly once.
fn repetition_suffix(min: u32, max: Option<u32>) -> Option<String> {
    match (min, max) {
        (1, Some(1)) => None,
        (0, Some(1)) => Some("?".into()),
        (min, Some(max)) if min == max => Some(format!("{{{}}}", min)),
        (0, None) => Some("*".into()),
        (1, None) => Some("+".into()),
        (min, None) => Some(format!("{{{},}}", min)),
        (min, Some(max)) => Some(format!("{{{},{}}}", min, max)),
    }
}

fn class_source(class: &CharacterClass) -> String {
    if class.is_empty() {
        return EMPTY_CLASS.into();
    }
    let mut source = String::from("[");
    for item in class.items() {
        match *item {
            ClassItem::Char(ch) => push_escaped(&mut source, ch),
            ClassItem::Range { start, end } => {
                push_escaped(&mut source, start);
                source.push('-');
                push_escaped(&mut source, end);
            }
        }
    }
    source.push(']');
    source
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '\n' => out.push_str(r"\n"),
        '\r' => out.push_str(r"\r"),
        '\t' => out.push_str(r"\t"),
        _ => {
            if regex_syntax::is_meta_character(ch) {
                out.push('\\');
            }
            out.push(ch);
        }
    }
}
