#![no_std]
#![forbid(unsafe_code)]
#![doc = "Grammar: composable patterns, recursion elimination and regex compilation."]

extern crate alloc;

mod class;
mod compile;
mod error;
mod matches;
mod pattern;
mod recursion;
mod resolve;
mod rules;

pub use class::{CharacterClass, ClassItem};
pub use error::{ClassError, CompileError, MatchError, ResolveError};
pub use matches::{Match, MatchKey, MatchValue};
pub use pattern::{
    Pattern, PatternKind, PatternNode, alternation, character_class, concatenation, repetition,
};
pub use recursion::{Placeholder, Recursion};
pub use resolve::{RecursionShape, classify, resolve};
pub use rules::{Grammar, RuleSet};

pub mod prelude {
    pub use crate::class::{CharacterClass, ClassItem};
    pub use crate::error::{ClassError, CompileError, MatchError, ResolveError};
    pub use crate::matches::{Match, MatchKey, MatchValue};
    pub use crate::pattern::{
        Pattern, PatternKind, PatternNode, alternation, character_class, concatenation,
        repetition,
    };
    pub use crate::recursion::{Placeholder, Recursion};
    pub use crate::resolve::{RecursionShape, classify, resolve};
    pub use crate::rules::{Grammar, RuleSet};
}
