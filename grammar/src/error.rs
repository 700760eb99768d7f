use crate::pattern::PatternKind;
use alloc::string::String;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassError {
    #[error("inverted character range {start:?}-{end:?}")]
    InvertedRange { start: char, end: char },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("need {expected} values, got {actual}")]
    Arity { expected: usize, actual: usize },
    #[error("{actual} repetitions outside of {min}..={max:?}")]
    Bounds {
        min: u32,
        max: Option<u32>,
        actual: usize,
    },
    #[error("expected a {expected:?} pattern, found {actual:?}")]
    Kind {
        expected: PatternKind,
        actual: PatternKind,
    },
    #[error("value is not one of the alternatives")]
    NotAnAlternative,
    #[error("text {0:?} does not match the pattern")]
    Mismatch(String),
    #[error("pattern has no match shape")]
    NotMatchable,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("recursion expected but not found")]
    RecursionNotFound,
    #[error("recursion has no non-recursive alternative")]
    Unproductive,
    #[error("rule {0:?} is referenced but never defined")]
    UndefinedRule(String),
    #[error("rule {0:?} is defined more than once")]
    DuplicateRule(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("self-embedding recursion has no regular expression")]
    NotRegular,
    #[error("recursion was never resolved")]
    UnresolvedRecursion,
    #[error("invalid repetition bounds {min}..={max}")]
    InvalidRepeat { min: u32, max: u32 },
    #[error("generated pattern rejected: {0}")]
    Syntax(String),
}
