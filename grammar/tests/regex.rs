use grammar::{CharacterClass, ClassItem, CompileError, Pattern, Placeholder, resolve};
use pretty_assertions::assert_eq;
use proptest::collection::vec;
use proptest::prelude::*;
use regex::Regex;
use regex_syntax::ParserBuilder;

fn source(pattern: &Pattern) -> String {
    pattern.to_regex_source().expect("regular pattern")
}

fn anchored(pattern: &Pattern) -> Regex {
    Regex::new(&format!("^(?:{})$", source(pattern))).expect("valid regex")
}

#[test]
fn literals_are_escaped() {
    let pattern = Pattern::literal("a.b*");
    assert_eq!(source(&pattern), r"a\.b\*");

    let regex = anchored(&pattern);
    assert!(regex.is_match("a.b*"));
    assert!(!regex.is_match("axbbb"));

    assert_eq!(source(&Pattern::literal("\n\t")), r"\n\t");
}

#[test]
fn classes_compile_to_brackets() {
    let class = CharacterClass::new([
        ClassItem::range('a', 'z'),
        ClassItem::Char('_'),
        ClassItem::Char('-'),
    ])
    .expect("valid class");
    let pattern = Pattern::class(class);
    assert_eq!(source(&pattern), r"[a-z_\-]");

    let regex = anchored(&pattern);
    assert!(regex.is_match("q"));
    assert!(regex.is_match("-"));
    assert!(!regex.is_match("Q"));
}

#[test]
fn empty_class_and_alternation_match_nothing() {
    for pattern in [
        Pattern::class(CharacterClass::default()),
        Pattern::alternation(Vec::<Pattern>::new()),
    ] {
        let regex = anchored(&pattern);
        assert!(!regex.is_match(""));
        assert!(!regex.is_match("a"));
    }
}

#[test]
fn alternation_groups_only_when_needed() {
    assert_eq!(source(&Pattern::alternation(["only"])), "only");
    assert_eq!(source(&(Pattern::literal("a") | "bc")), "(a|bc)");
}

#[test]
fn repetition_suffixes() {
    let x = Pattern::literal("x");
    assert_eq!(source(&x.one()), "x");
    assert_eq!(source(&x.optional()), "x?");
    assert_eq!(source(&x.any()), "x*");
    assert_eq!(source(&x.one_or_more()), "x+");
    assert_eq!(source(&x.repeat(3)), "x{3}");
    assert_eq!(source(&x.at_least(2)), "x{2,}");
    assert_eq!(source(&x.repeat_between(2, 4)), "x{2,4}");
    assert_eq!(source(&x.at_most(3)), "x{0,3}");
    assert_eq!(source(&Pattern::literal("ab").any()), "(ab)*");
    assert_eq!(source(&(Pattern::literal("a") | "b").one_or_more()), "(a|b)+");
    assert_eq!(source(&x.optional().any()), "(x?)*");
}

#[test]
fn inverted_repetition_is_rejected() {
    let pattern = Pattern::literal("x").repeat_between(3, 1);
    assert_eq!(
        pattern.to_regex_source(),
        Err(CompileError::InvalidRepeat { min: 3, max: 1 })
    );
}

#[test]
fn unbound_recursion_is_rejected() {
    let placeholder = Placeholder::new();
    let pattern = Pattern::literal("x") + placeholder.pattern();
    assert_eq!(
        pattern.to_regex_source(),
        Err(CompileError::UnresolvedRecursion)
    );
}

#[test]
fn shared_recursion_compiles_each_use() {
    let placeholder = Placeholder::new();
    let r = placeholder.pattern();
    resolve(Pattern::literal("x") | "y", placeholder, false).expect("plain pattern");

    let pattern = r.clone() + "-" + r;
    assert_eq!(source(&pattern), r"(x|y)\-(x|y)");
    assert!(anchored(&pattern).is_match("y-x"));
}

#[test]
fn parsed_form_is_available() {
    let pattern = Pattern::literal("ab").one_or_more() + (Pattern::literal("c") | "d");
    assert!(pattern.to_regex().is_ok());

    let mut parser = ParserBuilder::new().case_insensitive(true).build();
    assert!(pattern.to_regex_with(&mut parser).is_ok());
}

#[test]
fn parser_rejection_is_reported() {
    let pattern = Pattern::literal("ab").any().any().any();
    let mut parser = ParserBuilder::new().nest_limit(2).build();
    assert!(matches!(
        pattern.to_regex_with(&mut parser),
        Err(CompileError::Syntax(_))
    ));
}

proptest! {
    #[test]
    fn concatenated_literals_compile_to_their_join(parts in vec("[a-z]{1,4}", 1..6)) {
        let pattern = Pattern::concatenation(parts.iter().map(String::as_str));
        prop_assert_eq!(source(&pattern), parts.concat());
    }

    #[test]
    fn alternation_source_is_grouped_when_plural(parts in vec("[a-z]{1,4}", 1..6)) {
        let pattern = Pattern::alternation(parts.iter().map(String::as_str));
        let expected = if parts.len() == 1 {
            parts[0].clone()
        } else {
            format!("({})", parts.join("|"))
        };
        prop_assert_eq!(source(&pattern), expected);
    }

    #[test]
    fn compiled_alternation_accepts_every_alternative(parts in vec("[a-z]{1,4}", 1..6)) {
        let regex = anchored(&Pattern::alternation(parts.iter().map(String::as_str)));
        for part in &parts {
            prop_assert!(regex.is_match(part));
        }
    }

    #[test]
    fn escaped_literal_matches_its_own_text(text in "[ -~]{1,12}") {
        let regex = anchored(&Pattern::literal(text.as_str()));
        prop_assert!(regex.is_match(&text));
    }
}
