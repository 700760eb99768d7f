use grammar::{
    CharacterClass, Match, MatchError, MatchKey, MatchValue, Pattern, PatternKind, Placeholder,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn digit() -> Pattern {
    Pattern::class(CharacterClass::new(['0'..='9']).expect("valid class"))
}

fn text(pattern: &Pattern, text: &str) -> Match {
    Match::text(pattern, text).expect("text matches")
}

#[test]
fn text_matches_literals_and_class_members() {
    let keyword = text(&Pattern::literal("if"), "if");
    assert_eq!(keyword.length(), 2);
    assert_eq!(keyword.to_string(), "if");
    assert!(keyword == "if");
    assert_eq!(keyword.value(), &MatchValue::Text("if".into()));
    assert!(keyword.values().is_empty());

    let seven = text(&digit(), "7");
    assert_eq!(seven.length(), 1);
}

#[test]
fn text_must_fit_the_pattern() {
    assert_eq!(
        Match::text(&Pattern::literal("if"), "of"),
        Err(MatchError::Mismatch("of".into()))
    );
    assert_eq!(
        Match::text(&digit(), "a"),
        Err(MatchError::Mismatch("a".into()))
    );
    assert_eq!(
        Match::text(&digit(), "12"),
        Err(MatchError::Mismatch("12".into()))
    );
    assert_eq!(
        Match::text(&(Pattern::literal("a") + "b"), "ab"),
        Err(MatchError::Kind {
            expected: PatternKind::Literal,
            actual: PatternKind::Concatenation,
        })
    );
}

#[test]
fn concatenation_needs_one_value_per_element() {
    let pattern = Pattern::literal("(") + digit() + ")";
    let elements = pattern.elements();
    let values = vec![
        text(&elements[0], "("),
        text(&elements[1], "4"),
        text(&elements[2], ")"),
    ];

    let matched = Match::concatenation(&pattern, values.clone()).expect("arity matches");
    assert_eq!(matched.length(), 3);
    assert_eq!(matched.to_string(), "(4)");
    assert!(matched == "(4)");
    assert_eq!(matched.values().len(), 3);

    assert_eq!(
        Match::concatenation(&pattern, values[..2].to_vec()),
        Err(MatchError::Arity {
            expected: 3,
            actual: 2
        })
    );
}

#[test]
fn repetition_count_must_fit_bounds() {
    let digits = digit().repeat_between(1, 3);
    let one = text(&digit(), "1");

    assert_eq!(
        Match::repetition(&digits, Vec::new()),
        Err(MatchError::Bounds {
            min: 1,
            max: Some(3),
            actual: 0
        })
    );
    assert_eq!(
        Match::repetition(&digits, vec![one.clone(); 4]),
        Err(MatchError::Bounds {
            min: 1,
            max: Some(3),
            actual: 4
        })
    );

    let matched = Match::repetition(&digits, vec![one.clone(), one]).expect("within bounds");
    assert_eq!(matched.to_string(), "11");
    assert_eq!(matched.length(), 2);

    let empty = Match::repetition(&digit().any(), Vec::new()).expect("zero is allowed");
    assert_eq!(empty.length(), 0);
    assert_eq!(empty.to_string(), "");
}

#[test]
fn alternation_takes_one_of_its_alternatives() {
    let choice = Pattern::literal("yes") | "no";
    let no = text(&Pattern::literal("no"), "no");

    let matched = Match::alternation(&choice, no.clone()).expect("an alternative");
    assert_eq!(matched.values(), &[no][..]);
    assert_eq!(matched.to_string(), "no");
    assert_eq!(matched.length(), 2);

    let maybe = text(&Pattern::literal("maybe"), "maybe");
    assert_eq!(
        Match::alternation(&choice, maybe),
        Err(MatchError::NotAnAlternative)
    );
}

#[test]
fn equality_ignores_location_but_keys_do_not() {
    let pattern = Pattern::literal("x");
    let a = text(&pattern, "x").with_location(0..1);
    let b = text(&pattern, "x").with_location(5..6);
    let c = a.clone();

    assert_eq!(a.location(), Some(0..1));
    assert_eq!(a, b);
    assert!(a.key() != b.key());
    assert_eq!(a.key(), c.key());

    let matches: HashSet<Match> = [a.clone(), b.clone()].into_iter().collect();
    assert_eq!(matches.len(), 1);

    let keys: HashSet<MatchKey<'_>> = [a.key(), b.key(), c.key()].into_iter().collect();
    assert_eq!(keys.len(), 2);
}

#[test]
fn nested_locations_take_part_in_keys() {
    let pattern = Pattern::literal("a") + "b";
    let elements = pattern.elements();
    let build = |offset: usize| {
        Match::concatenation(
            &pattern,
            vec![
                text(&elements[0], "a").with_location(offset..offset + 1),
                text(&elements[1], "b").with_location(offset + 1..offset + 2),
            ],
        )
        .expect("arity matches")
    };

    let first = build(0);
    let second = build(10);
    assert_eq!(first, second);
    assert!(first.key() != second.key());
}

#[test]
fn latches_and_recursions_are_looked_through() {
    let latch = Pattern::latch("kw", "if");
    let matched = text(&latch, "if");
    assert_eq!(matched.pattern().kind(), PatternKind::Latch);

    let unbound = Placeholder::new().pattern();
    assert_eq!(
        Match::text(&unbound, "x"),
        Err(MatchError::NotMatchable)
    );
}
