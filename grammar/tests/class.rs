use grammar::{CharacterClass, ClassError, ClassItem, Pattern, character_class};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn lower() -> CharacterClass {
    CharacterClass::new(['a'..='z']).expect("valid class")
}

#[test]
fn includes_chars_and_ranges() {
    let class = CharacterClass::new([ClassItem::range('a', 'f'), ClassItem::Char('_')])
        .expect("valid class");
    assert!(class.includes('a'));
    assert!(class.includes('f'));
    assert!(class.includes('_'));
    assert!(!class.includes('g'));
    assert!(!CharacterClass::default().includes('a'));
}

#[test]
fn inverted_range_is_rejected() {
    assert_eq!(
        CharacterClass::new([ClassItem::range('z', 'a')]),
        Err(ClassError::InvertedRange {
            start: 'z',
            end: 'a'
        })
    );
    assert_eq!(
        lower().except([ClassItem::range('q', 'p')]),
        Err(ClassError::InvertedRange {
            start: 'q',
            end: 'p'
        })
    );
    assert!(character_class(['9'..='0']).is_err());
}

#[test]
fn except_splits_a_range_around_a_char() {
    let cut = lower().except(['m']).expect("valid cut");
    assert_eq!(
        cut.items().to_vec(),
        vec![ClassItem::range('a', 'l'), ClassItem::range('n', 'z')]
    );
    assert!(cut.includes('a'));
    assert!(cut.includes('l'));
    assert!(!cut.includes('m'));
    assert!(cut.includes('n'));
    assert!(cut.includes('z'));
    assert!(!cut.includes('`'));
    assert!(!cut.includes('{'));
}

#[test]
fn except_truncates_range_ends() {
    let cut = lower()
        .except(['a'..='c', 'x'..='z'])
        .expect("valid cut");
    assert_eq!(cut.items().to_vec(), vec![ClassItem::range('d', 'w')]);
}

#[test]
fn except_drops_covered_members() {
    let class = CharacterClass::new(['a', 'b', 'c']).expect("valid class");
    let cut = class.except(['a'..='b']).expect("valid cut");
    assert_eq!(cut.items().to_vec(), vec![ClassItem::Char('c')]);

    let emptied = lower().except(['a'..='z']).expect("valid cut");
    assert!(emptied.is_empty());
}

#[test]
fn except_steps_over_surrogates() {
    let class = CharacterClass::new(['\u{D000}'..='\u{F000}']).expect("valid class");
    let cut = class.except(['\u{E000}']).expect("valid cut");
    assert_eq!(
        cut.items().to_vec(),
        vec![
            ClassItem::range('\u{D000}', '\u{D7FF}'),
            ClassItem::range('\u{E001}', '\u{F000}'),
        ]
    );
}

#[test]
fn union_appends_members() {
    let digits = CharacterClass::new(['0'..='9']).expect("valid class");
    let ident = lower() | digits | '_';
    assert!(ident.includes('q'));
    assert!(ident.includes('5'));
    assert!(ident.includes('_'));
    assert_eq!(ident.items().len(), 3);

    let with_upper = (ident | ClassItem::range('A', 'Z')).expect("valid range");
    assert!(with_upper.includes('Q'));
    assert!((lower() | ClassItem::range('Z', 'A')).is_err());
}

#[test]
fn class_becomes_a_pattern() {
    let pattern: Pattern = lower().into();
    assert_eq!(pattern, Pattern::class(lower()));
    assert_eq!(pattern.length(), Some(1));
    assert_eq!(
        character_class(['a'..='z']).expect("valid class"),
        pattern
    );
}

proptest! {
    #[test]
    fn except_removes_exactly_the_cut(
        start in proptest::char::range('a', 'm'),
        end in proptest::char::range('n', 'z'),
        removed in proptest::char::range('a', 'z'),
        probe in proptest::char::range('a', 'z'),
    ) {
        let class = CharacterClass::new([start..=end]).expect("valid class");
        let cut = class.except([removed]).expect("valid cut");
        let expected = probe != removed && start <= probe && probe <= end;
        prop_assert_eq!(cut.includes(probe), expected);
    }
}
