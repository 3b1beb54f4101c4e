use pretty_assertions::assert_eq;
use proptest::prelude::*;
use semproc::wordmap::WordMapError;
use semproc::{Vocabulary, WordMap};

#[test]
fn words_in_rule_are_tagged_with_slot_digit() {
    let mut map = WordMap::from_words(["eps", "__city__"]).expect("words");
    let id = map.add_word_in_rule("austin", 1).expect("room");
    assert_eq!(map.word(id), Some("austin.1"));
    assert!(map.whether_in_rule(id, 1));
}

#[test]
fn ceiling_blocks_until_reset() {
    let mut map = WordMap::from_words(["eps"]).expect("words");
    map.add_word("late").expect("room");
    map.ceiling();
    assert_eq!(
        map.add_word("later"),
        Err(WordMapError::Frozen {
            word: "later".to_string()
        })
    );
    map.reset();
    assert!(!map.is_frozen());
    assert_eq!(map.find_index("late"), None);
    assert_eq!(map.add_word("later"), Ok(1));
}

#[test]
fn inconsistent_parts_are_rejected() {
    assert_eq!(
        WordMap::from_parts(vec!["eps".to_string()], 0, 2, false),
        Err(WordMapError::InconsistentParts {
            words: 1,
            base: 2,
            slots: 0
        })
    );
}

proptest! {
    #[test]
    fn reset_restores_base_words(extra in prop::collection::vec("[a-z]{1,8}", 0..20)) {
        let base = WordMap::from_words(["eps", "__city__", "fly"]).expect("words");
        let mut map = base.clone();
        for word in &extra {
            map.add_word(word.as_str()).expect("room");
        }
        map.ceiling();
        map.reset();
        prop_assert_eq!(map, base);
    }
}
