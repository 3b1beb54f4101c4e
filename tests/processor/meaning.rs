use pretty_assertions::assert_eq;
use semproc::{ProcessorOptions, SemanticProcessor, SemanticResult};

use crate::fixtures::{self, PLEASE};

fn interpret(options: ProcessorOptions, script: &str) -> SemanticResult {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, script);
    SemanticProcessor::new(options)
        .check_parse(&graph, &vocab, "please")
        .expect("interpretation")
        .expect("accepted")
}

#[test]
fn root_rule_meaning_is_promoted() {
    let result = interpret(ProcessorOptions::default(), "meaning='book a flight';x='1';");
    assert_eq!(result.get("req.meaning"), Some("book a flight"));
    assert_eq!(result.get("meaning"), Some("book a flight"));
}

#[test]
fn root_values_are_joined_in_assignment_order() {
    let result = interpret(ProcessorOptions::default(), "b='second';a='first';");
    assert_eq!(result.get("meaning"), Some("second first"));
    assert_eq!(result.keys().last(), Some("meaning"));
}

#[test]
fn word_id_input_contributes_a_prefix_of_long_values() {
    let long = "abcdefghijklmnopqrstuvwxyz0123456789";
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, &format!("v='{long}';"));
    let result = SemanticProcessor::default()
        .check_parse_by_word_id(&graph, &vocab, &[PLEASE])
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(result.get("meaning"), Some(&long[..32]));
}

#[test]
fn transcription_input_joins_whole_values() {
    let long = "abcdefghijklmnopqrstuvwxyz0123456789";
    let result = interpret(ProcessorOptions::default(), &format!("v='{long}';w='x';"));
    assert_eq!(result.get("meaning"), Some(format!("{long} x").as_str()));
}

#[test]
fn joined_meaning_stops_at_value_limit() {
    let options = ProcessorOptions {
        max_value_len: 8,
        ..ProcessorOptions::default()
    };
    let result = interpret(options, "a='abcd';b='ef';c='gh';");
    assert_eq!(result.get("meaning"), Some("abcd ef"));
}

#[test]
fn path_without_scripts_has_no_meaning() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, ";");
    let result = SemanticProcessor::default()
        .check_parse(&graph, &vocab, "please")
        .expect("interpretation")
        .expect("accepted");
    assert!(result.is_empty());
}
