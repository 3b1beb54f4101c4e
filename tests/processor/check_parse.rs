use pretty_assertions::assert_eq;
use semproc::matcher::MatchError;
use semproc::script::{ScriptError, UNDEFINED};
use semproc::{ProcessorOptions, SemanticError, SemanticProcessor, SemanticResult};

use crate::fixtures::{self, BOSTON, FLY, ON, TO, UNITED};

fn entries(result: &SemanticResult) -> Vec<(&str, &str)> {
    result.iter().collect()
}

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

#[test]
fn slot_values_flow_into_the_enclosing_rule() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::default();

    let result = processor
        .check_parse(&graph, &vocab, "fly to boston")
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(
        entries(&result),
        vec![
            ("city.code", "BOS"),
            ("trip.dest", "BOS"),
            ("meaning", "BOS"),
        ]
    );
}

#[test]
fn optional_tail_adds_its_values() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::default();

    let result = processor
        .check_parse_by_word_id(&graph, &vocab, &[FLY, TO, BOSTON, ON, UNITED])
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(result.get("trip.dest"), Some("BOS"));
    assert_eq!(result.get("trip.carrier"), Some("UA"));
    assert_eq!(result.get("airline.name"), Some("UA"));
    assert_eq!(result.get("meaning"), Some("BOS UA"));
    assert_eq!(result.len(), 5);
}

#[test]
fn rejected_input_has_no_result() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::default();

    for text in ["fly to boston please", "fly to paris", "boston"] {
        let outcome = processor
            .check_parse(&graph, &vocab, text)
            .expect("interpretation");
        assert_eq!(outcome, None, "`{text}` should be rejected");
    }
}

#[test]
fn repeated_calls_are_independent() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::default();

    let first = processor
        .check_parse(&graph, &vocab, "fly to denver on united")
        .expect("interpretation")
        .expect("accepted");
    let short = processor
        .check_parse(&graph, &vocab, "fly to boston")
        .expect("interpretation")
        .expect("accepted");
    assert!(!short.contains_key("trip.carrier"));

    let again = processor
        .check_parse(&graph, &vocab, "fly to denver on united")
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(again, first);
}

#[test]
fn graph_reset_drops_slot_words() {
    let vocab = fixtures::vocabulary();
    let mut graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::default();
    graph.reset();

    let err = processor
        .check_parse(&graph, &vocab, "fly to boston")
        .unwrap_err();
    assert!(matches!(
        err,
        SemanticError::Match(MatchError::SlotWordMissing {
            slot: 1,
            word: BOSTON
        })
    ));
}

// ---------------------------------------------------------------------------
// Parameters and functions
// ---------------------------------------------------------------------------

#[test]
fn params_answer_unassigned_names_until_flushed() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, "from=origin;");
    let mut processor = SemanticProcessor::default();
    processor.set_param("origin", "SFO").expect("room");

    let result = processor
        .check_parse(&graph, &vocab, "please")
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(result.get("req.from"), Some("SFO"));
    assert!(!result.contains_key("origin"));

    processor.flush();
    let result = processor
        .check_parse(&graph, &vocab, "please")
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(result.get("req.from"), Some(UNDEFINED));
}

#[test]
fn registered_functions_are_available_to_scripts() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, "shout=upper('go');");
    let mut processor = SemanticProcessor::default();
    processor
        .registry_mut()
        .register("upper", |args: &[&str], out: &mut String| {
            out.extend(args.iter().map(|arg| arg.to_uppercase()));
            Ok(())
        });

    let result = processor
        .check_parse(&graph, &vocab, "please")
        .expect("interpretation")
        .expect("accepted");
    assert_eq!(result.get("req.shout"), Some("GO"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn script_errors_surface_with_their_code() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::request_graph(&vocab, "x=;");
    let mut processor = SemanticProcessor::default();

    let err = processor.check_parse(&graph, &vocab, "please").unwrap_err();
    assert!(matches!(
        err,
        SemanticError::Script(ScriptError::InvalidState { .. })
    ));
    assert_eq!(err.code(), "script.invalid_state");
}

#[test]
fn pool_exhaustion_surfaces_as_match_error() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::new(ProcessorOptions {
        max_partial_paths: 4,
        ..ProcessorOptions::default()
    });

    let err = processor
        .check_parse(&graph, &vocab, "fly to boston")
        .unwrap_err();
    assert_eq!(err.code(), "match.pool_exhausted");
    assert_eq!(processor.matcher().pool().available(), 4);
}

#[test]
fn long_program_reports_required_size() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let mut processor = SemanticProcessor::new(ProcessorOptions {
        max_script_len: 8,
        ..ProcessorOptions::default()
    });

    let err = processor
        .check_parse(&graph, &vocab, "fly to boston")
        .unwrap_err();
    assert_eq!(err.code(), "match.buffer_overflow");
    assert_eq!(err.required_len(), Some("city.code='BOS';trip.dest=city.code;".len()));
}
