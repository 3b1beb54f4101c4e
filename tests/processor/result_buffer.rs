use pretty_assertions::assert_eq;
use semproc::{SemanticError, SemanticProcessor, SemanticResult};

use crate::fixtures;

fn boston() -> SemanticResult {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    SemanticProcessor::default()
        .check_parse(&graph, &vocab, "fly to boston")
        .expect("interpretation")
        .expect("accepted")
}

#[test]
fn value_is_copied_into_a_large_enough_buffer() {
    let result = boston();
    let mut buffer = [0u8; 8];
    let written = result.read_value("trip.dest", &mut buffer).expect("fits");
    assert_eq!(&buffer[..written], b"BOS");
}

#[test]
fn empty_buffer_probes_required_length() {
    let result = boston();
    let err = result.read_value("trip.dest", &mut []).unwrap_err();
    assert!(matches!(
        err,
        SemanticError::BufferOverflow {
            required: 3,
            available: 0,
            ..
        }
    ));
    assert_eq!(err.required_len(), Some(3));

    let mut buffer = vec![0u8; 3];
    assert_eq!(result.read_value("trip.dest", &mut buffer).expect("fits"), 3);
}

#[test]
fn short_buffer_is_left_untouched() {
    let result = boston();
    let mut buffer = [b'-'; 2];
    assert!(result.read_value("trip.dest", &mut buffer).is_err());
    assert_eq!(&buffer, b"--");
}

#[test]
fn missing_key_is_reported() {
    let err = boston().read_value("trip.carrier", &mut [0u8; 4]).unwrap_err();
    assert_eq!(err.code(), "result.key_not_found");
    assert_eq!(err.to_string(), "result has no key `trip.carrier`");
}

#[test]
fn result_converts_to_map() {
    let map = boston().into_map();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("city.code").map(String::as_str), Some("BOS"));
}
