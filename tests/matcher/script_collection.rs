use pretty_assertions::assert_eq;
use semproc::matcher::{
    MatchError, MatchedPath, PathMatcher, ScopeTag, ScriptEntry, accumulate_scripts,
    rewrite_scripts,
};
use semproc::{GraphOptions, GraphSource, ProcessorOptions, SemanticGraph, WordMap};

use crate::fixtures;

fn matched(graph: &SemanticGraph, vocab: &WordMap, text: &str) -> MatchedPath {
    PathMatcher::new(&ProcessorOptions::default())
        .match_transcription(graph, vocab, text)
        .expect("search")
        .into_path()
        .expect("accepted")
}

fn small_graph(vocab: &WordMap, scripts: &str, arcs: &str) -> SemanticGraph {
    SemanticGraph::load(
        vocab,
        GraphSource::Text { scripts, arcs },
        GraphOptions::default(),
    )
    .expect("graph")
}

#[test]
fn scripts_take_the_rule_that_closes_around_them() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let path = matched(&graph, &vocab, "fly to boston on united");

    let entries = accumulate_scripts(&graph, &path, 16).expect("scripts");
    assert_eq!(
        entries,
        vec![
            ScriptEntry {
                expression: "code='BOS';",
                scope: ScopeTag::Rule("city"),
            },
            ScriptEntry {
                expression: "dest=city.code;",
                scope: ScopeTag::Rule("trip"),
            },
            ScriptEntry {
                expression: "name='UA';",
                scope: ScopeTag::Rule("airline"),
            },
            ScriptEntry {
                expression: "carrier=airline.name;",
                scope: ScopeTag::Rule("trip"),
            },
        ]
    );
}

#[test]
fn rewrite_qualifies_locals_only() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let path = matched(&graph, &vocab, "fly to boston on united");
    let entries = accumulate_scripts(&graph, &path, 16).expect("scripts");

    let rewritten = rewrite_scripts(&entries, 1024).expect("fits");
    assert_eq!(
        rewritten.program,
        "city.code='BOS';trip.dest=city.code;airline.name='UA';trip.carrier=airline.name;"
    );
    assert_eq!(rewritten.root_rule.as_deref(), Some("trip"));
}

#[test]
fn script_limit_is_enforced() {
    let vocab = fixtures::vocabulary();
    let graph = fixtures::travel_graph(&vocab);
    let path = matched(&graph, &vocab, "fly to boston");
    assert_eq!(
        accumulate_scripts(&graph, &path, 1),
        Err(MatchError::TooManyScripts { limit: 1 })
    );
}

#[test]
fn closing_scope_without_opening_is_rejected() {
    let vocab = fixtures::vocabulary();
    let graph = small_graph(&vocab, "", "0\t1\teps\ttrip}\n1\n");
    let path = matched(&graph, &vocab, "");
    assert_eq!(
        accumulate_scripts(&graph, &path, 16),
        Err(MatchError::ScopeUnderflow {
            label: "trip}".to_string()
        })
    );
}

#[test]
fn scripts_in_unclosed_scope_are_dropped() {
    let vocab = fixtures::vocabulary();
    let graph = small_graph(&vocab, "x='1';\n", "0\t1\teps\ttrip{\n1\t2\teps\t_0\n2\n");
    let path = matched(&graph, &vocab, "");

    let entries = accumulate_scripts(&graph, &path, 16).expect("scripts");
    assert_eq!(entries[0].scope, ScopeTag::Open(1));
    let rewritten = rewrite_scripts(&entries, 1024).expect("fits");
    assert!(rewritten.program.is_empty());
    assert_eq!(rewritten.root_rule, None);
}

#[test]
fn separators_only_program_is_empty() {
    let entries = [ScriptEntry {
        expression: ";;;;",
        scope: ScopeTag::Rule("root"),
    }];
    let rewritten = rewrite_scripts(&entries, 1024).expect("fits");
    assert_eq!(rewritten.program, "");
}
