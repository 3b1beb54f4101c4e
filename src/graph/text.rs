//! Text build format: a script table and a tab-separated arc table.
//!
//! Arc lines are `from to in_word out_word`. A line holding only a node
//! number declares that node final.

use std::collections::HashMap;

use crate::graph::arc::{ArcId, ArcToken};
use crate::graph::arena::ArcArena;
use crate::graph::error::GraphError;
use crate::graph::SemanticGraph;
use crate::options::{GraphOptions, MAX_NUM_SLOTS};
use crate::wordmap::{EPSILON_LABEL, Vocabulary, WordId, WordMap};

const EPSILON_WORD: &str = "eps";
const SCRIPT_PREFIX: char = '_';

#[derive(Debug, Clone, Copy)]
enum ArcLine<'a> {
    Arc {
        from: u32,
        to: u32,
        in_word: &'a str,
        out_word: &'a str,
    },
    Final {
        node: u32,
    },
}

impl ArcLine<'_> {
    fn source(&self) -> u32 {
        match self {
            Self::Arc { from, .. } => *from,
            Self::Final { node } => *node,
        }
    }
}

pub(crate) fn build<V>(
    vocab: &V,
    script_text: &str,
    arc_text: &str,
    options: GraphOptions,
) -> Result<SemanticGraph, GraphError>
where
    V: Vocabulary + ?Sized,
{
    // Pass one: size the tables and check every line parses.
    let mut scripts = WordMap::new();
    for script in script_text.lines() {
        scripts.add_word(script)?;
    }
    scripts.set_base();

    let mut scope_labels = WordMap::new();
    let mut lines = Vec::new();
    for (line_index, raw) in arc_text.lines().enumerate() {
        let line_number = line_index + 1;
        let Some(line) = parse_line(raw, line_number)? else {
            continue;
        };
        if let ArcLine::Arc { out_word, .. } = line {
            if is_scope_label(out_word) && scope_labels.find_index(out_word).is_none() {
                scope_labels.add_word(out_word)?;
            }
        }
        lines.push((line_number, line));
    }
    scope_labels.set_base();

    let mut graph = SemanticGraph {
        arena: ArcArena::with_reserve(Vec::new(), 0),
        insertion_start: ArcId::new(0),
        slot_heads: [ArcId::NONE; MAX_NUM_SLOTS],
        scope_labels,
        scripts,
        options,
    };

    // Pass two: resolve labels, then thread sibling and successor links.
    let mut leaving: HashMap<u32, Vec<ArcId>> = HashMap::new();
    let mut arcs: Vec<ArcToken> = Vec::with_capacity(lines.len());
    for (line_number, line) in &lines {
        let token = match *line {
            ArcLine::Arc {
                in_word, out_word, ..
            } => ArcToken {
                ilabel: resolve_input(vocab, in_word, *line_number)?,
                olabel: resolve_output(&graph, vocab, out_word, *line_number)?,
                first_next_arc: ArcId::NONE,
                next_token: ArcId::NONE,
            },
            ArcLine::Final { .. } => ArcToken::final_marker(),
        };
        let id = ArcId::from_index(arcs.len());
        let siblings = leaving.entry(line.source()).or_default();
        // A final marker heads its node's list wherever its line sits.
        if matches!(line, ArcLine::Final { .. }) {
            siblings.insert(0, id);
        } else {
            siblings.push(id);
        }
        arcs.push(token);
    }
    for siblings in leaving.values() {
        for pair in siblings.windows(2) {
            if let Some(arc) = pair[0].index().and_then(|index| arcs.get_mut(index)) {
                arc.next_token = pair[1];
            }
        }
    }
    for ((_, line), arc) in lines.iter().zip(arcs.iter_mut()) {
        if let ArcLine::Arc { to, .. } = line {
            arc.first_next_arc = leaving
                .get(to)
                .and_then(|siblings| siblings.first().copied())
                .unwrap_or(ArcId::NONE);
        }
    }

    let static_arcs = arcs.len();
    if static_arcs + options.arc_reserve > options.max_arcs {
        return Err(GraphError::OutOfMemory {
            required: static_arcs + options.arc_reserve,
            limit: options.max_arcs,
        });
    }
    graph.insertion_start = ArcId::from_index(static_arcs);
    graph.arena = ArcArena::with_reserve(arcs, options.arc_reserve);
    Ok(graph)
}

fn parse_line(raw: &str, line: usize) -> Result<Option<ArcLine<'_>>, GraphError> {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let malformed = || GraphError::MalformedArcLine {
        line,
        text: raw.to_string(),
    };
    let node = |field: &&str| field.parse::<u32>().map_err(|_| malformed());
    match fields.as_slice() {
        [] => Ok(None),
        [final_node] => Ok(Some(ArcLine::Final {
            node: node(final_node)?,
        })),
        [from, to, in_word, out_word] => Ok(Some(ArcLine::Arc {
            from: node(from)?,
            to: node(to)?,
            in_word: *in_word,
            out_word: *out_word,
        })),
        _ => Err(malformed()),
    }
}

fn is_scope_label(word: &str) -> bool {
    word.len() > 1 && (word.ends_with('{') || word.ends_with('}'))
}

fn resolve_input<V>(vocab: &V, word: &str, line: usize) -> Result<WordId, GraphError>
where
    V: Vocabulary + ?Sized,
{
    if word == EPSILON_WORD {
        return Ok(EPSILON_LABEL);
    }
    vocab
        .find_index(word)
        .ok_or_else(|| GraphError::UnknownInputWord {
            line,
            word: word.to_string(),
        })
}

fn resolve_output<V>(
    graph: &SemanticGraph,
    vocab: &V,
    word: &str,
    line: usize,
) -> Result<WordId, GraphError>
where
    V: Vocabulary + ?Sized,
{
    if word == EPSILON_WORD {
        return Ok(EPSILON_LABEL);
    }
    if is_scope_label(word) {
        let index = graph
            .scope_labels
            .find_index(word)
            .ok_or_else(|| GraphError::MalformedArcLine {
                line,
                text: word.to_string(),
            })?;
        return graph.scope_label(index);
    }
    if let Some(digits) = word.strip_prefix(SCRIPT_PREFIX) {
        if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
            let count = graph.scripts.len();
            let index = digits.parse::<usize>().unwrap_or(usize::MAX);
            if index >= count {
                return Err(GraphError::ScriptOutOfRange { line, index, count });
            }
            // `count` fits a WordId because the script table refuses more.
            return graph.script_label(index as WordId);
        }
    }
    let word_limit = graph
        .options
        .script_olabel_offset
        .min(graph.options.scope_olabel_offset);
    match vocab.find_index(word) {
        Some(id) if id < word_limit => Ok(id),
        Some(_) => Err(GraphError::LabelOverflow {
            label: word.to_string(),
            range: "word",
        }),
        None => {
            tracing::warn!(line, word, "output word not in vocabulary; using epsilon");
            Ok(EPSILON_LABEL)
        }
    }
}
