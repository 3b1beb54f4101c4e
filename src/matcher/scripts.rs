//! Script collection along a matched path and rewrite into one program.

use crate::graph::{LabelKind, SemanticGraph};
use crate::matcher::error::MatchError;
use crate::matcher::search::MatchedPath;
use crate::script::lexer::{is_operator, is_quote};
use crate::wordmap::Vocabulary;

const BEGIN_SCOPE_MARKER: char = '{';
const END_SCOPE_MARKER: char = '}';

/// Scope of a collected script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeTag<'g> {
    /// Still inside the scope opened at this depth.
    Open(usize),
    /// Closed by the named rule.
    Rule(&'g str),
}

/// One script expression found on the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptEntry<'g> {
    pub expression: &'g str,
    pub scope: ScopeTag<'g>,
}

/// Output of [`rewrite_scripts`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewrittenProgram {
    pub program: String,
    /// Rule of the last rewritten entry, which is the outermost one.
    pub root_rule: Option<String>,
}

/// Collects script labels on `path`, tagging each with the rule that
/// encloses it.
pub fn accumulate_scripts<'g>(
    graph: &'g SemanticGraph,
    path: &MatchedPath,
    max_scripts: usize,
) -> Result<Vec<ScriptEntry<'g>>, MatchError> {
    let mut entries: Vec<ScriptEntry<'g>> = Vec::new();
    let mut depth = 0usize;
    for arc in path.arcs().iter().filter_map(|id| graph.arc(*id)) {
        match graph.label_kind(arc.olabel) {
            LabelKind::Scope(index) => {
                let Some(label) = graph.scope_labels().word(index) else {
                    continue;
                };
                if label.ends_with(BEGIN_SCOPE_MARKER) {
                    depth += 1;
                } else if let Some(rule) = label.strip_suffix(END_SCOPE_MARKER) {
                    if depth == 0 {
                        tracing::error!(label, "scope closed at depth zero");
                        return Err(MatchError::ScopeUnderflow {
                            label: label.to_string(),
                        });
                    }
                    for entry in &mut entries {
                        if entry.scope == ScopeTag::Open(depth) {
                            entry.scope = ScopeTag::Rule(rule);
                        }
                    }
                    depth -= 1;
                }
            }
            LabelKind::Script(index) => {
                let Some(expression) = graph.scripts().word(index) else {
                    continue;
                };
                if entries.len() >= max_scripts {
                    return Err(MatchError::TooManyScripts { limit: max_scripts });
                }
                entries.push(ScriptEntry {
                    expression,
                    scope: ScopeTag::Open(depth),
                });
            }
            LabelKind::Epsilon | LabelKind::Word(_) | LabelKind::Final => {}
        }
    }
    Ok(entries)
}

/// Qualifies every local identifier with its rule name and joins all
/// scoped entries into one `;`-terminated program.
///
/// `city` scoped to rule `trip` with `v='BOS';code=v;` becomes
/// `trip.v='BOS';trip.code=trip.v;`. Entries whose scope never closed and
/// bare `;` expressions are dropped.
pub fn rewrite_scripts(
    entries: &[ScriptEntry<'_>],
    max_script_len: usize,
) -> Result<RewrittenProgram, MatchError> {
    let mut program = String::new();
    let mut root_rule = None;
    for entry in entries {
        let ScopeTag::Rule(rule) = entry.scope else {
            continue;
        };
        if entry.expression == ";" {
            continue;
        }
        root_rule = Some(rule);
        let mut rest = skip_separators(entry.expression);
        if rest.is_empty() {
            continue;
        }
        loop {
            push_qualifier(&mut program, rule);
            let lhs_end = rest.find(['=', ';']).unwrap_or(rest.len());
            program.push_str(rest[..lhs_end].trim_end());
            rest = &rest[lhs_end..];
            while !rest.is_empty() && !rest.starts_with(';') {
                let len = next_token_len(rest);
                let token = &rest[..len];
                if is_local_identifier(token) {
                    push_qualifier(&mut program, rule);
                }
                program.push_str(token);
                rest = &rest[len..];
            }
            program.push(';');
            rest = skip_separators(rest);
            if rest.is_empty() {
                break;
            }
        }
    }
    if program.len() > max_script_len {
        return Err(MatchError::ProgramOverflow {
            required: program.len(),
            limit: max_script_len,
        });
    }
    Ok(RewrittenProgram {
        program,
        root_rule: root_rule.map(str::to_string),
    })
}

fn push_qualifier(program: &mut String, rule: &str) {
    program.push_str(rule);
    program.push('.');
}

fn skip_separators(text: &str) -> &str {
    text.trim_start_matches(|ch: char| ch == ';' || ch.is_whitespace())
}

// Token lengths as the rewrite sees them: an identifier run keeps a trailing
// `(` so function names are never qualified.
fn next_token_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return 0;
    };
    if is_operator(first) || first == ';' {
        return first.len_utf8();
    }
    if first.is_whitespace() {
        return text
            .find(|ch: char| !ch.is_whitespace())
            .unwrap_or(text.len());
    }
    if is_quote(first) {
        let mut escaped = false;
        for (at, ch) in chars {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == first {
                return at + ch.len_utf8();
            }
        }
        return text.len();
    }
    for (at, ch) in text.char_indices() {
        if ch == '(' {
            return at + 1;
        }
        if is_operator(ch) || ch == ';' || ch.is_whitespace() || is_quote(ch) {
            return at;
        }
    }
    text.len()
}

fn is_local_identifier(token: &str) -> bool {
    let Some(first) = token.chars().next() else {
        return false;
    };
    !is_operator(first)
        && first != ';'
        && !is_quote(first)
        && !first.is_whitespace()
        && !token.contains(['.', '('])
}
