//! Match, collect, rewrite and evaluate in one call.

mod result;

pub use result::SemanticResult;

use crate::error::SemanticError;
use crate::graph::SemanticGraph;
use crate::matcher::{MatchOutcome, PathMatcher, accumulate_scripts, rewrite_scripts};
use crate::options::ProcessorOptions;
use crate::script::{ExpressionParser, FunctionRegistry, SymbolTable};
use crate::wordmap::{Vocabulary, WordId};

const MEANING_KEY: &str = "meaning";
// Cap on each value's share of a meaning synthesized for word-ID input.
const MEANING_PART_CHARS: usize = 32;

/// Interprets recognized word sequences against a semantic graph.
///
/// Owns the path pool, the symbol table and the function registry. Values
/// set with [`SemanticProcessor::set_param`] persist across calls until
/// [`SemanticProcessor::flush`].
#[derive(Debug, Clone)]
pub struct SemanticProcessor {
    options: ProcessorOptions,
    matcher: PathMatcher,
    parser: ExpressionParser,
    symbols: SymbolTable,
    registry: FunctionRegistry,
}

impl Default for SemanticProcessor {
    fn default() -> Self {
        Self::new(ProcessorOptions::default())
    }
}

impl SemanticProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self {
            matcher: PathMatcher::new(&options),
            parser: ExpressionParser::new(&options),
            symbols: SymbolTable::new(&options),
            registry: FunctionRegistry::with_builtins(options.max_value_len),
            options,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Registry used to resolve function names; register extra functions
    /// here.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Interprets a space-separated transcription. `Ok(None)` means the
    /// graph does not accept it.
    pub fn check_parse<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        transcription: &str,
    ) -> Result<Option<SemanticResult>, SemanticError>
    where
        V: Vocabulary + ?Sized,
    {
        let outcome = self
            .matcher
            .match_transcription(graph, vocab, transcription)?;
        self.interpret(graph, outcome, usize::MAX)
    }

    /// Interprets word IDs, stopping at the first
    /// [`crate::wordmap::MAX_WORD_ID`].
    pub fn check_parse_by_word_id<V>(
        &mut self,
        graph: &SemanticGraph,
        vocab: &V,
        word_ids: &[WordId],
    ) -> Result<Option<SemanticResult>, SemanticError>
    where
        V: Vocabulary + ?Sized,
    {
        let outcome = self.matcher.match_word_ids(graph, vocab, word_ids)?;
        self.interpret(graph, outcome, MEANING_PART_CHARS)
    }

    /// Seeds a special symbol consulted when a program reads an unassigned
    /// name.
    pub fn set_param(&mut self, key: &str, value: &str) -> Result<(), SemanticError> {
        self.symbols.put_special(key, value)?;
        Ok(())
    }

    /// Drops every symbol, special ones included.
    pub fn flush(&mut self) {
        self.symbols.reset_all();
    }

    fn interpret(
        &mut self,
        graph: &SemanticGraph,
        outcome: MatchOutcome,
        part_chars: usize,
    ) -> Result<Option<SemanticResult>, SemanticError> {
        let MatchOutcome::Matched(path) = outcome else {
            return Ok(None);
        };
        let entries = accumulate_scripts(graph, &path, self.options.max_scripts)?;
        let rewritten = rewrite_scripts(&entries, self.options.max_script_len)?;
        tracing::debug!(
            arcs = path.len(),
            scripts = entries.len(),
            program = %rewritten.program,
            "interpreting matched path"
        );

        self.symbols.reset();
        self.parser
            .parse(&rewritten.program, &mut self.symbols, &self.registry)?;
        let mut result = SemanticResult::from_pairs(self.symbols.iter());
        if let Some(root) = rewritten.root_rule.as_deref() {
            self.fill_in_meaning(&mut result, root, part_chars);
        }
        Ok(Some(result))
    }

    // Provides a top-level `meaning`: the root rule's own meaning if it set
    // one, otherwise the root rule's values joined by spaces, each cut to
    // `part_chars`.
    fn fill_in_meaning(&self, result: &mut SemanticResult, root: &str, part_chars: usize) {
        if result.contains_key(MEANING_KEY) {
            return;
        }
        let qualified = format!("{root}.{MEANING_KEY}");
        if let Some(meaning) = result.get(&qualified).map(str::to_string) {
            result.insert(MEANING_KEY, &meaning);
            return;
        }

        let prefix = format!("{root}.");
        let limit = self.options.max_value_len;
        let mut meaning = String::new();
        for (_, value) in result.iter().filter(|(key, _)| key.starts_with(&prefix)) {
            if !meaning.is_empty() && meaning.len() + 1 < limit {
                meaning.push(' ');
            }
            if meaning.len() + value.len() < limit {
                meaning.extend(value.chars().take(part_chars));
            }
        }
        if !meaning.is_empty() {
            result.insert(MEANING_KEY, &meaning);
        }
    }
}
