//! Resource guardrails and layout constants for graphs and interpretation.

/// Number of dynamic vocabulary slots addressable by a graph.
pub const MAX_NUM_SLOTS: usize = 12;

/// Layout and growth parameters for a [`crate::graph::SemanticGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphOptions {
    /// First output label addressing the script table.
    pub script_olabel_offset: u16,
    /// First output label addressing the scope-label table.
    pub scope_olabel_offset: u16,
    /// Free arcs appended after the static arcs on load and reset.
    pub arc_reserve: usize,
    /// Arena growth, in percent of the current length.
    pub growth_percent: usize,
    /// Minimum number of arcs added by one growth step.
    pub min_growth: usize,
    /// Hard arena limit; the image format stores a 16-bit arc count.
    pub max_arcs: usize,
    /// Separator placed between literals when two scripts are merged.
    pub join_char: char,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            script_olabel_offset: 30_000,
            scope_olabel_offset: 60_000,
            arc_reserve: 64,
            growth_percent: 120,
            min_growth: 32,
            max_arcs: (u16::MAX - 1) as usize,
            join_char: '#',
        }
    }
}

/// Bounds for path search and expression evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessorOptions {
    /// Capacity of the partial-path pool used by one search.
    pub max_partial_paths: usize,
    /// Maximum scripts collected along one matched path.
    pub max_scripts: usize,
    /// Maximum length of the rewritten program.
    pub max_script_len: usize,
    /// Maximum length of a single token inside a statement.
    pub max_statement_len: usize,
    /// Maximum operands in one statement.
    pub max_identifiers: usize,
    /// Capacity of the regular symbol table.
    pub max_symbols: usize,
    /// Capacity of the special (pre-seeded) symbol table.
    pub max_special_symbols: usize,
    /// Maximum symbol key length.
    pub max_key_len: usize,
    /// Maximum symbol value length, also the built-in result bound.
    pub max_value_len: usize,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            max_partial_paths: 512,
            max_scripts: 512,
            max_script_len: 8_192,
            max_statement_len: 512,
            max_identifiers: 16,
            max_symbols: 128,
            max_special_symbols: 16,
            max_key_len: 350,
            max_value_len: 512,
        }
    }
}
