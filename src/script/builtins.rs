//! Built-in functions and the registry the parser resolves names through.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::script::error::ScriptError;

/// Signature of a registered function: operands in, result appended to the
/// buffer.
pub type ScriptFunction = Arc<dyn Fn(&[&str], &mut String) -> Result<(), ScriptError> + Send + Sync>;

/// Name-keyed function table.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, ScriptFunction>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Creates a registry holding `concat`, `conditional`, `add` and `sub`,
    /// each bounding its result to `max_value_len` bytes.
    pub fn with_builtins(max_value_len: usize) -> Self {
        let mut registry = Self::empty();
        registry.register("concat", move |args, out| concat(args, out, max_value_len));
        registry.register("conditional", move |args, out| {
            conditional(args, out, max_value_len)
        });
        registry.register("add", move |args, out| add(args, out, max_value_len));
        registry.register("sub", move |args, out| sub(args, out, max_value_len));
        registry
    }

    /// Adds or replaces `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[&str], &mut String) -> Result<(), ScriptError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<ScriptFunction> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn push_bounded(out: &mut String, text: &str, limit: usize) -> Result<(), ScriptError> {
    let required = out.len() + text.len();
    if required > limit {
        return Err(ScriptError::overflow("function result", required, limit));
    }
    out.push_str(text);
    Ok(())
}

/// Appends every operand in order.
pub fn concat(args: &[&str], out: &mut String, limit: usize) -> Result<(), ScriptError> {
    for arg in args {
        push_bounded(out, arg, limit)?;
    }
    Ok(())
}

/// `cond ? a : b`. Any condition other than `false`, `undefined` or empty
/// selects `a`.
pub fn conditional(args: &[&str], out: &mut String, limit: usize) -> Result<(), ScriptError> {
    let [condition, when_true, when_false] = args else {
        return Err(ScriptError::WrongArity {
            function: "conditional",
            expected: 3,
            found: args.len(),
        });
    };
    let holds = !matches!(*condition, "" | "false" | "undefined");
    push_bounded(out, if holds { when_true } else { when_false }, limit)
}

pub fn add(args: &[&str], out: &mut String, limit: usize) -> Result<(), ScriptError> {
    let sum = args
        .iter()
        .fold(0i64, |sum, arg| sum.wrapping_add(parse_int(arg)));
    push_bounded(out, &sum.to_string(), limit)
}

/// First operand minus all the others.
pub fn sub(args: &[&str], out: &mut String, limit: usize) -> Result<(), ScriptError> {
    let difference = match args.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(parse_int(first), |acc, arg| acc.wrapping_sub(parse_int(arg))),
        None => 0,
    };
    push_bounded(out, &difference.to_string(), limit)
}

/// Leading whitespace, an optional sign, then digits up to the first
/// non-digit. Text without digits reads as `0`.
pub fn parse_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
        });
    if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}
