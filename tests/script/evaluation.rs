use pretty_assertions::assert_eq;
use semproc::ProcessorOptions;
use semproc::script::{
    ExpressionParser, FunctionRegistry, ParserState, ScriptError, SymbolTable, UNDEFINED,
};

fn evaluate_with(
    options: ProcessorOptions,
    registry: &FunctionRegistry,
    program: &str,
) -> (Result<(), ScriptError>, Vec<(String, String)>) {
    let mut symbols = SymbolTable::new(&options);
    let outcome = ExpressionParser::new(&options).parse(program, &mut symbols, registry);
    let values = symbols
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    (outcome, values)
}

fn evaluate(program: &str) -> Vec<(String, String)> {
    let options = ProcessorOptions::default();
    let registry = FunctionRegistry::with_builtins(options.max_value_len);
    let (outcome, values) = evaluate_with(options, &registry, program);
    outcome.expect("program evaluates");
    values
}

fn failure(program: &str) -> ScriptError {
    let options = ProcessorOptions::default();
    let registry = FunctionRegistry::with_builtins(options.max_value_len);
    evaluate_with(options, &registry, program)
        .0
        .expect_err("program fails")
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[test]
fn identifiers_copy_earlier_values() {
    assert_eq!(evaluate("x='5';y=x;"), pairs(&[("x", "5"), ("y", "5")]));
}

#[test]
fn reassignment_keeps_first_position() {
    assert_eq!(
        evaluate("a='1';b='2';a='3';"),
        pairs(&[("a", "3"), ("b", "2")])
    );
}

#[test]
fn separators_alone_assign_nothing() {
    assert_eq!(evaluate(";;;;"), Vec::new());
    assert_eq!(evaluate(""), Vec::new());
}

#[test]
fn unknown_identifier_reads_undefined() {
    assert_eq!(evaluate("r=missing;"), pairs(&[("r", UNDEFINED)]));
}

#[test]
fn whitespace_between_tokens_is_ignored() {
    assert_eq!(
        evaluate(" trip.to = 'BOS' ;\n trip.fare = add( '1' , '2' ) ; "),
        pairs(&[("trip.to", "BOS"), ("trip.fare", "3")])
    );
}

#[test]
fn double_quoted_literals_unescape() {
    assert_eq!(evaluate(r#"q="say \"hi\"";"#), pairs(&[("q", r#"say "hi""#)]));
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

#[test]
fn builtins_compute_values() {
    assert_eq!(
        evaluate("c=concat('a','b');n=add('2','3');d=sub('10','3','2');"),
        pairs(&[("c", "ab"), ("n", "5"), ("d", "5")])
    );
}

#[test]
fn arithmetic_reads_leading_digits() {
    assert_eq!(
        evaluate("n=add(' 7abc','-2','x');"),
        pairs(&[("n", "5")])
    );
}

#[test]
fn conditional_operator_tests_truthiness() {
    assert_eq!(
        evaluate("f='false';a=f?'yes':'no';b='1'?'yes':'no';"),
        pairs(&[("f", "false"), ("a", "no"), ("b", "yes")])
    );
}

#[test]
fn unknown_function_yields_undefined() {
    assert_eq!(evaluate("r=shout('x');"), pairs(&[("r", UNDEFINED)]));
}

#[test]
fn registered_function_is_callable() {
    let options = ProcessorOptions::default();
    let mut registry = FunctionRegistry::empty();
    registry.register("upper", |args: &[&str], out: &mut String| {
        for arg in args {
            out.push_str(&arg.to_uppercase());
        }
        Ok(())
    });
    assert!(registry.contains("upper"));
    assert!(!registry.contains("concat"));

    let (outcome, values) = evaluate_with(options, &registry, "r=upper('bos','x');");
    assert_eq!(outcome, Ok(()));
    assert_eq!(values, pairs(&[("r", "BOSX")]));
}

#[test]
fn conditional_call_needs_three_operands() {
    assert_eq!(
        failure("r=conditional('a','b');"),
        ScriptError::WrongArity {
            function: "conditional",
            expected: 3,
            found: 2
        }
    );
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn statements_before_an_error_are_kept() {
    let options = ProcessorOptions::default();
    let registry = FunctionRegistry::with_builtins(options.max_value_len);
    let (outcome, values) = evaluate_with(options, &registry, "a='1';b=;");
    assert!(matches!(
        outcome,
        Err(ScriptError::InvalidState {
            state: ParserState::IdentifierRequired,
            ..
        })
    ));
    assert_eq!(values, pairs(&[("a", "1")]));
}

#[test]
fn mixed_operators_are_rejected() {
    let err = failure("r=a+b?c:d;");
    assert!(matches!(err, ScriptError::InvalidState { ref token, .. } if token == "?"));
    assert_eq!(err.code(), "script.invalid_state");
}

#[test]
fn lexical_errors_carry_context() {
    assert!(matches!(
        failure("x='abc;"),
        ScriptError::UnterminatedLiteral { .. }
    ));
    assert!(matches!(
        failure("x=@;"),
        ScriptError::UnexpectedChar { ch: '@', .. }
    ));
}

#[test]
fn operand_limit_is_enforced() {
    let options = ProcessorOptions {
        max_identifiers: 2,
        ..ProcessorOptions::default()
    };
    let registry = FunctionRegistry::with_builtins(options.max_value_len);
    let (outcome, _) = evaluate_with(options, &registry, "r=concat('a','b','c');");
    assert_eq!(
        outcome,
        Err(ScriptError::BufferOverflow {
            what: "statement operands",
            required: 3,
            limit: 2
        })
    );
}

#[test]
fn function_result_limit_is_enforced() {
    let options = ProcessorOptions {
        max_value_len: 4,
        ..ProcessorOptions::default()
    };
    let registry = FunctionRegistry::with_builtins(options.max_value_len);
    let (outcome, _) = evaluate_with(options, &registry, "r=concat('abc','de');");
    assert_eq!(
        outcome,
        Err(ScriptError::BufferOverflow {
            what: "function result",
            required: 5,
            limit: 4
        })
    );
}

#[test]
fn same_program_gives_same_values() {
    let program = "a='x';b=a+'y';c=b?a:'z';";
    assert_eq!(evaluate(program), evaluate(program));
}
