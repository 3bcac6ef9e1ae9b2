use minilang::error::RuntimeError;
use minilang::{run, RunReport};
use pretty_assertions::assert_eq;

fn run_source(source: &str) -> (Vec<String>, RunReport) {
    let mut out = Vec::new();
    let report = run(source, &mut out);
    let lines = String::from_utf8(out)
        .expect("program output is utf-8")
        .lines()
        .map(str::to_owned)
        .collect();
    (lines, report)
}

/// Runs a program expected to be entirely clean and returns its printed lines.
fn printed(source: &str) -> Vec<String> {
    let (lines, report) = run_source(source);
    assert!(
        report.lex_errors.is_empty(),
        "unexpected lex errors: {:?}",
        report.lex_errors
    );
    assert!(
        report.parse_errors.is_empty(),
        "unexpected parse errors: {:?}",
        report.parse_errors
    );
    assert!(
        report.runtime_error.is_none(),
        "unexpected runtime error: {:?}",
        report.runtime_error
    );
    lines
}

fn runtime_error(source: &str) -> (Vec<String>, RuntimeError) {
    let (lines, report) = run_source(source);
    let error = report.runtime_error.expect("expected a runtime error");
    (lines, error)
}

#[test]
fn arithmetic_respects_precedence() {
    assert_eq!(printed("print 2 + 3 * 4;"), vec!["14"]);
    assert_eq!(printed("print (2 + 3) * 4;"), vec!["20"]);
    assert_eq!(printed("print 10 - 4 - 3;"), vec!["3"]);
    assert_eq!(printed("print 10 % 3;"), vec!["1"]);
}

#[test]
fn assignment_is_an_expression_and_mutates() {
    assert_eq!(printed("var x = 1; x = x + 1; print x;"), vec!["2"]);
    assert_eq!(printed("var x = 0; print x = 5;"), vec!["5"]);
}

#[test]
fn declaration_without_initializer_defaults_to_zero() {
    assert_eq!(printed("var x; print x;"), vec!["0"]);
}

#[test]
fn functions_bind_arguments_and_return_values() {
    assert_eq!(
        printed("function add(a, b) { return a + b; } print add(2, 3);"),
        vec!["5"]
    );
}

#[test]
fn falling_off_a_function_body_returns_zero() {
    assert_eq!(
        printed("function f() { print 1; } print f();"),
        vec!["1", "0"]
    );
    assert_eq!(printed("function f() { return; } print f();"), vec!["0"]);
}

#[test]
fn if_takes_the_truthy_branch() {
    assert_eq!(
        printed("if (1 < 2) { print \"yes\"; } else { print \"no\"; }"),
        vec!["yes"]
    );
    assert_eq!(
        printed("if (2 < 1) { print \"yes\"; } else { print \"no\"; }"),
        vec!["no"]
    );
}

#[test]
fn while_re_evaluates_its_condition() {
    assert_eq!(
        printed("var i = 0; while (i < 3) { print i; i = i + 1; }"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn loop_body_scope_is_fresh_each_iteration() {
    assert_eq!(
        printed("var i = 0; while (i < 3) { var j = 0; j = j + 1; print j; i = i + 1; }"),
        vec!["1", "1", "1"]
    );
}

#[test]
fn block_bindings_vanish_when_the_block_exits() {
    let (_, error) = runtime_error("{ var a = 1; } print a;");
    assert!(matches!(
        error,
        RuntimeError::UndefinedVariable { ref name, .. } if name == "a"
    ));
}

#[test]
fn assigning_from_an_inner_block_mutates_the_outer_binding() {
    assert_eq!(printed("var a = 1; { a = 2; } print a;"), vec!["2"]);
}

#[test]
fn arity_mismatch_names_the_function_and_both_counts() {
    let (_, error) = runtime_error("function f(a, b) { return a; } f(1);");
    assert!(matches!(
        error,
        RuntimeError::ArityMismatch {
            ref name,
            expected: 2,
            found: 1,
            ..
        } if name == "f"
    ));
    let (_, error) = runtime_error("function g(a) { return a; } g(1, 2, 3);");
    assert!(matches!(
        error,
        RuntimeError::ArityMismatch {
            expected: 1,
            found: 3,
            ..
        }
    ));
}

#[test]
fn calling_an_unknown_name_is_a_runtime_error() {
    let (_, error) = runtime_error("missing(1);");
    assert!(matches!(
        error,
        RuntimeError::UndefinedFunction { ref name, .. } if name == "missing"
    ));
}

#[test]
fn plus_concatenates_when_either_side_is_a_string() {
    assert_eq!(printed("print \"a\" + 1;"), vec!["a1"]);
    assert_eq!(printed("print 1 + \"a\";"), vec!["1a"]);
    assert_eq!(printed("print \"n = \" + 2.5;"), vec!["n = 2.5"]);
}

#[test]
fn plus_on_booleans_is_a_type_error() {
    let (_, error) = runtime_error("print true + 1;");
    assert!(matches!(error, RuntimeError::TypeMismatch { .. }));
}

#[test]
fn comparison_requires_numbers() {
    let (_, error) = runtime_error("print \"a\" < 1;");
    assert!(matches!(error, RuntimeError::TypeMismatch { .. }));
}

#[test]
fn unary_minus_requires_a_number() {
    let (_, error) = runtime_error("print -\"a\";");
    assert!(matches!(error, RuntimeError::TypeMismatch { .. }));
}

#[test]
fn division_and_modulo_by_zero_are_runtime_errors() {
    let (_, error) = runtime_error("print 1 / 0;");
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));
    let (_, error) = runtime_error("print 1 % 0;");
    assert!(matches!(error, RuntimeError::DivisionByZero { .. }));
}

#[test]
fn a_runtime_error_keeps_output_already_printed() {
    let (lines, error) = runtime_error("print 1; print 1 / 0; print 2;");
    assert_eq!(lines, vec!["1"]);
    assert!(matches!(error, RuntimeError::DivisionByZero { line: 1 }));
}

#[test]
fn statements_after_a_syntax_error_still_execute() {
    let (lines, report) = run_source("var = 5; print 2;");
    assert_eq!(report.parse_errors.len(), 1);
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn a_stray_character_does_not_mute_the_rest_of_the_source() {
    let (lines, report) = run_source("var x = 3; @ print x;");
    assert_eq!(report.lex_errors.len(), 1);
    assert_eq!(report.parse_errors.len(), 1);
    assert_eq!(lines, vec!["3"]);
}

#[test]
fn recursive_factorial_terminates_for_small_inputs() {
    let lines = printed(
        "function factorial(n) {\n\
         if (n <= 1) { return 1; }\n\
         return n * factorial(n - 1);\n\
         }\n\
         var i = 0;\n\
         while (i <= 10) { print factorial(i); i = i + 1; }",
    );
    assert_eq!(
        lines,
        vec![
            "1", "1", "2", "6", "24", "120", "720", "5040", "40320", "362880", "3628800"
        ]
    );
}

#[test]
fn logical_operators_short_circuit_and_return_the_operand() {
    assert_eq!(printed("print 0 || \"x\";"), vec!["x"]);
    assert_eq!(printed("print 3 || 9;"), vec!["3"]);
    assert_eq!(printed("print 1 && 2;"), vec!["2"]);
    assert_eq!(printed("print \"\" && 5;"), vec![""]);
    // the right side must not run when the left decides
    assert_eq!(
        printed("function boom() { print \"ran\"; return 1; } print 0 && boom(); print 1 || boom();"),
        vec!["0", "1"]
    );
}

#[test]
fn keyword_operators_match_their_symbolic_forms() {
    assert_eq!(printed("print 1 and 2;"), vec!["2"]);
    assert_eq!(printed("print 0 or 5;"), vec!["5"]);
    assert_eq!(printed("print not 0;"), vec!["true"]);
}

#[test]
fn truthiness_covers_all_three_tags() {
    assert_eq!(
        printed("if (\"a\") { print 1; } if (\"\") { print 2; } if (0.5) { print 3; }"),
        vec!["1", "3"]
    );
}

#[test]
fn equality_never_coerces_across_tags() {
    assert_eq!(printed("print 1 == \"1\";"), vec!["false"]);
    assert_eq!(printed("print true == 1;"), vec!["false"]);
    assert_eq!(printed("print \"a\" == \"a\";"), vec!["true"]);
    assert_eq!(printed("print 1 != 2;"), vec!["true"]);
}

#[test]
fn nil_collapses_to_zero() {
    assert_eq!(printed("print nil;"), vec!["0"]);
    assert_eq!(printed("print nil == 0;"), vec!["true"]);
}

#[test]
fn numbers_print_without_a_trailing_fraction_when_integral() {
    assert_eq!(
        printed("print 8 / 2; print 7 / 2; print true; print \"hi\";"),
        vec!["4", "3.5", "true", "hi"]
    );
}

#[test]
fn closures_resolve_names_in_the_defining_scope() {
    let lines = printed(
        "var x = 1;\n\
         function f() { return x; }\n\
         function g() { var x = 99; return f(); }\n\
         print g();",
    );
    assert_eq!(lines, vec!["1"]);
}

#[test]
fn a_closure_outlives_the_block_that_declared_it() {
    assert_eq!(
        printed("{ var hidden = 7; function get() { return hidden; } } print get();"),
        vec!["7"]
    );
}

#[test]
fn comments_are_invisible_to_the_grammar() {
    assert_eq!(
        printed("var x = 1; // trailing\n/* block\ncomment */ print x;"),
        vec!["1"]
    );
}

#[test]
fn const_declarations_evaluate_like_var() {
    assert_eq!(printed("const PI = 3.14; print PI;"), vec!["3.14"]);
}

#[test]
fn a_top_level_return_stops_the_run_quietly() {
    let (lines, report) = run_source("print 1; return; print 2;");
    assert!(report.runtime_error.is_none());
    assert_eq!(lines, vec!["1"]);
}
