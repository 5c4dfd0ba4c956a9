use interpreter::{InterpretError, Interpreter};
use itertools::Itertools;
use lazy_regex::regex;
use test_suite_proc_macro::generate_tests;

use pretty_assertions::assert_eq;

/// Runs a fixture as one piece of source and checks it against the expectations in its comments:
///
/// - `// expect: <output line>`
/// - `// Error...` a static error on this line, or `// [line N] Error...` on line `N`
/// - `// runtime error: <message>` raised by an operator on this line
pub fn lox_expect(code: &str) {
    let mut expected_compiler_errors = vec![];
    let mut expected_runtime_error = None;
    let mut expected_output = vec![];

    let compiler_error_regex = regex!(r"// (?:\[line (\d+)\] )?(Error( at (?:end|'.*'))?: .*)");
    let runtime_error_regex = regex!(r"// runtime error: (.*)");
    let output_regex = regex!(r"// expect: (.*)");

    for (i, line) in code.lines().enumerate() {
        if let Some(cap) = runtime_error_regex.captures(line) {
            assert!(expected_runtime_error.is_none(), "Only one runtime error can occur");
            expected_runtime_error = Some((i + 1, cap[1].to_string()));
        } else if let Some(cap) = compiler_error_regex.captures(line) {
            let line_number = cap.get(1).map_or((i + 1).to_string(), |m| m.as_str().to_string());
            expected_compiler_errors.push(format!("[line {}] {}", line_number, &cap[2]));
        } else if let Some(cap) = output_regex.captures(line) {
            expected_output.push(cap[1].to_string());
        }
    }

    assert!(
        expected_runtime_error.is_none() || expected_compiler_errors.is_empty(),
        "Can't have a runtime error when there are compiler errors."
    );

    let mut output = Vec::new();
    match Interpreter::new().run_source(code, &mut output) {
        Ok(()) => {
            assert_eq!(expected_output, String::from_utf8(output).unwrap().lines().collect_vec());

            assert!(expected_runtime_error.is_none(), "Expected runtime error but none occurred");
            assert!(
                expected_compiler_errors.is_empty(),
                "Expected compiler errors but none occurred"
            );
        }
        Err(InterpretError::CompileError(e)) => {
            assert!(output.is_empty());
            assert!(expected_output.is_empty());
            assert!(expected_runtime_error.is_none());

            assert_eq!(e.to_string(), expected_compiler_errors.join("\n"));
        }
        Err(InterpretError::RuntimeError(runtime_error)) => {
            assert!(output.is_empty());
            assert!(
                expected_compiler_errors.is_empty(),
                "Expected compiler errors but a runtime error occurred"
            );

            let (line, message) = expected_runtime_error.expect("Unexpected runtime error");
            assert_eq!(
                (line, message),
                (runtime_error.line().0, runtime_error.to_string())
            );
        }
        Err(e) => panic!("Unexpected error: {:?}", e),
    }
}

generate_tests!();
