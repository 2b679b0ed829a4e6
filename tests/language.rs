use std::{env, fs, process};

use tensora::{
    error::Error,
    interpreter::value::core::Value,
    run_compiled, run_evaluator,
};

/// Runs a snippet through both back ends and checks that each produces the
/// expected value.
fn assert_value(source: &str, expected: &Value) {
    for (backend, result) in [("evaluator", run_evaluator(source)), ("vm", run_compiled(source))] {
        match result {
            Ok(value) => {
                assert_eq!(&value, expected, "{backend} result mismatch for {source:?}");
            },
            Err(e) => panic!("{backend} failed for {source:?}: {e}"),
        }
    }
}

fn assert_integer(source: &str, expected: i64) {
    assert_value(source, &Value::Integer(expected));
}

fn assert_boolean(source: &str, expected: bool) {
    assert_value(source, &Value::Boolean(expected));
}

fn assert_string(source: &str, expected: &str) {
    assert_value(source, &Value::from(expected));
}

fn assert_null(source: &str) {
    assert_value(source, &Value::Null);
}

/// Checks that both back ends fail with the exact runtime message.
fn assert_runtime_error(source: &str, message: &str) {
    assert_evaluator_error(source, message);
    assert_vm_error(source, message);
}

fn assert_evaluator_error(source: &str, message: &str) {
    match run_evaluator(source) {
        Err(Error::Runtime(e)) => assert_eq!(e.to_string(), message, "for {source:?}"),
        Err(e) => panic!("evaluator failed differently for {source:?}: {e}"),
        Ok(value) => panic!("evaluator succeeded for {source:?} with {value}"),
    }
}

fn assert_vm_error(source: &str, message: &str) {
    match run_compiled(source) {
        Err(Error::Runtime(e)) => assert_eq!(e.to_string(), message, "for {source:?}"),
        Err(e) => panic!("vm failed differently for {source:?}: {e}"),
        Ok(value) => panic!("vm succeeded for {source:?} with {value}"),
    }
}

#[test]
fn integer_arithmetic() {
    assert_integer("5", 5);
    assert_integer("10", 10);
    assert_integer("-5", -5);
    assert_integer("-10", -10);
    assert_integer("5 + 5 + 5 + 5 - 10", 10);
    assert_integer("2 * 2 * 2 * 2 * 2", 32);
    assert_integer("-50 + 100 + -50", 0);
    assert_integer("5 * 2 + 10", 20);
    assert_integer("5 + 2 * 10", 25);
    assert_integer("20 + 2 * -10", 0);
    assert_integer("50 / 2 * 2 + 10", 60);
    assert_integer("2 * (5 + 10)", 30);
    assert_integer("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50);
    assert_integer("-7 / 2", -3);
}

#[test]
fn float_arithmetic() {
    assert_value("5.2 + 10.1", &Value::Float(5.2 + 10.1));
    assert_value("1.0 / 4.0", &Value::Float(0.25));
    assert_value("2.5 * 4.0", &Value::Float(10.0));
    assert_value("-5.5", &Value::Float(-5.5));
    assert_value("10.0 - 0.5", &Value::Float(9.5));
}

#[test]
fn boolean_expressions() {
    assert_boolean("true", true);
    assert_boolean("false", false);
    assert_boolean("1 < 2", true);
    assert_boolean("1 > 2", false);
    assert_boolean("1 == 1", true);
    assert_boolean("1 != 1", false);
    assert_boolean("1 == 2", false);
    assert_boolean("1 != 2", true);
    assert_boolean("1.5 < 2.5", true);
    assert_boolean("2.5 > 2.5", false);
    assert_boolean("true == true", true);
    assert_boolean("false == false", true);
    assert_boolean("true == false", false);
    assert_boolean("true != false", true);
    assert_boolean("(1 < 2) == true", true);
    assert_boolean("(1 > 2) == true", false);
}

#[test]
fn bang_operator() {
    assert_boolean("!true", false);
    assert_boolean("!false", true);
    assert_boolean("!5", false);
    assert_boolean("!!true", true);
    assert_boolean("!!false", false);
    assert_boolean("!!5", true);
}

#[test]
fn equality_is_identity_for_heap_values() {
    // Two separately constructed strings are different allocations.
    assert_boolean("\"a\" == \"a\"", false);
    assert_boolean("\"a\" != \"a\"", true);
    // The same binding read twice is the same allocation.
    assert_boolean("let s = \"a\"; s == s", true);
    // Mixed types compare as not-identical rather than erroring.
    assert_boolean("1 == \"1\"", false);
    assert_boolean("1 == 1.0", false);
}

#[test]
fn conditionals() {
    assert_integer("if (true) { 10 }", 10);
    assert_null("if (false) { 10 }");
    assert_integer("if (1) { 10 }", 10);
    assert_integer("if (1 < 2) { 10 }", 10);
    assert_null("if (1 > 2) { 10 }");
    assert_integer("if (1 > 2) { 10 } else { 20 }", 20);
    assert_integer("if (1 < 2) { 10 } else { 20 }", 10);
    assert_integer("if ((if (false) { 10 })) { 10 } else { 20 }", 20);
}

#[test]
fn global_let_statements() {
    assert_integer("let one = 1; one;", 1);
    assert_integer("let one = 1; let two = 2; one + two;", 3);
    assert_integer("let one = 1; let two = one + one; one + two;", 3);
    // Rebinding resolves the previous binding while compiling the new value.
    assert_integer("let x = 5; let x = x + 1; x;", 6);
}

#[test]
fn return_statements() {
    assert_integer("let f = fn() { return 10; 9; }; f();", 10);
    assert_integer("let f = fn() { return 2 * 5; 9; }; f();", 10);
    assert_integer("let f = fn() { 9; return 10; 9; }; f();", 10);
    assert_integer("let f = fn() { if (10 > 1) { if (10 > 1) { return 10; } return 1; } }; f();",
                   10);
}

#[test]
fn strings() {
    assert_string("\"tensora\"", "tensora");
    assert_string("\"ten\" + \"sora\"", "tensora");
    assert_string("\"Hello\" + \" \" + \"World!\"", "Hello World!");
    assert_integer("len(\"Hello\" + \" \" + \"World!\")", 12);
}

#[test]
fn arrays() {
    assert_value("[1, 2 * 2, 3 + 3]",
                 &Value::from(vec![Value::Integer(1), Value::Integer(4), Value::Integer(6)]));
    assert_value("[]", &Value::from(Vec::new()));
    assert_integer("[1, 2, 3][0]", 1);
    assert_integer("[1, 2, 3][1 + 1]", 3);
    assert_integer("let a = [1, 2, 3]; a[2];", 3);
    assert_integer("[[1, 1, 1]][0][0]", 1);
    assert_null("[1, 2, 3][3]");
    assert_null("[1, 2, 3][-1]");
    assert_null("[][0]");
}

#[test]
fn hashes() {
    assert_integer("{1: 1, 2: 2}[1]", 1);
    assert_integer("{1: 1, 2: 2}[2]", 2);
    assert_integer("{\"one\": 1, \"two\": 2}[\"two\"]", 2);
    assert_integer("{true: 5}[true]", 5);
    assert_integer("{false: 5}[false]", 5);
    assert_integer("let key = \"foo\"; {\"foo\": 5}[key]", 5);
    assert_integer("{\"thr\" + \"ee\": 3}[\"three\"]", 3);
    assert_null("{\"foo\": 5}[\"bar\"]");
    assert_null("{}[\"foo\"]");
    assert_string("{\"name\": \"Ada\"}[\"name\"]", "Ada");
}

#[test]
fn functions_and_calls() {
    assert_integer("let identity = fn(x) { x; }; identity(5);", 5);
    assert_integer("let identity = fn(x) { return x; }; identity(5);", 5);
    assert_integer("let double = fn(x) { x * 2; }; double(5);", 10);
    assert_integer("let add = fn(x, y) { x + y }; add(5, 5);", 10);
    assert_integer("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20);
    assert_integer("fn(x) { x; }(5)", 5);
    assert_null("let noReturn = fn() { }; noReturn();");
    assert_integer("let one = fn() { 1; }; let two = fn() { one() + 1 }; two();", 2);
}

#[test]
fn first_class_functions() {
    assert_integer("let returnsOne = fn() { 1; };
                    let returnsOneReturner = fn() { returnsOne; };
                    returnsOneReturner()();",
                   1);
    assert_integer("let apply = fn(f, x) { f(x) };
                    let double = fn(x) { x * 2 };
                    apply(double, 8);",
                   16);
}

#[test]
fn closures() {
    assert_integer("let newAdder = fn(x) { fn(y) { x + y } }; let add2 = newAdder(2); add2(3);",
                   5);
    assert_integer("let newAdder = fn(a, b) {
                        let c = a + b;
                        fn(d) { let e = d + c; fn(f) { e + f; }; };
                    };
                    let newAdderInner = newAdder(1, 2);
                    let adder = newAdderInner(3);
                    adder(8);",
                   14);
    assert_integer("let newClosure = fn(a) { fn() { a; }; }; let closure = newClosure(99); closure();",
                   99);
}

#[test]
fn recursive_functions() {
    assert_integer("let countDown = fn(x) { if (x == 0) { return 0; } else { countDown(x - 1); } };
                    countDown(2);",
                   0);
    assert_integer("let wrapper = fn() {
                        let countDown = fn(x) {
                            if (x == 0) { return 0; } else { countDown(x - 1); }
                        };
                        countDown(1);
                    };
                    wrapper();",
                   0);
    assert_integer("let fibonacci = fn(x) {
                        if (x < 2) { x } else { fibonacci(x - 1) + fibonacci(x - 2) }
                    };
                    fibonacci(10);",
                   55);
}

#[test]
fn builtin_len() {
    assert_integer("len(\"\")", 0);
    assert_integer("len(\"four\")", 4);
    assert_integer("len([1, 2, 3])", 3);
    assert_integer("len([])", 0);
    assert_integer("len([1, 2, 3]) + len(\"ab\")", 5);
    assert_runtime_error("len(1)", "argument to `len` not supported, got INTEGER");
    assert_runtime_error("len(\"one\", \"two\")", "wrong number of arguments. got=2, want=1");
}

#[test]
fn builtin_array_access() {
    assert_integer("first([1, 2, 3])", 1);
    assert_null("first([])");
    assert_integer("last([1, 2, 3])", 3);
    assert_null("last([])");
    assert_value("rest([1, 2, 3])",
                 &Value::from(vec![Value::Integer(2), Value::Integer(3)]));
    assert_null("rest([])");
    assert_runtime_error("first(1)", "argument to `first` must be ARRAY, got INTEGER");
    assert_runtime_error("last(1)", "argument to `last` must be ARRAY, got INTEGER");
}

#[test]
fn builtin_push_and_pop_mutate_in_place() {
    assert_value("push([1], 2)", &Value::from(vec![Value::Integer(1), Value::Integer(2)]));
    assert_integer("let a = [1]; let b = a; push(a, 2); len(b);", 2);
    assert_integer("let a = [1, 2, 3]; pop(a); len(a);", 2);
    assert_integer("let a = [1, 2, 3]; pop(a);", 3);
    assert_null("pop([])");
    assert_runtime_error("push(1, 1)", "argument to `push` must be ARRAY, got INTEGER");
    assert_runtime_error("push([])", "wrong number of arguments. got=1, want=2");
}

#[test]
fn builtin_join() {
    assert_string("join([1, 2, 3], \"-\")", "1-2-3");
    assert_string("join([], \"-\")", "");
    assert_string("join([\"a\", \"b\"], \", \")", "a, b");
    assert_runtime_error("join(1, \"-\")", "first argument to `join` must be ARRAY, got INTEGER");
    assert_runtime_error("join([], 2)", "second argument to `join` must be STRING, got INTEGER");
}

#[test]
fn builtin_random_and_exp() {
    assert_boolean("let r = random(); r < 1.0", true);
    assert_boolean("random() * 0.0 == 0.0", true);
    assert_value("exp(0)", &Value::Float(1.0));
    assert_value("exp(0.0)", &Value::Float(1.0));
    assert_value("exp(1)", &Value::Float(1f64.exp()));
    assert_runtime_error("random(1)", "random() takes no arguments");
    assert_runtime_error("exp()",
                         "wrong number of arguments. exp() requires exactly one argument.");
    assert_runtime_error("exp(\"one\")", "argument to `exp` must be a number");
}

#[test]
fn builtin_puts_returns_null() {
    assert_null("puts(\"hello\")");
}

#[test]
fn host_registered_builtins_are_callable() {
    tensora::interpreter::builtins::register("triple", |args| match args {
        [Value::Integer(v)] => Ok(Value::Integer(v * 3)),
        _ => Ok(Value::Null),
    });

    assert_integer("triple(7)", 21);
    assert_integer("let t = triple; t(2) + triple(1);", 9);
}

fn tensor(shape: Vec<i64>, data: Vec<f64>) -> Value {
    Value::from(tensora::interpreter::value::tensor::Tensor { shape, data })
}

#[test]
fn tensor_literals() {
    assert_value("@[3], [1.0, 2.0, 3.0]", &tensor(vec![3], vec![1.0, 2.0, 3.0]));
    assert_value("@[2, 2], [1.0, 2.0, 3.0, 4.0]",
                 &tensor(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]));
    // Integer data is widened to floats.
    assert_value("@[2], [1, 2]", &tensor(vec![2], vec![1.0, 2.0]));
    // The data operand is an arbitrary expression.
    assert_value("let data = [5.0]; @[1], data;", &tensor(vec![1], vec![5.0]));
    assert_value("@[2], push([1.0], 2.0)", &tensor(vec![2], vec![1.0, 2.0]));
}

#[test]
fn tensor_arithmetic() {
    assert_value("let a = @[3], [1.0, 2.0, 3.0]; let b = @[3], [1.0, 2.0, 3.0]; a + b;",
                 &tensor(vec![3], vec![2.0, 4.0, 6.0]));
    assert_value("@[1], [5.0] - @[1], [4.0]", &tensor(vec![1], vec![1.0]));
    assert_value("@[1], [5.0] * @[1], [4.0]", &tensor(vec![1], vec![20.0]));
    assert_value("@[1], [5.0] / @[1], [2.5]", &tensor(vec![1], vec![2.0]));
}

#[test]
fn tensor_errors() {
    assert_runtime_error("@[2], [1.0, 2.0] + @[3], [1.0, 2.0, 3.0]",
                         "shapes are not equal [2] [3]");
    assert_runtime_error("@[1.5], [1.0]", "tensor shape must be an array of integers");
    assert_runtime_error("@[1], [true]", "tensor data must be an array of numbers");
    assert_runtime_error("@[1], [1.0] - @[1], \"not data\"",
                         "tensor data must be an array of numbers");
}

#[test]
fn runtime_errors() {
    assert_runtime_error("5 + true;", "type mismatch: INTEGER + BOOLEAN");
    assert_runtime_error("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN");
    assert_runtime_error("5.0 + true;", "type mismatch: FLOAT + BOOLEAN");
    assert_runtime_error("-true", "unknown operator: -BOOLEAN");
    assert_runtime_error("true + false;", "unknown operator: BOOLEAN + BOOLEAN");
    assert_runtime_error("true > false;", "unknown operator: BOOLEAN > BOOLEAN");
    assert_runtime_error("\"a\" - \"b\"", "unknown operator: STRING - STRING");
    assert_runtime_error("let f = fn(x) { x }; f(1, 2);",
                         "wrong number of arguments: want=1, got=2");
    assert_runtime_error("let f = fn(a, b) { a + b }; f(1);",
                         "wrong number of arguments: want=2, got=1");
    assert_runtime_error("5[0]", "index operator not supported: INTEGER");
    assert_runtime_error("\"str\"[0]", "index operator not supported: STRING");
    assert_runtime_error("{\"name\": \"sam\"}[[]]", "unusable as hash key: ARRAY");
}

#[test]
fn evaluator_specific_errors() {
    // Unknown names surface at run time under the evaluator but at compile
    // time under the compiler, and a called non-function is reported with
    // its evaluator-side type tag.
    assert_evaluator_error("foobar", "identifier not found: foobar");
    assert_evaluator_error("5();", "not a function: INTEGER");
    assert_evaluator_error("{\"name\": \"Ada\"}[fn(x) { x }];",
                           "unusable as hash key: FUNCTION");

    match run_compiled("foobar") {
        Err(Error::Compile(e)) => assert_eq!(e.to_string(), "undefined variable foobar"),
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert_vm_error("5();", "calling non-function and non-built-in");
    assert_vm_error("{\"name\": \"Ada\"}[fn(x) { x }];", "unusable as hash key: CLOSURE");
}

#[test]
fn vm_reports_unbounded_recursion() {
    // The evaluator would exhaust the host stack here; the machine's frame
    // limit turns it into an error.
    assert_vm_error("let f = fn() { f(); }; f();", "stack overflow");
}

#[test]
fn parser_errors_accumulate() {
    let mut parser = tensora::interpreter::parser::core::Parser::new("let x 5; let = 10; 1.2.3;");
    parser.parse_program();

    let messages = parser.errors
                         .iter()
                         .map(ToString::to_string)
                         .collect::<Vec<_>>();
    assert!(messages.contains(&"On line 1, expected next token to be =, got INT instead".to_string()),
            "got {messages:?}");
    assert!(messages.contains(&"On line 1, expected next token to be IDENT, got = instead".to_string()),
            "got {messages:?}");
    assert!(messages.contains(&"Syntax error on line 1: could not parse \"1.2.3\" as float".to_string()),
            "got {messages:?}");
}

#[test]
fn parser_error_reports_missing_prefix_rule() {
    match run_evaluator("1 + ;") {
        Err(Error::Parse(errors)) => {
            let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
            assert!(messages.iter()
                            .any(|m| m == "On line 1, no prefix parse function for ; found"),
                    "got {messages:?}");
        },
        other => panic!("expected parse errors, got {other:?}"),
    }
}

#[test]
fn parser_reports_lines() {
    let mut parser = tensora::interpreter::parser::core::Parser::new("let a = 1;\nlet b 2;");
    parser.parse_program();

    let messages = parser.errors
                         .iter()
                         .map(ToString::to_string)
                         .collect::<Vec<_>>();
    assert_eq!(messages,
               vec!["On line 2, expected next token to be =, got INT instead".to_string()]);
}

/// Writes a helper script into the temp directory and returns its path.
fn write_import_fixture(name: &str, contents: &str) -> String {
    let path = env::temp_dir().join(format!("tensora_{}_{name}", process::id()));
    fs::write(&path, contents).expect("failed to write import fixture");
    path.to_string_lossy().into_owned()
}

#[test]
fn imports_bind_into_the_current_scope() {
    let path = write_import_fixture("shared.tsr", "let shared = 42;\nshared * 2;\n");

    assert_integer(&format!("import \"{path}\"; shared + 1;"), 43);
    // The import expression's value is the imported program's last value.
    assert_integer(&format!("let v = import \"{path}\"; v;"), 84);
}

#[test]
fn imports_ending_in_a_binding_yield_null() {
    let path = write_import_fixture("bindings.tsr", "let shared = 42;\n");

    assert_null(&format!("import \"{path}\";"));
    assert_integer(&format!("import \"{path}\"; shared;"), 42);
}

#[test]
fn import_read_failures_are_reported() {
    let source = "import \"definitely/not/a/real/file.tsr\";";

    match run_evaluator(source) {
        Err(Error::Runtime(e)) => {
            assert!(e.to_string().starts_with("error reading import file: "), "got {e}");
        },
        other => panic!("expected a runtime error, got {other:?}"),
    }
    match run_compiled(source) {
        Err(Error::Compile(e)) => {
            assert!(e.to_string().starts_with("error reading import file: "), "got {e}");
        },
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn programs_ending_in_a_binding_yield_null() {
    assert_null("let x = 5;");
}
