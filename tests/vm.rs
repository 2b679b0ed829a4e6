use tensora::{compile, interpreter::value::core::Value, vm::core::Vm};

/// Compiles a snippet, runs it to completion, and returns the value left by
/// the final `Pop`.
fn run(source: &str) -> Value {
    let bytecode = compile(source).unwrap_or_else(|e| panic!("compiling {source:?} failed: {e}"));

    let mut vm = Vm::new(bytecode);
    vm.run().unwrap_or_else(|e| panic!("running {source:?} failed: {e}"));
    vm.last_popped()
}

fn assert_runs_to(source: &str, expected: &Value) {
    assert_eq!(&run(source), expected, "for {source:?}");
}

#[test]
fn last_popped_tracks_the_final_expression_statement() {
    assert_runs_to("1; 2; 3;", &Value::Integer(3));
    assert_runs_to("1 + 2;", &Value::Integer(3));
    // A program ending in a binding pops nothing; the vacated slot still
    // holds the machine's null prefill.
    assert_runs_to("let x = 99;", &Value::Null);
}

#[test]
fn globals_survive_across_statements() {
    assert_runs_to("let a = 1; let b = a + a; let c = b * b; c + a;", &Value::Integer(5));
}

#[test]
fn conditionals_leave_exactly_one_value() {
    assert_runs_to("if (true) { 1 } else { 2 }; 10;", &Value::Integer(10));
    assert_runs_to("if (false) { 1 }; 10;", &Value::Integer(10));
    assert_runs_to("if (false) { 1 };", &Value::Null);
}

#[test]
fn calls_restore_the_callers_stack() {
    // The callee slot is reclaimed by the return, so nesting calls deeply in
    // one expression leaves a balanced stack.
    assert_runs_to("let one = fn() { 1 };
                    one() + one() + one() + one();",
                   &Value::Integer(4));
    assert_runs_to("let add = fn(a, b) { a + b };
                    add(add(1, 2), add(3, 4));",
                   &Value::Integer(10));
}

#[test]
fn locals_are_frame_relative() {
    assert_runs_to("let firstFoobar = fn() { let foobar = 50; foobar; };
                    let secondFoobar = fn() { let foobar = 100; foobar; };
                    firstFoobar() + secondFoobar();",
                   &Value::Integer(150));
    assert_runs_to("let globalSeed = 50;
                    let minusOne = fn() { let num = 1; globalSeed - num; };
                    let minusTwo = fn() { let num = 2; globalSeed - num; };
                    minusOne() + minusTwo();",
                   &Value::Integer(97));
}

#[test]
fn builtins_run_inside_function_frames() {
    assert_runs_to("let measure = fn(arr) { len(arr) + 1 }; measure([1, 2, 3]);",
                   &Value::Integer(4));
    assert_runs_to("let tail = fn(arr) { rest(arr) }; len(tail([1, 2, 3]));",
                   &Value::Integer(2));
}

#[test]
fn closures_capture_at_construction() {
    assert_runs_to("let newClosure = fn(a) { fn() { a } };
                    let closure = newClosure(99);
                    closure();",
                   &Value::Integer(99));
    // Captured values are copied into the closure's free list when it is
    // built, so the inner function still sees them after the outer returned.
    assert_runs_to("let newAdder = fn(a, b) {
                        fn(c) { a + b + c }
                    };
                    let adder = newAdder(1, 2);
                    adder(8);",
                   &Value::Integer(11));
}

#[test]
fn tensors_flow_through_the_stack() {
    let Value::Tensor(tensor) = run("@[2], [1.5, 2.5] + @[2], [0.5, 0.5];") else {
        panic!("expected a tensor result");
    };

    assert_eq!(tensor.shape, vec![2]);
    assert_eq!(tensor.data, vec![2.0, 3.0]);
}

#[test]
fn constants_are_shared_between_nested_functions() {
    // Every function body lives in the same constant pool as the main
    // program.
    let bytecode = compile("let f = fn() { 10 + 2 }; f() + 10;").unwrap();
    let integers = bytecode.constants
                           .iter()
                           .filter(|c| matches!(c, Value::Integer(_)))
                           .count();
    assert_eq!(integers, 3);
}
