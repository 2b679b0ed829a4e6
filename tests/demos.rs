use std::fs;

use tensora::{run_compiled, run_evaluator};
use walkdir::WalkDir;

/// Every demo script must run cleanly on both back ends, and both must agree
/// on the final value.
#[test]
fn demo_scripts_run_on_both_backends() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "tsr"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;

        let evaluated = run_evaluator(&source).unwrap_or_else(|e| {
                            panic!("Evaluator failed on {path:?}:\n{source}\nError: {e}")
                        });
        let compiled = run_compiled(&source).unwrap_or_else(|e| {
                           panic!("VM failed on {path:?}:\n{source}\nError: {e}")
                       });

        assert_eq!(evaluated, compiled, "backends disagree on {path:?}");
    }

    assert!(count > 0, "No demo scripts found in demos/");
}
