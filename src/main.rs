use std::fs;

use clap::{Parser, ValueEnum};
use tensora::{compile, run_compiled, run_evaluator};

/// Which back end executes the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// The bytecode compiler and virtual machine.
    Vm,
    /// The tree-walking evaluator.
    Eval,
}

/// tensora is a small, dynamically typed scripting language with closures,
/// hashes and tensors.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The back end to run the script on.
    #[arg(short, long, value_enum, default_value = "vm")]
    backend: Backend,

    /// Print the compiled bytecode instead of running the script.
    #[arg(short, long)]
    disassemble: bool,

    /// Path of the script to run.
    script: String,
}

fn main() {
    let args = Args::parse();

    let source = fs::read_to_string(&args.script).unwrap_or_else(|e| {
                     eprintln!("Failed to read the script '{}': {e}", &args.script);
                     std::process::exit(1);
                 });

    if args.disassemble {
        match compile(&source) {
            Ok(bytecode) => print!("{}", bytecode.instructions),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            },
        }
        return;
    }

    let result = match args.backend {
        Backend::Vm => run_compiled(&source),
        Backend::Eval => run_evaluator(&source),
    };

    match result {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
