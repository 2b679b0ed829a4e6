use std::{fs, mem, rc::Rc};

use crate::{
    ast::{Block, Expr, InfixOperator, PrefixOperator, Program, Statement},
    bytecode::{Instructions, Opcode, make},
    compiler::symbol_table::{Symbol, SymbolScope, SymbolTable},
    error::CompileError,
    interpreter::{
        builtins,
        parser::core::Parser,
        value::core::{CompiledFunction, Value},
    },
};

/// A compiled program: the main instruction sequence and the constant pool
/// both it and every nested function share.
#[derive(Debug, Clone, PartialEq)]
pub struct Bytecode {
    /// Top-level instructions.
    pub instructions: Instructions,
    /// The constant pool; `Constant` and `Closure` operands index into it.
    pub constants:    Vec<Value>,
}

/// The opcode and position of an already-emitted instruction, kept for
/// single-instruction peephole fixups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmittedInstruction {
    opcode:   Opcode,
    position: usize,
}

/// One function body under compilation: an independent instruction buffer
/// plus the last two emitted instructions.
#[derive(Debug, Default)]
struct CompilationScope {
    instructions:         Instructions,
    last_instruction:     Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

/// Translates an AST into bytecode.
///
/// The compiler keeps a stack of compilation scopes, one per function body
/// being compiled, and a chain of symbol tables mirroring the lexical
/// nesting. The constant pool and the global symbol table persist across
/// scopes.
pub struct Compiler {
    constants:    Vec<Value>,
    symbol_table: SymbolTable,
    scopes:       Vec<CompilationScope>,
}

impl Compiler {
    /// Creates a compiler with an empty main scope and the builtin registry
    /// installed in the global symbol table.
    #[must_use]
    pub fn new() -> Self {
        let mut symbol_table = SymbolTable::new();
        for (index, builtin) in builtins::all().iter().enumerate() {
            symbol_table.define_builtin(index, builtin.name);
        }

        Self { constants: Vec::new(),
               symbol_table,
               scopes: vec![CompilationScope::default()] }
    }

    /// Compiles a program into the current scope.
    ///
    /// # Errors
    /// [`CompileError::UndefinedVariable`] for unresolved names and
    /// [`CompileError::ImportRead`] for unreadable imports.
    ///
    /// # Example
    /// ```
    /// use tensora::{compiler::core::Compiler, interpreter::parser::core::Parser};
    ///
    /// let program = Parser::new("1 + 2;").parse_program();
    /// let mut compiler = Compiler::new();
    /// compiler.compile(&program).unwrap();
    ///
    /// let bytecode = compiler.bytecode();
    /// assert_eq!(bytecode.constants.len(), 2);
    /// ```
    pub fn compile(&mut self, program: &Program) -> Result<(), CompileError> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    /// Consumes the compiler, returning the main scope's instructions and
    /// the constant pool.
    #[must_use]
    pub fn bytecode(mut self) -> Bytecode {
        let scope = self.scopes.swap_remove(0);
        Bytecode { instructions: scope.instructions,
                   constants:    self.constants, }
    }

    /// Compiles one statement.
    ///
    /// Expression statements emit a trailing `Pop` so the stack stays
    /// balanced. A `let` compiles its value first and defines the name
    /// afterwards, so a rebinding like `let x = x + 1` still resolves the
    /// previous `x`; the store targets the globals array or a frame-local
    /// slot depending on the scope the name landed in.
    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Expression { expr, .. } => {
                self.compile_expression(expr)?;
                self.emit(Opcode::Pop, &[]);
            },
            Statement::Let { name, value, .. } => {
                self.compile_expression(value)?;

                let symbol = self.symbol_table.define(name);
                match symbol.scope {
                    SymbolScope::Global => self.emit(Opcode::SetGlobal, &[symbol.index]),
                    _ => self.emit(Opcode::SetLocal, &[symbol.index]),
                };
            },
            Statement::Return { value, .. } => {
                self.compile_expression(value)?;
                self.emit(Opcode::ReturnValue, &[]);
            },
        }
        Ok(())
    }

    fn compile_block(&mut self, block: &Block) -> Result<(), CompileError> {
        for statement in &block.statements {
            self.compile_statement(statement)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn compile_expression(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::Integer { value, .. } => {
                let index = self.add_constant(Value::Integer(*value));
                self.emit(Opcode::Constant, &[index]);
            },
            Expr::Float { value, .. } => {
                let index = self.add_constant(Value::Float(*value));
                self.emit(Opcode::Constant, &[index]);
            },
            Expr::String { value, .. } => {
                let index = self.add_constant(Value::from(value.as_str()));
                self.emit(Opcode::Constant, &[index]);
            },
            Expr::Boolean { value, .. } => {
                if *value {
                    self.emit(Opcode::True, &[]);
                } else {
                    self.emit(Opcode::False, &[]);
                }
            },
            Expr::Identifier { name, .. } => {
                let symbol = self.symbol_table
                                 .resolve(name)
                                 .ok_or_else(|| CompileError::UndefinedVariable { name:
                                                                                      name.clone(), })?;
                self.load_symbol(&symbol);
            },
            Expr::Prefix { operator, right, .. } => {
                self.compile_expression(right)?;
                match operator {
                    PrefixOperator::Bang => self.emit(Opcode::Bang, &[]),
                    PrefixOperator::Minus => self.emit(Opcode::Minus, &[]),
                };
            },
            Expr::Infix { left, operator, right, .. } => {
                // `<` swaps its operands and reuses OpGreaterThan.
                if *operator == InfixOperator::LessThan {
                    self.compile_expression(right)?;
                    self.compile_expression(left)?;
                    self.emit(Opcode::GreaterThan, &[]);
                    return Ok(());
                }

                self.compile_expression(left)?;
                self.compile_expression(right)?;
                match operator {
                    InfixOperator::Add => self.emit(Opcode::Add, &[]),
                    InfixOperator::Sub => self.emit(Opcode::Sub, &[]),
                    InfixOperator::Mul => self.emit(Opcode::Mul, &[]),
                    InfixOperator::Div => self.emit(Opcode::Div, &[]),
                    InfixOperator::GreaterThan => self.emit(Opcode::GreaterThan, &[]),
                    InfixOperator::Equal => self.emit(Opcode::Equal, &[]),
                    InfixOperator::NotEqual => self.emit(Opcode::NotEqual, &[]),
                    InfixOperator::LessThan => unreachable!("handled above"),
                };
            },
            Expr::If { condition,
                       consequence,
                       alternative,
                       .. } => {
                self.compile_expression(condition)?;

                // Placeholder target, patched once the consequence's size is
                // known.
                let jump_not_truthy = self.emit(Opcode::JumpNotTruthy, &[9999]);

                self.compile_block(consequence)?;
                if self.last_instruction_is(Opcode::Pop) {
                    self.remove_last_pop();
                }

                let jump = self.emit(Opcode::Jump, &[9999]);

                let after_consequence = self.current_scope().instructions.len();
                self.change_operand(jump_not_truthy, Opcode::JumpNotTruthy, after_consequence);

                match alternative {
                    None => {
                        self.emit(Opcode::Null, &[]);
                    },
                    Some(alternative) => {
                        self.compile_block(alternative)?;
                        if self.last_instruction_is(Opcode::Pop) {
                            self.remove_last_pop();
                        }
                    },
                }

                let after_alternative = self.current_scope().instructions.len();
                self.change_operand(jump, Opcode::Jump, after_alternative);
            },
            Expr::Function { parameters, body, name, .. } => {
                self.compile_function_literal(parameters, body, name)?;
            },
            Expr::Call { function, arguments, .. } => {
                self.compile_expression(function)?;
                for argument in arguments {
                    self.compile_expression(argument)?;
                }
                self.emit(Opcode::Call, &[arguments.len()]);
            },
            Expr::Array { elements, .. } => {
                for element in elements {
                    self.compile_expression(element)?;
                }
                self.emit(Opcode::Array, &[elements.len()]);
            },
            Expr::Hash { pairs, .. } => {
                // Pairs compile in sorted source form so the emitted
                // bytecode is deterministic across runs.
                let mut sorted = pairs.iter().collect::<Vec<_>>();
                sorted.sort_by_cached_key(|(key, _)| key.to_string());

                for (key, value) in sorted {
                    self.compile_expression(key)?;
                    self.compile_expression(value)?;
                }
                self.emit(Opcode::Hash, &[pairs.len() * 2]);
            },
            Expr::Index { left, index, .. } => {
                self.compile_expression(left)?;
                self.compile_expression(index)?;
                self.emit(Opcode::Index, &[]);
            },
            Expr::Tensor { shape, data, .. } => {
                self.compile_expression(shape)?;
                self.compile_expression(data)?;
                self.emit(Opcode::Tensor, &[2]);
            },
            Expr::Import { path, .. } => {
                self.compile_import(path)?;
            },
        }
        Ok(())
    }

    /// Compiles a function literal into its own scope and emits the closure
    /// construction.
    ///
    /// # Parameters
    /// - `parameters`: Parameter names; each becomes a local in the new
    ///   scope, in order.
    /// - `body`: The function body.
    /// - `name`: The name an enclosing `let` assigned, or empty. A named
    ///   function gets a function-scope symbol so its body can refer to
    ///   itself through `CurrentClosure`.
    ///
    /// # Returns
    /// `Ok(())` once the `Closure` instruction referencing the new constant
    /// has been emitted into the enclosing scope.
    fn compile_function_literal(&mut self,
                                parameters: &[String],
                                body: &Block,
                                name: &str)
                                -> Result<(), CompileError> {
        self.enter_scope();

        if !name.is_empty() {
            self.symbol_table.define_function_name(name);
        }
        for parameter in parameters {
            self.symbol_table.define(parameter);
        }

        self.compile_block(body)?;

        // An expression body's trailing Pop becomes the implicit return; a
        // body that still does not end in a return gets an explicit null one.
        if self.last_instruction_is(Opcode::Pop) {
            self.replace_last_pop_with_return();
        }
        if !self.last_instruction_is(Opcode::ReturnValue) {
            self.emit(Opcode::Return, &[]);
        }

        let free_symbols = self.symbol_table.free_symbols.clone();
        let num_locals = self.symbol_table.num_definitions;
        let instructions = self.leave_scope();

        // Load every captured value so OpClosure finds them on the stack in
        // free-index order.
        for symbol in &free_symbols {
            self.load_symbol(symbol);
        }

        let function = CompiledFunction { instructions,
                                          num_locals,
                                          num_parameters: parameters.len() };
        let index = self.add_constant(Value::CompiledFunction(Rc::new(function)));
        self.emit(Opcode::Closure, &[index, free_symbols.len()]);

        Ok(())
    }

    /// Compiles an imported file's program into the current scope.
    ///
    /// The imported statements are spliced in as if written at the import
    /// site, so their bindings land in the current scope. The last
    /// expression statement's Pop is dropped to leave its value as the
    /// import expression's value; a program without one yields null. Syntax
    /// errors in the imported file are not reported; the parsed prefix is
    /// compiled.
    fn compile_import(&mut self, path: &str) -> Result<(), CompileError> {
        let source =
            fs::read_to_string(path).map_err(|e| CompileError::ImportRead { message:
                                                                                e.to_string() })?;

        let mut parser = Parser::new(&source);
        let program = parser.parse_program();

        self.compile(&program)?;

        if self.last_instruction_is(Opcode::Pop) {
            self.remove_last_pop();
        } else {
            self.emit(Opcode::Null, &[]);
        }

        Ok(())
    }

    /// Emits the load instruction matching a symbol's storage class.
    fn load_symbol(&mut self, symbol: &Symbol) {
        match symbol.scope {
            SymbolScope::Global => self.emit(Opcode::GetGlobal, &[symbol.index]),
            SymbolScope::Local => self.emit(Opcode::GetLocal, &[symbol.index]),
            SymbolScope::Free => self.emit(Opcode::GetFree, &[symbol.index]),
            SymbolScope::Builtin => self.emit(Opcode::GetBuiltin, &[symbol.index]),
            SymbolScope::Function => self.emit(Opcode::CurrentClosure, &[]),
        };
    }

    /// Adds a constant to the pool and returns its index.
    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    /// Encodes and appends one instruction to the current scope, returning
    /// its position.
    fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let instruction = make(op, operands);
        let position = self.add_instruction(&instruction);
        self.set_last_instruction(op, position);
        position
    }

    fn add_instruction(&mut self, bytes: &[u8]) -> usize {
        let scope = self.current_scope_mut();
        let position = scope.instructions.len();
        scope.instructions.0.extend_from_slice(bytes);
        position
    }

    fn set_last_instruction(&mut self, opcode: Opcode, position: usize) {
        let scope = self.current_scope_mut();
        scope.previous_instruction = scope.last_instruction;
        scope.last_instruction = Some(EmittedInstruction { opcode, position });
    }

    fn last_instruction_is(&self, opcode: Opcode) -> bool {
        self.current_scope()
            .last_instruction
            .is_some_and(|last| last.opcode == opcode)
    }

    /// Drops the most recently emitted instruction (always a Pop at the call
    /// sites).
    fn remove_last_pop(&mut self) {
        let scope = self.current_scope_mut();
        if let Some(last) = scope.last_instruction {
            scope.instructions.0.truncate(last.position);
            scope.last_instruction = scope.previous_instruction;
        }
    }

    /// Overwrites the instruction at `position` in place. Only valid for
    /// same-width replacements.
    fn replace_instruction(&mut self, position: usize, bytes: &[u8]) {
        let scope = self.current_scope_mut();
        scope.instructions.0[position..position + bytes.len()].copy_from_slice(bytes);
    }

    /// Patches the operand of a previously emitted jump.
    fn change_operand(&mut self, position: usize, op: Opcode, operand: usize) {
        self.replace_instruction(position, &make(op, &[operand]));
    }

    /// Rewrites a function body's trailing Pop into the implicit return of
    /// the expression's value.
    fn replace_last_pop_with_return(&mut self) {
        if let Some(last) = self.current_scope().last_instruction {
            self.replace_instruction(last.position, &make(Opcode::ReturnValue, &[]));
            self.current_scope_mut().last_instruction =
                Some(EmittedInstruction { opcode:   Opcode::ReturnValue,
                                          position: last.position, });
        }
    }

    /// Opens a fresh instruction buffer and symbol scope for a function body.
    fn enter_scope(&mut self) {
        self.scopes.push(CompilationScope::default());
        self.symbol_table = SymbolTable::new_enclosed(mem::take(&mut self.symbol_table));
    }

    /// Closes the innermost scope, returning its instructions and restoring
    /// the enclosing symbol table.
    fn leave_scope(&mut self) -> Instructions {
        let scope = self.scopes.pop().unwrap_or_default();

        let table = mem::take(&mut self.symbol_table);
        self.symbol_table = match table.outer {
            Some(outer) => *outer,
            None => SymbolTable::new(),
        };

        scope.instructions
    }

    fn current_scope(&self) -> &CompilationScope {
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_scope_mut(&mut self) -> &mut CompilationScope {
        let index = self.scopes.len() - 1;
        &mut self.scopes[index]
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
