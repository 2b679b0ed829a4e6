use std::fmt;

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// `Expr` covers all expression forms the parser can produce: literals,
/// identifiers, prefix and infix operations, conditionals, function literals,
/// calls, arrays, hashes, index expressions, tensor literals and imports.
/// Every variant records the source line on which it began.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to a binding by name.
    Identifier {
        /// Name of the binding.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A 64-bit signed integer literal.
    Integer {
        /// The literal value.
        value: i64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A 64-bit floating-point literal.
    Float {
        /// The literal value.
        value: f64,
        /// Line number in the source code.
        line:  usize,
    },
    /// A boolean literal: `true` or `false`.
    Boolean {
        /// The literal value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal. The lexer performs no escape processing, so the
    /// value is the raw text between the quotes.
    String {
        /// The literal value, without the surrounding quotes.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// A prefix operation (`!x`, `-x`).
    Prefix {
        /// The prefix operator to apply.
        operator: PrefixOperator,
        /// The operand expression.
        right:    Box<Expr>,
        /// Line number in the source code.
        line:     usize,
    },
    /// An infix operation (`a + b`, `a < b`, ...).
    Infix {
        /// Left operand.
        left:     Box<Expr>,
        /// The operator.
        operator: InfixOperator,
        /// Right operand.
        right:    Box<Expr>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A conditional expression with an optional alternative.
    If {
        /// The condition expression.
        condition:   Box<Expr>,
        /// Block evaluated when the condition is truthy.
        consequence: Block,
        /// Block evaluated otherwise, if present.
        alternative: Option<Block>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A function literal: `fn(a, b) { ... }`.
    ///
    /// When a function literal is the direct value of a `let` binding, the
    /// parser stores the bound name here. The compiler uses that name to let
    /// the function refer to itself without capturing itself as a free
    /// variable; anonymous functions carry an empty name.
    Function {
        /// Parameter names, in declaration order.
        parameters: Vec<String>,
        /// The function body.
        body:       Block,
        /// Name assigned by an enclosing `let`, or empty.
        name:       String,
        /// Line number in the source code.
        line:       usize,
    },
    /// A call expression: `callee(arg, ...)`.
    Call {
        /// The expression evaluating to the callee.
        function:  Box<Expr>,
        /// Argument expressions, in call order.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// An array literal: `[e1, e2, ...]`.
    Array {
        /// Element expressions, in source order.
        elements: Vec<Expr>,
        /// Line number in the source code.
        line:     usize,
    },
    /// An index expression: `receiver[index]`.
    Index {
        /// The expression being indexed.
        left:  Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A hash literal: `{k1: v1, k2: v2, ...}`.
    ///
    /// Pairs are kept in source order; consumers that need a stable order
    /// (the compiler) sort by the key's source form.
    Hash {
        /// Key/value expression pairs.
        pairs: Vec<(Expr, Expr)>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A tensor literal: `@[shape], data`.
    Tensor {
        /// The shape expression (a bracketed array form).
        shape: Box<Expr>,
        /// The data expression, producing the flat element array.
        data:  Box<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// An import expression: `import "path";`.
    Import {
        /// Path of the referenced source file.
        path: String,
        /// Line number in the source code.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use tensora::ast::Expr;
    ///
    /// let expr = Expr::Identifier { name: "x".to_string(),
    ///                               line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Identifier { line, .. }
            | Self::Integer { line, .. }
            | Self::Float { line, .. }
            | Self::Boolean { line, .. }
            | Self::String { line, .. }
            | Self::Prefix { line, .. }
            | Self::Infix { line, .. }
            | Self::If { line, .. }
            | Self::Function { line, .. }
            | Self::Call { line, .. }
            | Self::Array { line, .. }
            | Self::Index { line, .. }
            | Self::Hash { line, .. }
            | Self::Tensor { line, .. }
            | Self::Import { line, .. } => *line,
        }
    }
}

/// Represents a top-level or block-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A binding statement: `let name = value;`.
    Let {
        /// The bound name.
        name:  String,
        /// The bound value expression.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A return statement: `return value;`.
    Return {
        /// The returned expression.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
}

/// An ordered sequence of statements enclosed in braces.
///
/// Blocks form the bodies of `if` arms and function literals. The value of a
/// block is the value of its last evaluated statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements inside the block.
    pub statements: Vec<Statement>,
    /// Line number of the opening brace.
    pub line:       usize,
}

/// A complete parsed program: the ordered top-level statements of one source
/// file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, in source order.
    pub statements: Vec<Statement>,
}

/// Represents a prefix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrefixOperator {
    /// Logical NOT (`!x`).
    Bang,
    /// Arithmetic negation (`-x`).
    Minus,
}

/// Represents an infix operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InfixOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Bang => "!",
            Self::Minus => "-",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InfixOperator::{Add, Div, Equal, GreaterThan, LessThan, Mul, NotEqual, Sub};

        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            LessThan => "<",
            GreaterThan => ">",
            Equal => "==",
            NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier { name, .. } => write!(f, "{name}"),
            Self::Integer { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{value}"),
            Self::Boolean { value, .. } => write!(f, "{value}"),
            Self::String { value, .. } => write!(f, "{value}"),
            Self::Prefix { operator, right, .. } => write!(f, "({operator}{right})"),
            Self::Infix { left, operator, right, .. } => {
                write!(f, "({left} {operator} {right})")
            },
            Self::If { condition,
                       consequence,
                       alternative,
                       .. } => {
                write!(f, "if{condition} {consequence}")?;
                if let Some(alt) = alternative {
                    write!(f, "else {alt}")?;
                }
                Ok(())
            },
            Self::Function { parameters, body, name, .. } => {
                if name.is_empty() {
                    write!(f, "fn({}) {body}", parameters.join(", "))
                } else {
                    write!(f, "fn<{name}>({}) {body}", parameters.join(", "))
                }
            },
            Self::Call { function, arguments, .. } => {
                let args = arguments.iter()
                                    .map(ToString::to_string)
                                    .collect::<Vec<_>>()
                                    .join(", ");
                write!(f, "{function}({args})")
            },
            Self::Array { elements, .. } => {
                let elements = elements.iter()
                                       .map(ToString::to_string)
                                       .collect::<Vec<_>>()
                                       .join(", ");
                write!(f, "[{elements}]")
            },
            Self::Index { left, index, .. } => write!(f, "({left}[{index}])"),
            Self::Hash { pairs, .. } => {
                let pairs = pairs.iter()
                                 .map(|(k, v)| format!("{k}:{v}"))
                                 .collect::<Vec<_>>()
                                 .join(", ");
                write!(f, "{{{pairs}}}")
            },
            Self::Tensor { shape, data, .. } => write!(f, "@{shape}, {data}"),
            Self::Import { path, .. } => write!(f, "import \"{path}\""),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Let { name, value, .. } => write!(f, "let {name} = {value};"),
            Self::Return { value, .. } => write!(f, "return {value};"),
            Self::Expression { expr, .. } => write!(f, "{expr}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
