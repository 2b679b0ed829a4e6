use tensora::{
    ast::{Expr, Program, Statement},
    interpreter::{
        lexer::{TokenKind, tokenize},
        parser::core::Parser,
    },
};

/// Parses a snippet, failing the test on any accumulated error.
fn parse(source: &str) -> Program {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();

    assert!(parser.errors.is_empty(),
            "parser errors for {source:?}: {:?}",
            parser.errors
                  .iter()
                  .map(ToString::to_string)
                  .collect::<Vec<_>>());
    program
}

/// Parses a single statement and returns it.
fn parse_statement(source: &str) -> Statement {
    let mut program = parse(source);
    assert_eq!(program.statements.len(), 1, "expected one statement in {source:?}");
    program.statements.remove(0)
}

/// Parses a single expression statement and returns the expression.
fn parse_expression(source: &str) -> Expr {
    match parse_statement(source) {
        Statement::Expression { expr, .. } => expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn lexer_produces_kinds_literals_and_lines() {
    let tokens = tokenize("let ten = 10;\nten != 9.5;");

    let summary = tokens.iter()
                        .map(|t| (t.kind, t.literal.as_str(), t.line))
                        .collect::<Vec<_>>();
    assert_eq!(summary,
               vec![(TokenKind::Let, "let", 1),
                    (TokenKind::Identifier, "ten", 1),
                    (TokenKind::Assign, "=", 1),
                    (TokenKind::Int, "10", 1),
                    (TokenKind::Semicolon, ";", 1),
                    (TokenKind::Identifier, "ten", 2),
                    (TokenKind::NotEqual, "!=", 2),
                    (TokenKind::Float, "9.5", 2),
                    (TokenKind::Semicolon, ";", 2),
                    (TokenKind::Eof, "", 2)]);
}

#[test]
fn lexer_handles_strings_and_unknown_characters() {
    let tokens = tokenize("\"hello world\" $");

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].literal, "hello world");
    assert_eq!(tokens[1].kind, TokenKind::Illegal);
    assert_eq!(tokens[1].literal, "$");
}

#[test]
fn lexer_splits_identifiers_on_digits() {
    // Identifiers are letters and underscores only.
    let kinds = tokenize("x1").iter().map(|t| t.kind).collect::<Vec<_>>();
    assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Int, TokenKind::Eof]);
}

#[test]
fn let_statements_bind_names() {
    let source = "let x = 5;\nlet y = 10;\nlet foobar = 838383;";
    let program = parse(source);

    let names = program.statements
                       .iter()
                       .map(|statement| match statement {
                           Statement::Let { name, .. } => name.as_str(),
                           other => panic!("expected a let statement, got {other:?}"),
                       })
                       .collect::<Vec<_>>();
    assert_eq!(names, vec!["x", "y", "foobar"]);
}

#[test]
fn return_statements_parse() {
    let program = parse("return 5;\nreturn 10;\nreturn 993322;");

    assert_eq!(program.statements.len(), 3);
    for statement in &program.statements {
        assert!(matches!(statement, Statement::Return { .. }),
                "expected a return statement, got {statement:?}");
    }
}

#[test]
fn trailing_semicolons_are_optional() {
    assert!(matches!(parse_statement("let x = 5"), Statement::Let { .. }));
    assert!(matches!(parse_statement("return 5"), Statement::Return { .. }));
    assert!(matches!(parse_statement("5"), Statement::Expression { .. }));
}

#[test]
fn operator_precedence() {
    let cases = [("-a * b", "((-a) * b)"),
                 ("!-a", "(!(-a))"),
                 ("a + b + c", "((a + b) + c)"),
                 ("a + b - c", "((a + b) - c)"),
                 ("a * b * c", "((a * b) * c)"),
                 ("a * b / c", "((a * b) / c)"),
                 ("a + b / c", "(a + (b / c))"),
                 ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
                 ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
                 ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
                 ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
                 ("true", "true"),
                 ("3 > 5 == false", "((3 > 5) == false)"),
                 ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
                 ("(5 + 5) * 2", "((5 + 5) * 2)"),
                 ("2 / (5 + 5)", "(2 / (5 + 5))"),
                 ("-(5 + 5)", "(-(5 + 5))"),
                 ("!(true == true)", "(!(true == true))"),
                 ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
                 ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
                 ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
                 ("add(a * b[2], b[1], 2 * [1, 2][1])",
                  "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))")];

    for (source, expected) in cases {
        assert_eq!(parse_expression(source).to_string(), *expected, "for {source:?}");
    }
}

#[test]
fn if_expressions_parse() {
    let Expr::If { condition, consequence, alternative, .. } = parse_expression("if (x < y) { x }")
    else {
        panic!("expected an if expression");
    };

    assert_eq!(condition.to_string(), "(x < y)");
    assert_eq!(consequence.statements.len(), 1);
    assert!(alternative.is_none());

    let Expr::If { alternative, .. } = parse_expression("if (x < y) { x } else { y }") else {
        panic!("expected an if expression");
    };
    assert!(alternative.is_some());
}

#[test]
fn function_literals_parse_parameters() {
    let cases: [(&str, &[&str]); 3] = [("fn() {};", &[]),
                                       ("fn(x) {};", &["x"]),
                                       ("fn(x, y, z) {};", &["x", "y", "z"])];

    for (source, expected) in cases {
        let Expr::Function { parameters, .. } = parse_expression(source) else {
            panic!("expected a function literal for {source:?}");
        };
        assert_eq!(parameters, expected, "for {source:?}");
    }
}

#[test]
fn let_bound_functions_carry_their_name() {
    let Statement::Let { value: Expr::Function { name, .. }, .. } =
        parse_statement("let myFunction = fn() { };")
    else {
        panic!("expected a let-bound function literal");
    };
    assert_eq!(name, "myFunction");

    // Function literals anywhere else stay anonymous.
    let Expr::Function { name, .. } = parse_expression("fn() { };") else {
        panic!("expected a function literal");
    };
    assert!(name.is_empty());
}

#[test]
fn call_expressions_parse_arguments() {
    let Expr::Call { function, arguments, .. } = parse_expression("add(1, 2 * 3, 4 + 5);") else {
        panic!("expected a call expression");
    };

    assert_eq!(function.to_string(), "add");
    let rendered = arguments.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(rendered, vec!["1", "(2 * 3)", "(4 + 5)"]);
}

#[test]
fn collection_literals_parse() {
    let Expr::Array { elements, .. } = parse_expression("[1, 2 * 2, 3 + 3]") else {
        panic!("expected an array literal");
    };
    assert_eq!(elements.len(), 3);

    let Expr::Array { elements, .. } = parse_expression("[]") else {
        panic!("expected an array literal");
    };
    assert!(elements.is_empty());

    let Expr::Hash { pairs, .. } = parse_expression("{\"one\": 1, \"two\": 2}") else {
        panic!("expected a hash literal");
    };
    assert_eq!(pairs.len(), 2);

    let Expr::Hash { pairs, .. } = parse_expression("{}") else {
        panic!("expected a hash literal");
    };
    assert!(pairs.is_empty());
}

#[test]
fn tensor_literals_require_a_bracketed_shape() {
    let Expr::Tensor { shape, data, .. } = parse_expression("@[2, 2], [1.0, 2.0, 3.0, 4.0]")
    else {
        panic!("expected a tensor literal");
    };
    assert_eq!(shape.to_string(), "[2, 2]");
    assert_eq!(data.to_string(), "[1, 2, 3, 4]");

    // Anything but `[` after `@` is rejected.
    let mut parser = Parser::new("@2, [1.0];");
    parser.parse_program();
    let messages = parser.errors
                         .iter()
                         .map(ToString::to_string)
                         .collect::<Vec<_>>();
    assert!(messages.contains(&"On line 1, expected next token to be [, got INT instead".to_string()),
            "got {messages:?}");
}

#[test]
fn import_literals_take_the_path_up_to_the_semicolon() {
    let Expr::Import { path, .. } = parse_expression("import \"lib/helpers.tsr\";") else {
        panic!("expected an import literal");
    };
    assert_eq!(path, "lib/helpers.tsr");
}

#[test]
fn failed_productions_are_dropped() {
    let mut parser = Parser::new("let x 5; 42;");
    let program = parser.parse_program();

    // The broken let is dropped; parsing continues with what remains.
    assert!(!parser.errors.is_empty());
    assert!(program.statements
                   .iter()
                   .any(|s| matches!(s, Statement::Expression { expr: Expr::Integer { value: 42, .. }, .. })));
}
