// Front-end driver: turns source text into a `Program`, wrapping
// `grammar.lalrpop`'s generated `ProgramParser` behind a small
// `thiserror` error type so callers never see lalrpop's own
// `ParseError<Location, Token, Error>` generic.

use crate::ast::{EscapeExpression, EscapeFactor, Expression, Factor, Node};
use crate::lexer::Lexer;
use lalrpop_util::lalrpop_mod;
use lalrpop_util::ParseError as LalrpopError;
use thiserror::Error;

lalrpop_mod!(#[allow(clippy::all)] pub grammar);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected token '{token}'")]
    UnexpectedToken { token: String },
    #[error("{0}")]
    Lexical(#[from] crate::lexer::LexError),
    #[error("extra token '{token}' after a complete program")]
    ExtraToken { token: String },
}

pub fn parse_program(source: &str) -> Result<crate::ast::Program, ParseError> {
    let lexer = Lexer::new(source);
    grammar::ProgramParser::new()
        .parse(lexer)
        .map_err(convert_error)
}

fn convert_error(
    err: LalrpopError<usize, crate::lexer::Tok<'_>, crate::lexer::LexError>,
) -> ParseError {
    match err {
        LalrpopError::InvalidToken { .. } => ParseError::UnexpectedToken { token: "?".into() },
        LalrpopError::UnrecognizedEof { .. } => ParseError::UnexpectedEof,
        LalrpopError::UnrecognizedToken { token: (_, tok, _), .. } => {
            ParseError::UnexpectedToken { token: format!("{:?}", tok) }
        }
        LalrpopError::ExtraToken { token: (_, tok, _) } => {
            ParseError::ExtraToken { token: format!("{:?}", tok) }
        }
        LalrpopError::User { error } => ParseError::Lexical(error),
    }
}

/// Folds a literal unary minus into its constant rather than building
/// a `Subtraction(0, ...)` node, so `-1` round-trips as the same
/// `IntegerConstant`/`DoubleConstant` a non-negated literal would.
pub fn negate(e: Node<Expression>) -> Node<Expression> {
    match e.as_ref() {
        Expression::Factor(Factor::IntegerConstant(v)) => Expression::int(-v),
        Expression::Factor(Factor::DoubleConstant(v)) => Expression::double(-v),
        _ => Node::new(Expression::Subtraction(Expression::int(0), e)),
    }
}

/// Converts a parsed `Expression` tree into the parallel
/// `EscapeExpression` tree an `escape { ... }` block's fields require
/// (see `ast.rs`'s note on why the two types are kept distinct).
pub fn escape_expr(expr: &Expression) -> Node<EscapeExpression> {
    match expr {
        Expression::Addition(l, r) => Node::new(EscapeExpression::Addition(escape_expr(l), escape_expr(r))),
        Expression::Subtraction(l, r) => Node::new(EscapeExpression::Subtraction(escape_expr(l), escape_expr(r))),
        Expression::Multiplication(l, r) => {
            Node::new(EscapeExpression::Multiplication(escape_expr(l), escape_expr(r)))
        }
        Expression::Division(l, r) => Node::new(EscapeExpression::Division(escape_expr(l), escape_expr(r))),
        Expression::LowerThan(l, r) => Node::new(EscapeExpression::LowerThan(escape_expr(l), escape_expr(r))),
        Expression::GreaterThan(l, r) => Node::new(EscapeExpression::GreaterThan(escape_expr(l), escape_expr(r))),
        Expression::AbsoluteValue(e) => Node::new(EscapeExpression::AbsoluteValue(escape_expr(e))),
        Expression::Factor(f) => Node::new(EscapeExpression::Factor(escape_factor(f))),
    }
}

fn escape_factor(factor: &Factor) -> EscapeFactor {
    match factor {
        Factor::IntegerConstant(v) => EscapeFactor::IntegerConstant(*v),
        Factor::DoubleConstant(v) => EscapeFactor::DoubleConstant(*v),
        Factor::Variable(name) => EscapeFactor::Variable(name.clone()),
        Factor::NestedExpression(e) => EscapeFactor::NestedExpression(escape_expr(e)),
        Factor::XPixelCoord => EscapeFactor::XPixelCoord,
        Factor::YPixelCoord => EscapeFactor::YPixelCoord,
        Factor::Range(s, e) => EscapeFactor::Range(escape_expr(s), escape_expr(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Sentence;

    #[test]
    fn parses_size_view_color_and_start() {
        let program = parse_program(
            "size 100 100;\nview [-1, 1] x [-1, 1];\ncolor #000000 #FFFFFF;\nstart T;",
        )
        .unwrap();
        assert_eq!(program.size().unwrap().width, 100);
        assert_eq!(program.view().unwrap().x.start, Expression::int(-1));
        assert_eq!(program.color().unwrap().start, "#000000");
        assert_eq!(program.start().unwrap().name, "T");
    }

    #[test]
    fn parses_a_triangle_rule() {
        let program = parse_program(
            "rule T { polygon (-0.5, -0.5), (0.5, -0.5), (0, 0.5); }\nstart T;",
        )
        .unwrap();
        let rule = program.rule("T").unwrap();
        assert_eq!(rule.body.len(), 1);
        match rule.body[0].as_ref() {
            crate::ast::RuleSentence::Polygon(p) => assert_eq!(p.points.len(), 3),
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn parses_recursive_call_and_if() {
        let program = parse_program(
            "rule L(n) { if n > 5; polygon (0,0),(1,0),(1,1); call L(n + 1); }",
        )
        .unwrap();
        let rule = program.rule("L").unwrap();
        assert_eq!(rule.params, vec!["n".to_string()]);
        assert_eq!(rule.body.len(), 3);
    }

    #[test]
    fn parses_escape_block() {
        let program = parse_program(
            "rule M { escape { z := 0; z := z * z + c; until |z| > 2; 50 iterations; } }",
        )
        .unwrap();
        let rule = program.rule("M").unwrap();
        match rule.body[0].as_ref() {
            crate::ast::RuleSentence::Escape(e) => {
                assert_eq!(e.variable, "z");
                assert_eq!(e.max_iterations, Some(50));
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn escape_block_without_an_iterations_clause_defaults_to_none() {
        let program = parse_program(
            "rule M { escape { z := 0; z := z * z + c; until |z| > 2; } }",
        )
        .unwrap();
        let rule = program.rule("M").unwrap();
        match rule.body[0].as_ref() {
            crate::ast::RuleSentence::Escape(e) => assert_eq!(e.max_iterations, None),
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn parses_transformation_block() {
        let program = parse_program(
            "rule F { transformation 85 { scale(0.85, 0.85); } }",
        )
        .unwrap();
        let rule = program.rule("F").unwrap();
        match rule.body[0].as_ref() {
            crate::ast::RuleSentence::Transformation(t) => {
                assert_eq!(t.probability, 85);
                assert_eq!(t.body.len(), 1);
            }
            other => panic!("expected transformation, got {:?}", other),
        }
    }

    #[test]
    fn pixel_coordinates_parse_distinctly_from_the_view_separator() {
        let program = parse_program(
            "rule J { escape { z := pixelX + pixelY; z := z; until |z| > 2; 10 iterations; } }",
        )
        .unwrap();
        let rule = program.rule("J").unwrap();
        match rule.body[0].as_ref() {
            crate::ast::RuleSentence::Escape(e) => {
                assert_eq!(
                    *e.initial_value,
                    EscapeExpression::Addition(
                        EscapeExpression::factor(EscapeFactor::XPixelCoord),
                        EscapeExpression::factor(EscapeFactor::YPixelCoord),
                    )
                );
            }
            other => panic!("expected escape, got {:?}", other),
        }
    }

    #[test]
    fn malformed_program_is_a_parse_error() {
        assert!(parse_program("size 100;").is_err());
    }

    #[test]
    fn unknown_character_surfaces_as_lexical_error() {
        let err = parse_program("size 1 1; @").unwrap_err();
        assert!(matches!(err, ParseError::Lexical(_)));
    }

    #[test]
    fn unused_sentence_variant_compiles() {
        // `Sentence::Expression` exists in the AST for host-embedding
        // use cases but has no surface syntax of its own.
        let _ = Sentence::Expression(Expression::int(0));
    }
}
