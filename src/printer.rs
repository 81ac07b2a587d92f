// Human-readable dump of the AST. Side-effect-free: never mutates
// the tree it walks, used both by `--dump-ast` and by tests that want
// to assert on shape without depending on derived `Debug` field order.

use crate::ast::*;
use std::fmt::Write;

pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    for sentence in &program.sentences {
        print_sentence(sentence, &mut out, 0);
        out.push('\n');
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn print_sentence(sentence: &Sentence, out: &mut String, depth: usize) {
    indent(out, depth);
    match sentence {
        Sentence::View(v) => {
            write!(
                out,
                "(view [{} {}] [{} {}])",
                print_expr(&v.x.start),
                print_expr(&v.x.end),
                print_expr(&v.y.start),
                print_expr(&v.y.end)
            )
            .unwrap();
        }
        Sentence::Size(s) => {
            write!(out, "(size {} {})", s.width, s.height).unwrap();
        }
        Sentence::Color(c) => {
            write!(out, "(color {} {})", c.start, c.end).unwrap();
        }
        Sentence::Start(s) => {
            write!(out, "(start {})", s.name).unwrap();
        }
        Sentence::Expression(e) => {
            write!(out, "{}", print_expr(e)).unwrap();
        }
        Sentence::Rule(r) => {
            write!(out, "(rule {} ({})", r.name, r.params.join(" ")).unwrap();
            out.push('\n');
            for stmt in &r.body {
                print_rule_sentence(stmt, out, depth + 1);
                out.push('\n');
            }
            indent(out, depth);
            out.push(')');
        }
    }
}

fn print_rule_sentence(sentence: &RuleSentence, out: &mut String, depth: usize) {
    indent(out, depth);
    match sentence {
        RuleSentence::Polygon(p) => {
            let pts: Vec<String> = p
                .points
                .iter()
                .map(|pt| format!("({} {})", print_expr(&pt.x), print_expr(&pt.y)))
                .collect();
            write!(out, "(polygon {})", pts.join(" ")).unwrap();
        }
        RuleSentence::Call(c) => {
            let args: Vec<String> = c.args.iter().map(|a| print_expr(a)).collect();
            write!(out, "(call {} {})", c.callee, args.join(" ")).unwrap();
        }
        RuleSentence::If(i) => {
            write!(out, "(if {})", print_expr(&i.condition)).unwrap();
        }
        RuleSentence::Escape(e) => {
            let max_iterations = e
                .max_iterations
                .map(|n| n.to_string())
                .unwrap_or_else(|| "default".to_string());
            write!(
                out,
                "(escape {} := {} until {} recur {} max {})",
                e.variable,
                print_escape_expr(&e.initial_value),
                print_escape_expr(&e.until_condition),
                print_escape_expr(&e.recursive_assignment),
                max_iterations
            )
            .unwrap();
        }
        RuleSentence::Transformation(t) => {
            write!(out, "(transformation {} [{} sentences])", t.probability, t.body.len()).unwrap();
        }
        RuleSentence::PointsStatement(p) => {
            write!(out, "(points {})", p.count).unwrap();
        }
    }
}

fn print_expr(expr: &Expression) -> String {
    match expr {
        Expression::Addition(l, r) => format!("(+ {} {})", print_expr(l), print_expr(r)),
        Expression::Subtraction(l, r) => format!("(- {} {})", print_expr(l), print_expr(r)),
        Expression::Multiplication(l, r) => format!("(* {} {})", print_expr(l), print_expr(r)),
        Expression::Division(l, r) => format!("(/ {} {})", print_expr(l), print_expr(r)),
        Expression::LowerThan(l, r) => format!("(< {} {})", print_expr(l), print_expr(r)),
        Expression::GreaterThan(l, r) => format!("(> {} {})", print_expr(l), print_expr(r)),
        Expression::AbsoluteValue(e) => format!("(abs {})", print_expr(e)),
        Expression::Factor(f) => print_factor(f),
    }
}

fn print_factor(factor: &Factor) -> String {
    match factor {
        Factor::IntegerConstant(v) => v.to_string(),
        Factor::DoubleConstant(v) => v.to_string(),
        Factor::Variable(name) => name.clone(),
        Factor::NestedExpression(e) => format!("({})", print_expr(e)),
        Factor::XPixelCoord => "x".to_string(),
        Factor::YPixelCoord => "y".to_string(),
        Factor::Range(s, e) => format!("[{} {}]", print_expr(s), print_expr(e)),
    }
}

fn print_escape_expr(expr: &EscapeExpression) -> String {
    match expr {
        EscapeExpression::Addition(l, r) => {
            format!("(+ {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::Subtraction(l, r) => {
            format!("(- {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::Multiplication(l, r) => {
            format!("(* {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::Division(l, r) => {
            format!("(/ {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::LowerThan(l, r) => {
            format!("(< {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::GreaterThan(l, r) => {
            format!("(> {} {})", print_escape_expr(l), print_escape_expr(r))
        }
        EscapeExpression::AbsoluteValue(e) => format!("(abs {})", print_escape_expr(e)),
        EscapeExpression::Factor(f) => print_escape_factor(f),
    }
}

fn print_escape_factor(factor: &EscapeFactor) -> String {
    match factor {
        EscapeFactor::IntegerConstant(v) => v.to_string(),
        EscapeFactor::DoubleConstant(v) => v.to_string(),
        EscapeFactor::Variable(name) => name.clone(),
        EscapeFactor::NestedExpression(e) => format!("({})", print_escape_expr(e)),
        EscapeFactor::XPixelCoord => "x".to_string(),
        EscapeFactor::YPixelCoord => "y".to_string(),
        EscapeFactor::Range(s, e) => format!("[{} {}]", print_escape_expr(s), print_escape_expr(e)),
    }
}
