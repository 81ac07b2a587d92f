// Expression evaluator: a pure function of an `Expression`/
// `EscapeExpression` and the current scope, returning a `double`.
// Division by zero and unresolved variables are non-trapping — the
// validator is responsible for catching those cases statically; the
// evaluator just degrades to 0.0 rather than panicking.

use crate::ast::{EscapeExpression, EscapeFactor, Expression, Factor};
use crate::context::RenderContext;

type Scope = [(String, f64)];

pub fn eval_expr(expr: &Expression, ctx: &RenderContext) -> f64 {
    eval_expr_with_pixel(expr, &ctx.scope, (ctx.current_pixel_x, ctx.current_pixel_y))
}

/// For contexts without a live pixel (e.g. evaluating `view` bounds,
/// which are constant expressions by convention): `x`/`y` read as 0.0.
pub fn eval_expr_with_scope(expr: &Expression, scope: &Scope) -> f64 {
    eval_expr_with_pixel(expr, scope, (0.0, 0.0))
}

fn eval_expr_with_pixel(expr: &Expression, scope: &Scope, pixel: (f64, f64)) -> f64 {
    match expr {
        Expression::Addition(l, r) => {
            eval_expr_with_pixel(l, scope, pixel) + eval_expr_with_pixel(r, scope, pixel)
        }
        Expression::Subtraction(l, r) => {
            eval_expr_with_pixel(l, scope, pixel) - eval_expr_with_pixel(r, scope, pixel)
        }
        Expression::Multiplication(l, r) => {
            eval_expr_with_pixel(l, scope, pixel) * eval_expr_with_pixel(r, scope, pixel)
        }
        Expression::Division(l, r) => {
            let rhs = eval_expr_with_pixel(r, scope, pixel);
            if rhs != 0.0 {
                eval_expr_with_pixel(l, scope, pixel) / rhs
            } else {
                0.0
            }
        }
        Expression::LowerThan(l, r) => {
            if eval_expr_with_pixel(l, scope, pixel) < eval_expr_with_pixel(r, scope, pixel) {
                1.0
            } else {
                0.0
            }
        }
        Expression::GreaterThan(l, r) => {
            if eval_expr_with_pixel(l, scope, pixel) > eval_expr_with_pixel(r, scope, pixel) {
                1.0
            } else {
                0.0
            }
        }
        Expression::AbsoluteValue(e) => eval_expr_with_pixel(e, scope, pixel).abs(),
        Expression::Factor(f) => eval_factor(f, scope, pixel),
    }
}

fn eval_factor(factor: &Factor, scope: &Scope, pixel: (f64, f64)) -> f64 {
    match factor {
        Factor::IntegerConstant(v) => *v as f64,
        Factor::DoubleConstant(v) => *v,
        Factor::Variable(name) => lookup(scope, name),
        Factor::NestedExpression(e) => eval_expr_with_pixel(e, scope, pixel),
        Factor::XPixelCoord => pixel.0,
        Factor::YPixelCoord => pixel.1,
        Factor::Range(start, _end) => eval_expr_with_pixel(start, scope, pixel),
    }
}

fn lookup(scope: &Scope, name: &str) -> f64 {
    scope.iter().rev().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap_or(0.0)
}

/// Parallel evaluator for `EscapeExpression`/`EscapeFactor`, with the
/// same operator semantics as `eval_expr`.
pub fn eval_escape_expr(expr: &EscapeExpression, ctx: &RenderContext) -> f64 {
    eval_escape_with_pixel(expr, &ctx.scope, (ctx.current_pixel_x, ctx.current_pixel_y))
}

fn eval_escape_with_pixel(expr: &EscapeExpression, scope: &Scope, pixel: (f64, f64)) -> f64 {
    match expr {
        EscapeExpression::Addition(l, r) => {
            eval_escape_with_pixel(l, scope, pixel) + eval_escape_with_pixel(r, scope, pixel)
        }
        EscapeExpression::Subtraction(l, r) => {
            eval_escape_with_pixel(l, scope, pixel) - eval_escape_with_pixel(r, scope, pixel)
        }
        EscapeExpression::Multiplication(l, r) => {
            eval_escape_with_pixel(l, scope, pixel) * eval_escape_with_pixel(r, scope, pixel)
        }
        EscapeExpression::Division(l, r) => {
            let rhs = eval_escape_with_pixel(r, scope, pixel);
            if rhs != 0.0 {
                eval_escape_with_pixel(l, scope, pixel) / rhs
            } else {
                0.0
            }
        }
        EscapeExpression::LowerThan(l, r) => {
            if eval_escape_with_pixel(l, scope, pixel) < eval_escape_with_pixel(r, scope, pixel) {
                1.0
            } else {
                0.0
            }
        }
        EscapeExpression::GreaterThan(l, r) => {
            if eval_escape_with_pixel(l, scope, pixel) > eval_escape_with_pixel(r, scope, pixel) {
                1.0
            } else {
                0.0
            }
        }
        EscapeExpression::AbsoluteValue(e) => eval_escape_with_pixel(e, scope, pixel).abs(),
        EscapeExpression::Factor(f) => eval_escape_factor(f, scope, pixel),
    }
}

fn eval_escape_factor(factor: &EscapeFactor, scope: &Scope, pixel: (f64, f64)) -> f64 {
    match factor {
        EscapeFactor::IntegerConstant(v) => *v as f64,
        EscapeFactor::DoubleConstant(v) => *v,
        EscapeFactor::Variable(name) => lookup(scope, name),
        EscapeFactor::NestedExpression(e) => eval_escape_with_pixel(e, scope, pixel),
        EscapeFactor::XPixelCoord => pixel.0,
        EscapeFactor::YPixelCoord => pixel.1,
        EscapeFactor::Range(start, _end) => eval_escape_with_pixel(start, scope, pixel),
    }
}
