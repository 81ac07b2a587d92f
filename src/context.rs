// Render context: the per-`generate`-call state shared by every
// interpreter stage — canvas, view, colors, scope stack and PRNG.
//
// The scope stack is a flat `Vec` pushed/popped in lockstep with
// `rule_vm::execute_rule`, rather than a linked parent-chain `Env`:
// the rule VM binds and unbinds a fixed number of entries per call,
// which a plain vector expresses more directly than a parent-chained
// scope built for lexical closures.

use crate::ast::{Color, Program, Size, View};
use crate::bitmap::{Bitmap, Rgb};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_WIDTH: usize = 1920;
pub const DEFAULT_HEIGHT: usize = 1080;
pub const DEFAULT_VIEW_MIN: f64 = -2.0;
pub const DEFAULT_VIEW_MAX: f64 = 2.0;
pub const DEFAULT_NUM_POINTS: usize = 100_000;
pub const DEFAULT_MAX_ITERATIONS: i64 = 1000;

pub struct RenderContext {
    pub width: usize,
    pub height: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub color_start: Rgb,
    pub color_end: Rgb,
    pub bitmap: Bitmap,
    pub scope: Vec<(String, f64)>,
    pub current_pixel_x: f64,
    pub current_pixel_y: f64,
    pub num_points: usize,
    pub rng: SmallRng,
}

impl RenderContext {
    pub fn new(program: &Program) -> RenderContext {
        Self::with_seed(program, random_seed())
    }

    pub fn with_seed(program: &Program, seed: u64) -> RenderContext {
        let Size { width, height } = program
            .size()
            .copied()
            .unwrap_or(Size { width: DEFAULT_WIDTH as i64, height: DEFAULT_HEIGHT as i64 });
        let width = width.max(0) as usize;
        let height = height.max(0) as usize;

        let (min_x, max_x, min_y, max_y) = match program.view() {
            Some(View { x, y }) => (
                eval_const(&x.start),
                eval_const(&x.end),
                eval_const(&y.start),
                eval_const(&y.end),
            ),
            None => (DEFAULT_VIEW_MIN, DEFAULT_VIEW_MAX, DEFAULT_VIEW_MIN, DEFAULT_VIEW_MAX),
        };

        let (color_start, color_end) = match program.color() {
            Some(Color { start, end }) => (parse_color(start), parse_color(end)),
            None => (Rgb { r: 0, g: 0, b: 0 }, Rgb { r: 255, g: 255, b: 255 }),
        };

        let mut bitmap = Bitmap::new(width, height);
        bitmap.clear(color_start);

        RenderContext {
            width,
            height,
            min_x,
            max_x,
            min_y,
            max_y,
            color_start,
            color_end,
            bitmap,
            scope: Vec::new(),
            current_pixel_x: 0.0,
            current_pixel_y: 0.0,
            num_points: DEFAULT_NUM_POINTS,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Innermost-first lookup; unresolved names evaluate to 0.0 (the
    /// validator is expected to have already rejected anything that
    /// would hit this path at render time).
    pub fn lookup(&self, name: &str) -> f64 {
        self.scope
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    pub fn push_bindings(&mut self, bindings: Vec<(String, f64)>) -> usize {
        let n = bindings.len();
        self.scope.extend(bindings);
        n
    }

    pub fn pop_bindings(&mut self, n: usize) {
        let new_len = self.scope.len().saturating_sub(n);
        self.scope.truncate(new_len);
    }

    /// World-to-pixel mapping. A degenerate range maps to 0.
    pub fn map_x(&self, wx: f64) -> i64 {
        if self.max_x == self.min_x {
            return 0;
        }
        (((wx - self.min_x) / (self.max_x - self.min_x)) * (self.width.saturating_sub(1) as f64))
            .floor() as i64
    }

    pub fn map_y(&self, wy: f64) -> i64 {
        if self.max_y == self.min_y {
            return 0;
        }
        (((wy - self.min_y) / (self.max_y - self.min_y)) * (self.height.saturating_sub(1) as f64))
            .floor() as i64
    }
}

fn eval_const(expr: &crate::ast::Expression) -> f64 {
    // View bounds are evaluated with an empty scope: they may only
    // reference constants, per the grammar (no variables are in scope
    // at the top level).
    crate::eval::eval_expr_with_scope(expr, &[])
}

fn random_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// 6 hex digits, optionally preceded by `#`. Anything else is black.
/// A bare hex string without the leading `#` is accepted.
pub fn parse_color(text: &str) -> Rgb {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 {
        return Rgb::BLACK;
    }
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    match (byte(0..2), byte(2..4), byte(4..6)) {
        (Some(r), Some(g), Some(b)) => Rgb { r, g, b },
        _ => Rgb::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn defaults_when_program_is_empty() {
        let program = Program::new(vec![]);
        let ctx = RenderContext::with_seed(&program, 1);
        assert_eq!(ctx.width, DEFAULT_WIDTH);
        assert_eq!(ctx.height, DEFAULT_HEIGHT);
        assert_eq!(ctx.min_x, DEFAULT_VIEW_MIN);
        assert_eq!(ctx.num_points, DEFAULT_NUM_POINTS);
    }

    #[test]
    fn scope_push_pop_is_symmetric() {
        let program = Program::new(vec![]);
        let mut ctx = RenderContext::with_seed(&program, 1);
        let depth_before = ctx.scope.len();
        let n = ctx.push_bindings(vec![("x".into(), 1.0), ("y".into(), 2.0)]);
        assert_eq!(ctx.lookup("x"), 1.0);
        ctx.pop_bindings(n);
        assert_eq!(ctx.scope.len(), depth_before);
        assert_eq!(ctx.lookup("x"), 0.0);
    }

    #[test]
    fn coordinate_round_trip_stays_in_canvas() {
        let program = Program::new(vec![
            Node::new(Sentence::Size(Size { width: 100, height: 100 })),
            Node::new(Sentence::View(View {
                x: Range { start: Expression::int(-1), end: Expression::int(1) },
                y: Range { start: Expression::int(-1), end: Expression::int(1) },
            })),
        ]);
        let ctx = RenderContext::with_seed(&program, 1);
        for i in -10..=10 {
            let wx = i as f64 / 10.0;
            let wy = i as f64 / 10.0;
            let px = ctx.map_x(wx);
            let py = ctx.map_y(wy);
            assert!(px >= 0 && (px as usize) < ctx.width);
            assert!(py >= 0 && (py as usize) < ctx.height);
        }
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let program = Program::new(vec![Node::new(Sentence::View(View {
            x: Range { start: Expression::int(1), end: Expression::int(1) },
            y: Range { start: Expression::int(1), end: Expression::int(1) },
        }))]);
        let ctx = RenderContext::with_seed(&program, 1);
        assert_eq!(ctx.map_x(1.0), 0);
        assert_eq!(ctx.map_y(1.0), 0);
    }

    #[test]
    fn color_parsing() {
        assert_eq!(parse_color("#FF0000"), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(parse_color("00FF00"), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(parse_color("not-a-color"), Rgb::BLACK);
    }
}
