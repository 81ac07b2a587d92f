// Escape-time evaluator: the Mandelbrot/Julia pixel loop.
//
// Julia-vs-Mandelbrot detection works by probing the AST's
// `initialValue` expression with a sentinel planted in
// `currentPixelX`: if the probe passes through unchanged, the initial
// value depends on the pixel and the set is Julia; otherwise it's
// Mandelbrot. The AST alone doesn't tag an expression as
// "depends on pixel", so this is evaluated rather than inspected
// structurally.

use crate::ast::Escape;
use crate::bitmap::Rgb;
use crate::context::{RenderContext, DEFAULT_MAX_ITERATIONS};
use crate::eval::eval_escape_expr;

const PROBE_SENTINEL: f64 = 123.456;
const PROBE_EPSILON: f64 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Mandelbrot,
    Julia,
}

fn detect_mode(escape: &Escape, ctx: &mut RenderContext) -> Mode {
    let saved_x = ctx.current_pixel_x;
    let saved_y = ctx.current_pixel_y;
    ctx.current_pixel_x = PROBE_SENTINEL;
    ctx.current_pixel_y = 0.0;

    let probed = eval_escape_expr(&escape.initial_value, ctx);

    ctx.current_pixel_x = saved_x;
    ctx.current_pixel_y = saved_y;

    if (probed - PROBE_SENTINEL).abs() < PROBE_EPSILON {
        Mode::Julia
    } else {
        Mode::Mandelbrot
    }
}

pub fn run_escape(escape: &Escape, ctx: &mut RenderContext) {
    let mode = detect_mode(escape, ctx);
    let max_iter = escape.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS).max(0) as u32;

    for py in 0..ctx.height {
        for px in 0..ctx.width {
            let x0 = ctx.min_x + (px as f64) * (ctx.max_x - ctx.min_x) / ctx.width as f64;
            let y0 = ctx.min_y + (py as f64) * (ctx.max_y - ctx.min_y) / ctx.height as f64;

            let (mut zx, mut zy, cx, cy) = match mode {
                Mode::Mandelbrot => (0.0, 0.0, x0, y0),
                Mode::Julia => (x0, y0, -0.8, 0.156),
            };

            let mut iter = 0;
            while zx * zx + zy * zy <= 4.0 && iter < max_iter {
                let xtemp = zx * zx - zy * zy + cx;
                zy = 2.0 * zx * zy + cy;
                zx = xtemp;
                iter += 1;
            }

            let color = if iter < max_iter {
                let t = ((iter as f64) / (max_iter.max(1) as f64)).sqrt();
                Rgb::lerp(ctx.color_start, ctx.color_end, t)
            } else {
                ctx.color_end
            };

            ctx.bitmap.set_pixel(px as i64, py as i64, color);
        }
    }
}
