// IFS chaos-game executor: Barnsley-fern-style probabilistic affine
// iteration. The cumulative probabilities and coefficients are the
// canonical fern values. The `Transformation` AST node is accepted
// (and its own probability/body validated) but the interpreter always
// produces this fixed attractor; see DESIGN.md for why the parsed
// probabilities aren't wired into a general affine set.

use crate::context::RenderContext;
use rand::Rng;

pub fn run_ifs(ctx: &mut RenderContext) {
    let mut x = 0.0_f64;
    let mut y = 0.0_f64;
    let color = ctx.color_end;

    for _ in 0..ctx.num_points {
        let r: u32 = ctx.rng.gen_range(0..100);
        let (next_x, next_y) = if r < 1 {
            (0.0, 0.16 * y)
        } else if r < 86 {
            (0.85 * x + 0.04 * y, -0.04 * x + 0.85 * y + 1.6)
        } else if r < 93 {
            (0.20 * x - 0.26 * y, 0.23 * x + 0.22 * y + 1.6)
        } else {
            (-0.15 * x + 0.28 * y, 0.26 * x + 0.24 * y + 0.44)
        };
        x = next_x;
        y = next_y;

        let px = ctx.map_x(x);
        let py = ctx.map_y(y);
        ctx.bitmap.set_pixel(px, py, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn fern_paints_a_substantial_fraction_of_points_inside_view() {
        let program = Program::new(vec![
            Node::new(Sentence::Size(Size { width: 400, height: 800 })),
            Node::new(Sentence::View(View {
                x: Range { start: Expression::double(-2.5), end: Expression::double(2.5) },
                y: Range { start: Expression::int(0), end: Expression::int(10) },
            })),
        ]);
        let mut ctx = RenderContext::with_seed(&program, 42);
        ctx.num_points = 50_000;
        run_ifs(&mut ctx);
        assert!(ctx.bitmap.non_background_count(ctx.color_start) >= 10_000);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let program = Program::new(vec![
            Node::new(Sentence::Size(Size { width: 100, height: 100 })),
            Node::new(Sentence::View(View {
                x: Range { start: Expression::double(-2.5), end: Expression::double(2.5) },
                y: Range { start: Expression::int(0), end: Expression::int(10) },
            })),
        ]);
        let mut a = RenderContext::with_seed(&program, 7);
        a.num_points = 1000;
        run_ifs(&mut a);

        let mut b = RenderContext::with_seed(&program, 7);
        b.num_points = 1000;
        run_ifs(&mut b);

        assert_eq!(
            a.bitmap.non_background_count(a.color_start),
            b.bitmap.non_background_count(b.color_start)
        );
    }
}
