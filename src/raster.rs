// Polygon rasterizer: Bresenham integer line drawing of a closed
// polyline in the foreground color.

use crate::ast::Polygon;
use crate::context::RenderContext;
use crate::eval::eval_expr;

pub fn draw_polygon(polygon: &Polygon, ctx: &mut RenderContext) {
    if polygon.points.len() < 2 {
        return;
    }

    let pixels: Vec<(i64, i64)> = polygon
        .points
        .iter()
        .map(|p| {
            let x = eval_expr(&p.x, ctx);
            let y = eval_expr(&p.y, ctx);
            (ctx.map_x(x), ctx.map_y(y))
        })
        .collect();

    let color = ctx.color_end;
    for window in pixels.windows(2) {
        draw_line(ctx, window[0], window[1], color);
    }
    draw_line(ctx, *pixels.last().unwrap(), pixels[0], color);
}

fn draw_line(
    ctx: &mut RenderContext,
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    color: crate::bitmap::Rgb,
) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        ctx.bitmap.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
