use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{Primitive, Scene, TextAlign};

const LABEL_FONT: &str = "JetBrains Mono, monospace";

pub fn render(scene: &Scene, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.clear_rect(0.0, 0.0, width, height);
	for primitive in scene.primitives() {
		draw(primitive, ctx);
	}
}

fn draw(primitive: &Primitive, ctx: &CanvasRenderingContext2d) {
	match primitive {
		Primitive::Line {
			x1,
			y1,
			x2,
			y2,
			color,
			opacity,
			width,
		} => {
			ctx.set_global_alpha(*opacity);
			ctx.set_stroke_style_str(color);
			ctx.set_line_width(*width);
			ctx.begin_path();
			ctx.move_to(*x1, *y1);
			ctx.line_to(*x2, *y2);
			ctx.stroke();
			ctx.set_global_alpha(1.0);
		}
		Primitive::Circle {
			cx,
			cy,
			r,
			fill,
			stroke,
			stroke_width,
		} => {
			ctx.begin_path();
			let _ = ctx.arc(*cx, *cy, *r, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(fill);
			ctx.fill();
			ctx.set_stroke_style_str(stroke);
			ctx.set_line_width(*stroke_width);
			ctx.stroke();
		}
		Primitive::Ring {
			cx,
			cy,
			r,
			color,
			width,
			dash,
			angle,
		} => {
			ctx.save();
			let _ = ctx.translate(*cx, *cy);
			let _ = ctx.rotate(*angle);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash.0),
				&JsValue::from_f64(dash.1),
			));
			ctx.set_stroke_style_str(color);
			ctx.set_line_width(*width);
			ctx.begin_path();
			let _ = ctx.arc(0.0, 0.0, *r, 0.0, 2.0 * PI);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.restore();
		}
		Primitive::Text {
			x,
			y,
			text,
			size,
			color,
			align,
		} => {
			ctx.set_fill_style_str(color);
			ctx.set_font(&format!("{}px {}", size, LABEL_FONT));
			ctx.set_text_align(match align {
				TextAlign::Start => "start",
				TextAlign::Center => "center",
			});
			let _ = ctx.fill_text(text, *x, *y);
		}
	}
}
