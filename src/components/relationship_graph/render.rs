use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::state::{RelationshipGraphState, curve_control};

const EDGE_COLOR: (u8, u8, u8) = (100, 180, 255);
const ARROW_SIZE: f64 = 8.0;

pub fn render(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let positions = collect_positions(state);
	draw_edges(state, ctx, &positions);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn collect_positions(state: &RelationshipGraphState) -> HashMap<DefaultNodeIdx, (f64, f64)> {
	let mut positions = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});
	positions
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}

fn draw_edges(
	state: &RelationshipGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let k = state.transform.k;
	let hovering = state.hover.node.is_some();
	let (line_width, arrow_size) = (1.5 / k, ARROW_SIZE / k);

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.from), positions.get(&edge.to))
		else {
			continue;
		};
		let dist = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
		if dist < 0.001 {
			continue;
		}

		let highlighted = state.is_highlighted(edge.from) && state.is_highlighted(edge.to);
		let alpha = if !hovering {
			0.55
		} else if highlighted {
			0.9
		} else {
			0.15
		};

		let (cx, cy) = curve_control(x1, y1, x2, y2, edge.curvature);
		ctx.set_stroke_style_str(&rgba(EDGE_COLOR, alpha));
		ctx.set_line_width(if highlighted { line_width * 1.4 } else { line_width });
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.quadratic_curve_to(cx, cy, x2, y2);
		ctx.stroke();

		draw_arrowhead(state, ctx, (cx, cy), (x2, y2), edge.to, arrow_size, alpha);
	}
}

/// Arrowhead at the target end, pulled back to the node's rim and oriented
/// along the curve's final tangent (control point -> endpoint).
fn draw_arrowhead(
	state: &RelationshipGraphState,
	ctx: &CanvasRenderingContext2d,
	control: (f64, f64),
	end: (f64, f64),
	target: DefaultNodeIdx,
	arrow_size: f64,
	alpha: f64,
) {
	let mut target_radius = 0.0;
	state.graph.visit_nodes(|node| {
		if node.index() == target {
			target_radius = node.data.user_data.radius;
		}
	});

	let (dx, dy) = (end.0 - control.0, end.1 - control.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (tip_x, tip_y) = (end.0 - ux * target_radius, end.1 - uy * target_radius);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);

	ctx.set_fill_style_str(&rgba(EDGE_COLOR, alpha));
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &RelationshipGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let hovering = state.hover.node.is_some();

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let highlighted = state.is_highlighted(idx);
		let alpha = if hovering && !highlighted { 0.3 } else { 1.0 };

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		if state.hover.node == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
		ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
		let _ = ctx.fill_text(&info.label, x + info.radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	});
}
