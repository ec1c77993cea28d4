use std::f64::consts::PI;

use super::simulation::Simulation;
use super::types::ConceptGroup;

pub const LINK_COLOR: &str = "#52525b";
pub const LINK_OPACITY: f64 = 0.6;
pub const NODE_STROKE: &str = "#fff";
pub const NODE_STROKE_WIDTH: f64 = 1.5;
pub const LABEL_COLOR: &str = "#e4e4e7";
pub const LABEL_OFFSET: (f64, f64) = (15.0, 4.0);

pub const SPINNER_COLOR: &str = "#6366f1";
pub const SPINNER_RADIUS: f64 = 40.0;
pub const SPINNER_WIDTH: f64 = 2.0;
pub const SPINNER_DASH: (f64, f64) = (10.0, 5.0);
pub const SPINNER_PERIOD: f64 = 2.0;
pub const CAPTION_COLOR: &str = "#a1a1aa";
pub const CAPTION_TEXT: &str = "CALCULATING ISOMORPHISM...";
pub const CAPTION_OFFSET: f64 = 60.0;
pub const CAPTION_SIZE: f64 = 12.0;

pub fn group_color(group: ConceptGroup) -> &'static str {
	match group {
		ConceptGroup::DomainA => "#0ea5e9",
		ConceptGroup::DomainB => "#ec4899",
		ConceptGroup::Bridge => "#8b5cf6",
	}
}

pub fn label_size(group: ConceptGroup) -> f64 {
	match group {
		ConceptGroup::Bridge => 12.0,
		_ => 10.0,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextAlign {
	Start,
	Center,
}

/// One drawable shape, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
	Line {
		x1: f64,
		y1: f64,
		x2: f64,
		y2: f64,
		color: &'static str,
		opacity: f64,
		width: f64,
	},
	Circle {
		cx: f64,
		cy: f64,
		r: f64,
		fill: &'static str,
		stroke: &'static str,
		stroke_width: f64,
	},
	/// Dashed, unfilled ring rotated by `angle` radians.
	Ring {
		cx: f64,
		cy: f64,
		r: f64,
		color: &'static str,
		width: f64,
		dash: (f64, f64),
		angle: f64,
	},
	Text {
		x: f64,
		y: f64,
		text: String,
		size: f64,
		color: &'static str,
		align: TextAlign,
	},
}

/// Everything the host needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
	Loading(Vec<Primitive>),
	Empty,
	Populated(Vec<Primitive>),
}

impl Scene {
	/// Spinner ring and caption centered on the canvas, independent of any
	/// graph. `elapsed` is seconds since loading began.
	pub fn loading(width: f64, height: f64, elapsed: f64) -> Self {
		let (cx, cy) = (width / 2.0, height / 2.0);
		let turns = (elapsed / SPINNER_PERIOD).fract();
		Scene::Loading(vec![
			Primitive::Ring {
				cx,
				cy,
				r: SPINNER_RADIUS,
				color: SPINNER_COLOR,
				width: SPINNER_WIDTH,
				dash: SPINNER_DASH,
				angle: turns * 2.0 * PI,
			},
			Primitive::Text {
				x: cx,
				y: cy + CAPTION_OFFSET,
				text: CAPTION_TEXT.to_string(),
				size: CAPTION_SIZE,
				color: CAPTION_COLOR,
				align: TextAlign::Center,
			},
		])
	}

	/// Lines for links, then circles, then labels, from the current positions.
	pub fn from_simulation(sim: &Simulation) -> Self {
		let graph = sim.graph();
		let positions = sim.positions();
		let mut primitives = Vec::with_capacity(graph.links.len() + graph.nodes.len() * 2);

		for link in &graph.links {
			let (source, target) = (positions[link.source.0], positions[link.target.0]);
			primitives.push(Primitive::Line {
				x1: source.x,
				y1: source.y,
				x2: target.x,
				y2: target.y,
				color: LINK_COLOR,
				opacity: LINK_OPACITY,
				width: link.weight.sqrt(),
			});
		}
		for node in &graph.nodes {
			let p = positions[node.id.0];
			primitives.push(Primitive::Circle {
				cx: p.x,
				cy: p.y,
				r: node.radius,
				fill: group_color(node.group),
				stroke: NODE_STROKE,
				stroke_width: NODE_STROKE_WIDTH,
			});
		}
		for node in &graph.nodes {
			let p = positions[node.id.0];
			primitives.push(Primitive::Text {
				x: p.x + LABEL_OFFSET.0,
				y: p.y + LABEL_OFFSET.1,
				text: node.label.clone(),
				size: label_size(node.group),
				color: LABEL_COLOR,
				align: TextAlign::Start,
			});
		}
		Scene::Populated(primitives)
	}

	pub fn primitives(&self) -> &[Primitive] {
		match self {
			Scene::Loading(p) | Scene::Populated(p) => p.as_slice(),
			Scene::Empty => &[],
		}
	}

	/// True when the host should show its "no data" placeholder.
	pub fn is_empty(&self) -> bool {
		matches!(self, Scene::Empty)
	}
}
