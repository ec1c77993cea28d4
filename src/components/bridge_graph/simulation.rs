use std::f64::consts::PI;

use log::debug;

use super::config::LayoutConfig;
use super::types::{Graph, NodeId, Pin};

const INITIAL_RADIUS: f64 = 10.0;

/// Snapshot of one node's position after the latest tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodePosition {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default)]
struct Body {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	pin: Pin,
}

/// Deterministic generator used to separate coincident points.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Force-directed layout over a concept [`Graph`].
///
/// The host drives it: call [`Simulation::step`] once per frame and read
/// [`Simulation::positions`] afterwards. Forces for a tick are applied and
/// integrated before `step` returns, so a snapshot never sees a half-finished
/// tick.
pub struct Simulation {
	graph: Graph,
	config: LayoutConfig,
	bodies: Vec<Body>,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	band_strength: f64,
	width: f64,
	height: f64,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	pub fn new(graph: Graph, score: f64, config: LayoutConfig, width: f64, height: f64) -> Self {
		let (cx, cy) = center_of(width, height);
		let golden = PI * (3.0 - 5.0_f64.sqrt());
		let bodies = (0..graph.nodes.len())
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden;
				Body {
					x: cx + radius * angle.cos(),
					y: cy + radius * angle.sin(),
					..Body::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; graph.nodes.len()];
		for link in &graph.links {
			degree[link.source.0] += 1;
			degree[link.target.0] += 1;
		}
		let (link_strength, link_bias) = graph
			.links
			.iter()
			.map(|link| {
				let (s, t) = (degree[link.source.0], degree[link.target.0]);
				(
					link.weight / s.min(t).max(1) as f64,
					s as f64 / (s + t).max(1) as f64,
				)
			})
			.unzip();

		debug!(
			"simulation built: {} nodes, {} links, score {}",
			graph.nodes.len(),
			graph.links.len(),
			score
		);

		Self {
			band_strength: config.band_strength(score),
			graph,
			config,
			bodies,
			link_strength,
			link_bias,
			width,
			height,
			alpha: 1.0,
			alpha_target: 0.0,
			running: false,
			ticks: 0,
			rng: Lcg(1),
		}
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn start(&mut self) {
		if !self.running {
			debug!("simulation started at alpha {:.4}", self.alpha);
		}
		self.running = true;
	}

	pub fn stop(&mut self) {
		if self.running {
			debug!("simulation stopped after {} ticks", self.ticks);
		}
		self.running = false;
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Current energy of the layout; the loop halts once it drops below
	/// `alpha_min`.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn band_strength(&self) -> f64 {
		self.band_strength
	}

	#[cfg(test)]
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Raises the energy to at least `alpha` and resumes ticking. Positions
	/// are left where they are.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
		self.start();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Advances the layout by one tick. Returns `false` when nothing moved:
	/// the loop is stopped, the graph is empty, or the canvas has no area yet.
	pub fn step(&mut self) -> bool {
		if !self.running || self.graph.is_empty() || !self.has_area() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_charge(alpha);
		self.apply_center();
		self.apply_collide();
		self.apply_band(alpha);
		self.integrate();

		self.ticks += 1;
		if self.alpha < self.config.alpha_min {
			debug!("simulation converged after {} ticks", self.ticks);
			self.running = false;
		}
		true
	}

	pub fn positions(&self) -> Vec<NodePosition> {
		self.bodies
			.iter()
			.enumerate()
			.map(|(i, body)| NodePosition {
				id: NodeId(i),
				x: body.x,
				y: body.y,
			})
			.collect()
	}

	pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
		self.bodies.get(id.0).map(|body| (body.x, body.y))
	}

	#[cfg(test)]
	pub fn pin_state(&self, id: NodeId) -> Option<Pin> {
		self.bodies.get(id.0).map(|body| body.pin)
	}

	/// Fixes a node at `(x, y)` until [`Simulation::unpin`] is called.
	pub fn pin(&mut self, id: NodeId, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(id.0) {
			body.pin = Pin::Pinned { x, y };
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
		}
	}

	pub fn unpin(&mut self, id: NodeId) {
		if let Some(body) = self.bodies.get_mut(id.0) {
			body.pin = Pin::Free;
		}
	}

	/// Nearest node whose circle (plus hit slop) contains the point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
		let mut found: Option<(NodeId, f64)> = None;
		for (node, body) in self.graph.nodes.iter().zip(&self.bodies) {
			let (dx, dy) = (body.x - x, body.y - y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist > node.radius + self.config.hit_slop {
				continue;
			}
			if found.is_none_or(|(_, best)| dist < best) {
				found = Some((node.id, dist));
			}
		}
		found.map(|(id, _)| id)
	}

	fn has_area(&self) -> bool {
		self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
	}

	fn apply_links(&mut self, alpha: f64) {
		for (i, link) in self.graph.links.iter().enumerate() {
			let (s, t) = (link.source.0, link.target.0);
			if s == t {
				continue;
			}
			let (source, target) = (&self.bodies[s], &self.bodies[t]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let dist = (x * x + y * y).sqrt();
			let l = (dist - self.config.link_distance) / dist * alpha * self.link_strength[i];
			let (x, y) = (x * l, y * l);
			let bias = self.link_bias[i];

			let target = &mut self.bodies[t];
			target.vx -= x * bias;
			target.vy -= y * bias;
			let source = &mut self.bodies[s];
			source.vx += x * (1.0 - bias);
			source.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self, alpha: f64) {
		let strength = self.config.charge * alpha;
		let min2 = self.config.charge_distance_min2;
		for i in 0..self.bodies.len() {
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut fx, mut fy) = (0.0, 0.0);
			for j in 0..self.bodies.len() {
				if i == j {
					continue;
				}
				let mut x = self.bodies[j].x - xi;
				let mut y = self.bodies[j].y - yi;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				fx += x * strength / l;
				fy += y * strength / l;
			}
			self.bodies[i].vx += fx;
			self.bodies[i].vy += fy;
		}
	}

	fn apply_center(&mut self) {
		let (cx, cy) = center_of(self.width, self.height);
		let n = self.bodies.len() as f64;
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), body| (sx + body.x, sy + body.y));
		let (dx, dy) = (sx / n - cx, sy / n - cy);
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	fn apply_collide(&mut self) {
		let strength = self.config.collide_strength;
		let radii: Vec<f64> = self
			.graph
			.nodes
			.iter()
			.map(|node| node.radius + self.config.collide_margin)
			.collect();

		for i in 0..self.bodies.len() {
			let ri = radii[i];
			let ri2 = ri * ri;
			let xi = self.bodies[i].x + self.bodies[i].vx;
			let yi = self.bodies[i].y + self.bodies[i].vy;
			for j in (i + 1)..self.bodies.len() {
				let rj = radii[j];
				let r = ri + rj;
				let other = &self.bodies[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let dist = l.sqrt();
				let push = (r - dist) / dist * strength;
				let (x, y) = (x * push, y * push);
				let rj2 = rj * rj;
				let share = rj2 / (ri2 + rj2);

				self.bodies[i].vx += x * share;
				self.bodies[i].vy += y * share;
				self.bodies[j].vx -= x * (1.0 - share);
				self.bodies[j].vy -= y * (1.0 - share);
			}
		}
	}

	fn apply_band(&mut self, alpha: f64) {
		let strength = self.band_strength * alpha;
		for (node, body) in self.graph.nodes.iter().zip(&mut self.bodies) {
			let target = node.group.band() * self.width;
			body.vx += (target - body.x) * strength;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.pin {
				Pin::Pinned { x, y } => {
					body.x = x;
					body.y = y;
					body.vx = 0.0;
					body.vy = 0.0;
				}
				Pin::Free => {
					body.vx *= keep;
					body.vy *= keep;
					body.x += body.vx;
					body.y += body.vy;
				}
			}
		}
	}
}

fn center_of(width: f64, height: f64) -> (f64, f64) {
	if width.is_finite() && height.is_finite() {
		(width / 2.0, height / 2.0)
	} else {
		(0.0, 0.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bridge_graph::types::{BridgeResult, ConceptGroup};

	fn sample(a: usize, b: usize, k: usize, score: f64) -> BridgeResult {
		let names = |prefix: &str, n: usize| (0..n).map(|i| format!("{prefix}{i}")).collect();
		BridgeResult {
			resonance_score: score,
			domain_a_concepts: names("a", a),
			domain_b_concepts: names("b", b),
			shared_concepts: names("s", k),
			..Default::default()
		}
	}

	fn simulation(result: &BridgeResult) -> Simulation {
		let mut sim = Simulation::new(
			Graph::from_result(result),
			result.resonance_score,
			LayoutConfig::default(),
			800.0,
			600.0,
		);
		sim.start();
		sim
	}

	fn run_to_rest(sim: &mut Simulation, limit: u64) -> u64 {
		while sim.step() {
			assert!(sim.ticks() <= limit, "did not converge within {limit} ticks");
		}
		sim.ticks()
	}

	#[test]
	fn empty_graph_does_nothing() {
		let mut sim = simulation(&BridgeResult::default());
		assert!(!sim.step());
		assert!(sim.positions().is_empty());
		assert_eq!(sim.node_at(400.0, 300.0), None);
	}

	#[test]
	fn single_node_settles_at_center() {
		let mut sim = simulation(&sample(0, 0, 1, 0.5));
		run_to_rest(&mut sim, 400);
		let (x, y) = sim.position(NodeId(0)).unwrap();
		assert!((x - 400.0).abs() < 1e-6);
		assert!((y - 300.0).abs() < 1e-6);
	}

	#[test]
	fn converges_within_bound_and_reproducibly() {
		for (a, b, k) in [(3, 3, 3), (5, 5, 5), (5, 5, 10), (2, 1, 1)] {
			let result = sample(a, b, k, 0.4);
			let mut first = simulation(&result);
			let mut second = simulation(&result);
			let t1 = run_to_rest(&mut first, 400);
			let t2 = run_to_rest(&mut second, 400);
			assert_eq!(t1, t2);
			assert!(first.alpha() < first.config().alpha_min);
			assert_eq!(first.positions(), second.positions());
			assert!(!first.is_running());
		}
	}

	#[test]
	fn positions_stay_finite() {
		let mut sim = simulation(&sample(5, 5, 5, 0.0));
		run_to_rest(&mut sim, 400);
		for p in sim.positions() {
			assert!(p.x.is_finite() && p.y.is_finite());
		}
	}

	#[test]
	fn low_resonance_separates_domains_more() {
		let spread = |score: f64| {
			let mut sim = simulation(&sample(4, 4, 3, score));
			run_to_rest(&mut sim, 400);
			let mean_x = |group: ConceptGroup| {
				let xs: Vec<f64> = sim
					.graph()
					.nodes
					.iter()
					.filter(|n| n.group == group)
					.map(|n| sim.position(n.id).unwrap().0)
					.collect();
				xs.iter().sum::<f64>() / xs.len() as f64
			};
			mean_x(ConceptGroup::DomainB) - mean_x(ConceptGroup::DomainA)
		};
		let (low, high) = (spread(0.0), spread(1.0));
		assert!(low > 0.0);
		assert!(low > high, "low {low} high {high}");
	}

	#[test]
	fn pinned_node_holds_exact_coordinates() {
		let mut sim = simulation(&sample(3, 3, 3, 0.2));
		let id = NodeId(4);
		sim.pin(id, 123.25, 77.5);
		for _ in 0..150 {
			sim.step();
			assert_eq!(sim.position(id), Some((123.25, 77.5)));
		}
		sim.unpin(id);
		assert_eq!(sim.pin_state(id), Some(Pin::Free));
	}

	#[test]
	fn zero_sized_canvas_is_a_no_op() {
		let result = sample(2, 2, 2, 0.5);
		let mut sim = Simulation::new(Graph::from_result(&result), 0.5, LayoutConfig::default(), 0.0, 0.0);
		sim.start();
		let before = sim.positions();
		assert!(!sim.step());
		assert_eq!(sim.positions(), before);
		assert_eq!(sim.alpha(), 1.0);

		sim.resize(640.0, 480.0);
		assert!(sim.step());
		assert!(sim.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
	}

	#[test]
	fn stopped_simulation_does_not_move() {
		let mut sim = simulation(&sample(2, 2, 2, 0.5));
		sim.step();
		sim.stop();
		let before = sim.positions();
		assert!(!sim.step());
		assert_eq!(sim.positions(), before);
	}

	#[test]
	fn node_at_hits_nearest_circle() {
		let mut sim = simulation(&sample(3, 3, 3, 0.5));
		run_to_rest(&mut sim, 400);
		let (x, y) = sim.position(NodeId(2)).unwrap();
		assert_eq!(sim.node_at(x + 1.0, y), Some(NodeId(2)));
		assert_eq!(sim.node_at(-500.0, -500.0), None);
	}

	#[test]
	fn worked_example_band_strength() {
		let sim = simulation(&BridgeResult {
			resonance_score: 0.95,
			domain_a_concepts: vec!["Mycelium".into(), "Fungi Network".into()],
			domain_b_concepts: vec!["City Grid".into()],
			shared_concepts: vec!["Distributed Routing".into()],
			..Default::default()
		});
		assert_eq!(sim.positions().len(), 4);
		assert_eq!(sim.graph().links.len(), 4);
		assert!((sim.band_strength() - 0.005).abs() < 1e-12);
	}
}
