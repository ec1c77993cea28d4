use log::debug;

use super::config::LayoutConfig;
use super::drag::{DragController, PointerId};
use super::scene::Scene;
use super::simulation::Simulation;
use super::types::{BridgeResult, Graph};

pub enum ViewMode {
	Empty,
	/// Time in seconds at which loading began.
	Loading { since: f64 },
	Populated(Simulation),
}

/// Owns the single live simulation behind one canvas and decides what the
/// canvas shows.
pub struct BridgeView {
	pub mode: ViewMode,
	pub drag: DragController,
	pub config: LayoutConfig,
	pub width: f64,
	pub height: f64,
	scene: Scene,
}

impl BridgeView {
	pub fn new(config: LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			mode: ViewMode::Empty,
			drag: DragController::default(),
			config,
			width,
			height,
			scene: Scene::Empty,
		}
	}

	/// Replaces whatever is showing with the state for `(result, loading)`.
	///
	/// The previous simulation is stopped and its primitives discarded before
	/// anything new is built.
	pub fn update(&mut self, result: Option<&BridgeResult>, loading: bool, now: f64) {
		if let ViewMode::Populated(sim) = &mut self.mode {
			sim.stop();
		}
		self.drag.clear();
		self.scene = Scene::Empty;

		self.mode = match (result, loading) {
			(_, true) => ViewMode::Loading { since: now },
			(Some(result), false) => {
				let graph = Graph::from_result(result);
				debug!(
					"rebuilding bridge graph \"{}\" ({} nodes)",
					result.bridge_title,
					graph.nodes.len()
				);
				let mut sim = Simulation::new(
					graph,
					result.resonance_score,
					self.config.clone(),
					self.width,
					self.height,
				);
				debug!("band strength {:.4}", sim.band_strength());
				sim.start();
				ViewMode::Populated(sim)
			}
			(None, false) => ViewMode::Empty,
		};
		self.rebuild_scene(now);
	}

	/// Advances the simulation one tick and refreshes the scene. Called once
	/// per animation frame with the current time in seconds.
	pub fn frame(&mut self, now: f64) -> &Scene {
		if let ViewMode::Populated(sim) = &mut self.mode {
			sim.step();
		}
		self.rebuild_scene(now);
		&self.scene
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// Moves the layout's center and bands to the new size. Nodes keep their
	/// positions and the layout is reheated so they drift toward the new bands.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if let ViewMode::Populated(sim) = &mut self.mode {
			sim.resize(width, height);
			sim.reheat(self.config.drag_alpha_target);
			debug!("resized to {width}x{height}, alpha {:.3}", sim.alpha());
		}
	}

	pub fn pointer_down(&mut self, pointer: PointerId, x: f64, y: f64) -> bool {
		match &mut self.mode {
			ViewMode::Populated(sim) => self.drag.begin(sim, pointer, x, y).is_some(),
			_ => false,
		}
	}

	pub fn pointer_move(&mut self, pointer: PointerId, x: f64, y: f64) {
		if let ViewMode::Populated(sim) = &mut self.mode {
			self.drag.move_to(sim, pointer, x, y);
		}
	}

	pub fn pointer_up(&mut self, pointer: PointerId) {
		if let ViewMode::Populated(sim) = &mut self.mode {
			self.drag.end(sim, pointer);
		}
	}

	pub fn pointer_cancel(&mut self) {
		if let ViewMode::Populated(sim) = &mut self.mode {
			self.drag.cancel(sim);
		}
	}

	pub fn is_over_node(&self, x: f64, y: f64) -> bool {
		match &self.mode {
			ViewMode::Populated(sim) => sim.node_at(x, y).is_some(),
			_ => false,
		}
	}

	fn rebuild_scene(&mut self, now: f64) {
		self.scene = match &self.mode {
			ViewMode::Empty => Scene::Empty,
			ViewMode::Loading { since } => Scene::loading(self.width, self.height, now - since),
			ViewMode::Populated(sim) => Scene::from_simulation(sim),
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::bridge_graph::scene::Primitive;
	use crate::components::bridge_graph::types::NodeId;

	fn result() -> BridgeResult {
		BridgeResult {
			bridge_title: "Routing Without a Center".into(),
			resonance_score: 0.7,
			domain_a_concepts: vec!["Hyphae".into(), "Spores".into(), "Nutrients".into()],
			domain_b_concepts: vec!["Roads".into(), "Zoning".into(), "Transit".into()],
			shared_concepts: vec!["Hubs".into(), "Redundancy".into(), "Growth".into()],
			..Default::default()
		}
	}

	fn view() -> BridgeView {
		BridgeView::new(LayoutConfig::default(), 800.0, 600.0)
	}

	#[test]
	fn starts_empty() {
		let mut view = view();
		assert!(view.scene().is_empty());
		assert!(view.frame(0.0).is_empty());
	}

	#[test]
	fn populated_then_loading_shows_only_spinner() {
		let mut view = view();
		let data = result();
		view.update(Some(&data), false, 0.0);
		for i in 0..10 {
			view.frame(i as f64 / 60.0);
		}
		assert_eq!(view.scene().primitives().len(), 22 + 9 + 9);

		view.update(Some(&data), true, 1.0);
		assert!(matches!(view.mode, ViewMode::Loading { .. }));
		let scene = view.frame(1.5);
		assert!(matches!(scene, Scene::Loading(_)));
		assert_eq!(scene.primitives().len(), 2);
		assert!(
			scene
				.primitives()
				.iter()
				.all(|p| matches!(p, Primitive::Ring { .. } | Primitive::Text { .. }))
		);
	}

	#[test]
	fn rebuilding_restarts_from_full_energy() {
		let mut view = view();
		let data = result();
		view.update(Some(&data), false, 0.0);
		for _ in 0..500 {
			view.frame(0.0);
		}
		match &view.mode {
			ViewMode::Populated(sim) => assert!(!sim.is_running()),
			_ => panic!("expected populated view"),
		}

		view.update(Some(&data), false, 0.0);
		match &view.mode {
			ViewMode::Populated(sim) => {
				assert!(sim.is_running());
				assert_eq!(sim.alpha(), 1.0);
				assert_eq!(sim.ticks(), 0);
			}
			_ => panic!("expected populated view"),
		}
	}

	#[test]
	fn no_result_and_not_loading_is_empty() {
		let mut view = view();
		view.update(Some(&result()), false, 0.0);
		view.update(None, false, 0.0);
		assert!(matches!(view.mode, ViewMode::Empty));
		assert!(view.scene().is_empty());
		assert!(view.scene().primitives().is_empty());
	}

	#[test]
	fn pointer_events_drag_nodes_and_rebuild_drops_drags() {
		let mut view = view();
		view.update(Some(&result()), false, 0.0);
		for _ in 0..50 {
			view.frame(0.0);
		}
		let (x, y) = match &view.mode {
			ViewMode::Populated(sim) => sim.position(NodeId(0)).unwrap(),
			_ => panic!("expected populated view"),
		};
		assert!(view.is_over_node(x, y));
		assert!(view.pointer_down(PointerId::Mouse, x, y));
		view.pointer_move(PointerId::Mouse, 42.0, 24.0);
		view.frame(0.0);
		match &view.mode {
			ViewMode::Populated(sim) => assert_eq!(sim.position(NodeId(0)), Some((42.0, 24.0))),
			_ => panic!("expected populated view"),
		}

		view.update(Some(&result()), false, 0.0);
		assert!(!view.drag.is_dragging());
		view.pointer_up(PointerId::Mouse);
	}

	fn mean_x(sim: &Simulation, ids: std::ops::Range<usize>) -> f64 {
		let n = ids.len() as f64;
		ids.map(|i| sim.position(NodeId(i)).unwrap().0).sum::<f64>() / n
	}

	#[test]
	fn resize_keeps_positions_and_spreads_bands() {
		let mut view = view();
		view.update(Some(&result()), false, 0.0);
		for _ in 0..500 {
			view.frame(0.0);
		}
		let (before, spread_before) = match &view.mode {
			ViewMode::Populated(sim) => {
				assert!(!sim.is_running());
				(sim.positions(), mean_x(sim, 3..6) - mean_x(sim, 0..3))
			}
			_ => panic!("expected populated view"),
		};

		view.resize(1600.0, 600.0);
		match &view.mode {
			ViewMode::Populated(sim) => {
				assert_eq!(sim.positions(), before);
				assert!(sim.is_running());
				assert!(sim.alpha() >= view.config.drag_alpha_target);
			}
			_ => panic!("expected populated view"),
		}

		for _ in 0..1000 {
			view.frame(0.0);
		}
		match &view.mode {
			ViewMode::Populated(sim) => {
				assert!(!sim.is_running());
				let (a, b) = (mean_x(sim, 0..3), mean_x(sim, 3..6));
				assert!(a < 800.0 && 800.0 < b);
				assert!(b - a > spread_before);
			}
			_ => panic!("expected populated view"),
		}
	}

	#[test]
	fn loading_ignores_pointer_events() {
		let mut view = view();
		view.update(None, true, 0.0);
		assert!(!view.pointer_down(PointerId::Mouse, 400.0, 300.0));
		view.pointer_cancel();
	}
}
