use std::collections::HashMap;

use log::debug;

use super::simulation::Simulation;
use super::types::NodeId;

/// Identifies one pointer: the mouse or a single touch point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
	Mouse,
	Touch(i32),
}

/// Tracks which node each active pointer is holding.
///
/// While any drag is active the simulation's alpha target is raised so the
/// rest of the graph keeps reacting; it drops back to zero when the last
/// drag ends and the layout cools down on its own.
#[derive(Clone, Debug, Default)]
pub struct DragController {
	active: HashMap<PointerId, NodeId>,
}

impl DragController {
	/// Grabs the node under `(x, y)`, if any, and pins it to the pointer.
	pub fn begin(&mut self, sim: &mut Simulation, pointer: PointerId, x: f64, y: f64) -> Option<NodeId> {
		let node = sim.node_at(x, y)?;
		self.grab(sim, pointer, node, x, y);
		Some(node)
	}

	/// Starts dragging a known node.
	pub fn grab(&mut self, sim: &mut Simulation, pointer: PointerId, node: NodeId, x: f64, y: f64) {
		if self.active.is_empty() {
			sim.set_alpha_target(sim.config().drag_alpha_target);
		}
		sim.start();
		if let Some(previous) = self.active.insert(pointer, node) {
			if previous != node && !self.is_held(previous) {
				sim.unpin(previous);
			}
		}
		let from = sim.position(node);
		sim.pin(node, x, y);
		debug!("drag start {:?} on {:?} from {:?}", pointer, node, from);
	}

	pub fn move_to(&mut self, sim: &mut Simulation, pointer: PointerId, x: f64, y: f64) {
		if let Some(&node) = self.active.get(&pointer) {
			sim.pin(node, x, y);
		}
	}

	pub fn end(&mut self, sim: &mut Simulation, pointer: PointerId) {
		let Some(node) = self.active.remove(&pointer) else {
			return;
		};
		if !self.is_held(node) {
			sim.unpin(node);
		}
		if self.active.is_empty() {
			sim.set_alpha_target(0.0);
		}
		debug!("drag end {:?} on {:?}", pointer, node);
	}

	/// Releases every pointer, e.g. when the pointer leaves the canvas.
	pub fn cancel(&mut self, sim: &mut Simulation) {
		let pointers: Vec<PointerId> = self.active.keys().copied().collect();
		for pointer in pointers {
			self.end(sim, pointer);
		}
	}

	/// Forgets all drags without touching a simulation; used when the graph is
	/// rebuilt and the old node ids no longer mean anything.
	pub fn clear(&mut self) {
		self.active.clear();
	}

	pub fn is_dragging(&self) -> bool {
		!self.active.is_empty()
	}

	fn is_held(&self, node: NodeId) -> bool {
		self.active.values().any(|&held| held == node)
	}
}
