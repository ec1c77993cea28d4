/// Force and integration constants for the layout engine.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength; negative values repel.
	pub charge: f64,
	/// Squared distance below which repulsion stops growing.
	pub charge_distance_min2: f64,
	/// Extra separation added to each node radius by the collision force.
	pub collide_margin: f64,
	pub collide_strength: f64,
	/// Band strength at zero resonance, before the score floor is applied.
	pub band_base: f64,
	/// Scores below this are treated as this value.
	pub score_floor: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Alpha target held while at least one node is being dragged.
	pub drag_alpha_target: f64,
	/// Extra hit-test slop around each node circle.
	pub hit_slop: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 60.0,
			charge: -150.0,
			charge_distance_min2: 1.0,
			collide_margin: 5.0,
			collide_strength: 1.0,
			band_base: 0.1,
			score_floor: 0.1,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			hit_slop: 4.0,
		}
	}
}

impl LayoutConfig {
	/// Strength of the horizontal band force for a resonance score.
	///
	/// High resonance weakens the pull toward each group's band, letting the
	/// clusters drift together.
	pub fn band_strength(&self, score: f64) -> f64 {
		self.band_base * (1.0 - score.clamp(self.score_floor, 1.0))
	}
}
