use serde::Deserialize;

/// Structured response produced by the bridge-generation collaborator.
///
/// Only the score and the three concept lists feed the layout; the prose
/// fields pass through for display elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResult {
	#[serde(default)]
	pub bridge_title: String,
	pub resonance_score: f64,
	#[serde(default)]
	pub mechanism: String,
	#[serde(default)]
	pub explanation: String,
	#[serde(default)]
	pub domain_a_concepts: Vec<String>,
	#[serde(default)]
	pub domain_b_concepts: Vec<String>,
	#[serde(default)]
	pub shared_concepts: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConceptGroup {
	DomainA,
	DomainB,
	Bridge,
}

impl ConceptGroup {
	pub fn radius(self) -> f64 {
		match self {
			ConceptGroup::DomainA | ConceptGroup::DomainB => 8.0,
			ConceptGroup::Bridge => 12.0,
		}
	}

	/// Horizontal target as a fraction of canvas width.
	pub fn band(self) -> f64 {
		match self {
			ConceptGroup::DomainA => 0.2,
			ConceptGroup::DomainB => 0.8,
			ConceptGroup::Bridge => 0.5,
		}
	}
}

/// Opaque node handle; the index of the node within its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Drag override for a node's position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pin {
	#[default]
	Free,
	Pinned { x: f64, y: f64 },
}

#[derive(Clone, Debug)]
pub struct ConceptNode {
	pub id: NodeId,
	pub label: String,
	pub group: ConceptGroup,
	pub radius: f64,
}

#[derive(Clone, Debug)]
pub struct ConceptLink {
	pub source: NodeId,
	pub target: NodeId,
	pub weight: f64,
}

const BRIDGE_WEIGHT: f64 = 1.0;
const CHAIN_WEIGHT: f64 = 0.5;

#[derive(Clone, Debug, Default)]
pub struct Graph {
	pub nodes: Vec<ConceptNode>,
	pub links: Vec<ConceptLink>,
}

impl Graph {
	/// Builds the concept graph for one result: every domain concept links to
	/// every shared concept, and consecutive concepts inside each domain are
	/// chained together.
	pub fn from_result(result: &BridgeResult) -> Self {
		let mut graph = Graph::default();
		let a = graph.add_all(&result.domain_a_concepts, ConceptGroup::DomainA);
		let b = graph.add_all(&result.domain_b_concepts, ConceptGroup::DomainB);
		let shared = graph.add_all(&result.shared_concepts, ConceptGroup::Bridge);

		for domain in [&a, &b] {
			for &source in domain {
				for &target in &shared {
					graph.link(source, target, BRIDGE_WEIGHT);
				}
			}
		}
		for domain in [&a, &b] {
			for pair in domain.windows(2) {
				graph.link(pair[0], pair[1], CHAIN_WEIGHT);
			}
		}
		graph
	}

	pub fn add_node(&mut self, label: impl Into<String>, group: ConceptGroup) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(ConceptNode {
			id,
			label: label.into(),
			group,
			radius: group.radius(),
		});
		id
	}

	pub fn link(&mut self, source: NodeId, target: NodeId, weight: f64) {
		self.links.push(ConceptLink {
			source,
			target,
			weight,
		});
	}

	/// Looks a node up by its concept text. When several nodes share the same
	/// text the last one registered wins.
	#[cfg(test)]
	pub fn find(&self, label: &str) -> Option<NodeId> {
		self.nodes
			.iter()
			.rev()
			.find(|node| node.label == label)
			.map(|node| node.id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn add_all(&mut self, labels: &[String], group: ConceptGroup) -> Vec<NodeId> {
		labels
			.iter()
			.map(|label| self.add_node(label.as_str(), group))
			.collect()
	}
}
