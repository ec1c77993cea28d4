pub mod bridge_graph;
pub mod bridge_source;
