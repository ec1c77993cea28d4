mod component;
mod config;
mod drag;
mod render;
mod scene;
mod simulation;
mod state;
mod types;

pub use component::BridgeGraphCanvas;
pub use types::BridgeResult;
