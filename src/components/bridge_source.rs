//! The request/response seam to whatever produces bridge results.

use serde::Deserialize;
use thiserror::Error;

use super::bridge_graph::BridgeResult;

const SAMPLES: &str = include_str!("../../assets/sample_bridges.json");

#[derive(Debug, Error)]
pub enum BridgeError {
	#[error("both domains are required")]
	MissingDomain,
	#[error("no bridge known between \"{0}\" and \"{1}\"")]
	Unknown(String, String),
	#[error("malformed bridge data: {0}")]
	Malformed(#[from] serde_json::Error),
}

/// Produces a bridge result for a pair of domains.
pub trait BridgeSource {
	fn request(&self, domain_a: &str, domain_b: &str) -> Result<BridgeResult, BridgeError>;
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleBridge {
	pub domain_a: String,
	pub domain_b: String,
	pub bridge: BridgeResult,
}

/// Canned results for the sample domain pairs shown on the home page.
#[derive(Clone, Debug, Default)]
pub struct SampleBridges {
	samples: Vec<SampleBridge>,
}

impl SampleBridges {
	pub fn embedded() -> Result<Self, BridgeError> {
		Self::from_json(SAMPLES)
	}

	pub fn from_json(json: &str) -> Result<Self, BridgeError> {
		Ok(Self {
			samples: serde_json::from_str(json)?,
		})
	}

	pub fn samples(&self) -> &[SampleBridge] {
		&self.samples
	}
}

impl BridgeSource for SampleBridges {
	fn request(&self, domain_a: &str, domain_b: &str) -> Result<BridgeResult, BridgeError> {
		let (a, b) = (domain_a.trim(), domain_b.trim());
		if a.is_empty() || b.is_empty() {
			return Err(BridgeError::MissingDomain);
		}
		let same = |x: &str, y: &str| x.eq_ignore_ascii_case(y);
		self.samples
			.iter()
			.find(|s| {
				(same(&s.domain_a, a) && same(&s.domain_b, b))
					|| (same(&s.domain_a, b) && same(&s.domain_b, a))
			})
			.map(|s| s.bridge.clone())
			.ok_or_else(|| BridgeError::Unknown(a.to_string(), b.to_string()))
	}
}
