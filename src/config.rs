//! Session configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Neighborhood traversal depth accepted by the backend.
pub const DEPTH_RANGE: RangeInclusive<u32> = 1..=5;
/// Neighborhood node cap accepted by the backend.
pub const LIMIT_RANGE: RangeInclusive<u32> = 10..=200;
/// Search result cap accepted by the backend.
pub const SEARCH_LIMIT_RANGE: RangeInclusive<u32> = 1..=200;

/// Settings a session starts with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
	/// Backend location; `None` means same-origin relative requests.
	pub api_base: Option<String>,
	/// Initial traversal depth.
	pub depth: u32,
	/// Initial neighborhood node cap.
	pub limit: u32,
	/// Search result cap.
	pub search_limit: u32,
	/// Quiet window before a typed query is searched.
	pub debounce: Duration,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_base: None,
			depth: 2,
			limit: 60,
			search_limit: 40,
			debounce: Duration::from_millis(250),
		}
	}
}

impl ExplorerConfig {
	/// Defaults plus the `EXPLORER_API_BASE` override captured at build time.
	pub fn from_build_env() -> Self {
		Self::default().with_api_base(option_env!("EXPLORER_API_BASE"))
	}

	/// Point the session at another backend. Blank values are ignored.
	pub fn with_api_base(mut self, base: Option<&str>) -> Self {
		self.api_base = base
			.map(|b| b.trim().trim_end_matches('/'))
			.filter(|b| !b.is_empty())
			.map(str::to_string);
		self
	}
}
