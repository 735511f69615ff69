#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial indexes for candidate enrichment.
//!
//! Builds R-tree nearest-neighbor indexes over the projected road-graph
//! nodes and security-asset points, and provides the sight-line
//! visibility test against the building mass. Indexes are immutable
//! snapshots constructed once per analysis request, so concurrent
//! requests never share mutable state.

pub mod roads;
pub mod security;
pub mod visibility;

pub use roads::{NearestRoad, RoadIndex};
pub use security::{NearestAsset, SecurityIndex};
pub use visibility::is_hidden;
