pub mod common;
pub mod community;
pub mod neighborhood;

pub use common::{GraphIndex, LinkIdx, NodeIdx};
pub use community::{extract_component, partition_components, Component};
pub use neighborhood::{expand_neighborhood, NeighborhoodResult};
