//! Binary Space Partitioning (BSP) tree implementation
//!
//! The booleans in [`Mesh`](crate::mesh::Mesh) are sequences of the passes
//! defined on [`Node`]: build, invert, and clip one tree against another.

pub mod node;
pub mod traits;

pub use node::Node;
pub use traits::{BalancedSplittingStrategy, SplittingPlaneStrategy};
