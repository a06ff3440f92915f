pub mod node;
pub mod snapshot;
pub mod tree;

pub use node::{Node, NodeId};
pub use snapshot::NodeSnapshot;
pub use tree::PropertyTree;
