pub mod node;
pub mod node_metadata;

pub use node::{ContentProperties, Node};
pub use node_metadata::NodeMetadata;
