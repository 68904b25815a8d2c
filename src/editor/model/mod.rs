mod connection;
mod error;
mod graph;
mod intent;
mod node;

pub use connection::Connection;
pub use error::ConnectionRejected;
pub use graph::{GraphSnapshot, ResolvedConnection};
pub use intent::{CanvasCallbacks, CanvasIntent, NodePatch};
pub use node::{Node, NodeConfig, NodeId, NodeType, Position};
