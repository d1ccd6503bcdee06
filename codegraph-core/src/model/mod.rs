//! Data model: nodes, edges, bridges, the graph container, and stats.

pub mod bridge;
pub mod edge;
pub mod graph;
pub mod language;
pub mod node;
pub mod stats;

pub use bridge::{Actor, Bridge, BridgeType};
pub use edge::{Edge, EdgeType};
pub use graph::{Direction, Graph};
pub use language::Language;
pub use node::{Node, NodeType};
pub use stats::Stats;
