mod node_id;
mod timestamp;

pub use node_id::NodeId;
pub use timestamp::Timestamp;
