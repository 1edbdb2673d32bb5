mod node;

pub use node::{Node, Scope};
