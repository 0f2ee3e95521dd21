//! Search tree data model.
//!
//! Nodes live in a flat arena ([`SearchTree`]) and refer to each other by
//! [`NodeId`]. Parents own nothing; the arena owns every node for the whole run.

pub mod arena;
pub mod node;

pub use arena::{join_state, SearchTree};
pub use node::{Node, NodeId, DEFAULT_EXPLORATION_WEIGHT};
