pub mod cluster;
pub mod node;
pub mod roster;
