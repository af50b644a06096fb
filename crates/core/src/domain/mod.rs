pub mod recommendation;
pub mod region;
pub mod selection;
