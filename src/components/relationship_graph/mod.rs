mod component;
mod render;
mod state;

pub use component::RelationshipGraphCanvas;
pub use state::EdgeSelection;
