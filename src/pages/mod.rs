pub mod analysis;
pub mod communities;
pub mod entities;
pub mod graph;
pub mod home;
pub mod not_found;
