//! Everything that talks to the backend: wire types, the cached HTTP
//! client, the streaming analysis controller, and per-view data hooks.

pub mod client;
pub mod hooks;
pub mod stream;
pub mod types;

pub use client::FetchError;
