//! Fetches an ordered list of JS packages from one trusted origin and
//! assembles them for a server-side renderer.

pub mod api;
pub mod config;
pub mod engine;
pub mod logging;
pub mod server;
pub mod source;
