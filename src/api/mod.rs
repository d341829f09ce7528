// Render request contract and the handler that fulfils it.

pub mod render;
pub mod types;
