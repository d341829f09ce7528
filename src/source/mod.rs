// Package sources: the trusted origin and the fetchers that read from it.

pub mod http_source;
pub mod origin;
pub mod traits;
