// HTTP surface: `POST /render` and the liveness probe.

pub mod handler;
