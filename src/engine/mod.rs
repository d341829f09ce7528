// Aggregation of package batches fetched from the trusted origin.

pub mod pipeline;
