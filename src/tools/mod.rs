// Ankr tool layer: the static schema registry, the argument normalizer,
// and the JSON-RPC invoker.
pub mod invoker;
pub mod params;
pub mod schema;
