// Adapters layer: concrete implementations of the domain ports (http catalog, key/value stores).

pub mod http;
pub mod storage;
