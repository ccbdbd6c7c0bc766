// Adapters layer: concrete implementations of the domain ports backed by the OS.

pub mod wifi;
