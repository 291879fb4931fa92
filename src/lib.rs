// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod pool;
pub mod runtime;
pub mod select;
pub mod session;
pub mod source;
pub mod speech;
pub mod trainer;
