// Server module entry
// Listener setup, the accept loop, connection handling, and signals.

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), mount it as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used entry points
pub use listener::create_listener;
pub use server_loop::start_server_loop;
