// Adapters layer: concrete implementations against external systems
// (the hosted mock REST API, the local session file).

pub mod rest;
pub mod session_file;

pub use rest::{RestComercioStore, RestUserStore};
pub use session_file::FileSessionStore;
