//! Process-wide state shared by the build, watch and serve paths.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
