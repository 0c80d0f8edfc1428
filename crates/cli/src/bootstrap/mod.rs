mod config;
mod logging;

pub use config::{load_config, socket_addr};
pub use logging::init_logging;
