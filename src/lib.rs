pub mod sim_config;
pub mod state;

pub use state::{MemoryStore, MemoryValue, State};

#[macro_use]
extern crate lazy_static;
