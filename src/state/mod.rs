pub mod memory_model;
pub mod memory_value;
pub mod query;
pub mod state_manager;
pub mod trace_loader;

pub use memory_model::{Address, MemoryCell, MemoryError, MemoryStore, MemoryViewer};
pub use memory_value::MemoryValue;
pub use query::{filter_entries, RamView, ViewOutcome};
pub use state_manager::{Logger, State, WriteOrigin};
