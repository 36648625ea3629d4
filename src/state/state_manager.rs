use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::sim_config::SimConfig;

use super::memory_model::{Address, MemoryError, MemoryStore, MemoryViewer};
use super::memory_value::MemoryValue;
use super::query::RamView;
use super::trace_loader::TraceOp;

/// Which collaborator issued a write to main memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOrigin {
    Store,     // retirement of a CPU store instruction (SW)
    WriteBack, // cache eviction or write-back
}

impl fmt::Display for WriteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOrigin::Store => write!(f, "SW"),
            WriteOrigin::WriteBack => write!(f, "WB"),
        }
    }
}

/// Simulation-side owner of main memory. The CPU and cache layers write
/// through it; observers only get a [`MemoryViewer`] or a [`RamView`].
#[derive(Debug)]
pub struct State {
    memory: MemoryStore,
    pub max_address: Address,
    pub reset_count: u64,
}

impl State {
    pub fn new(config: &SimConfig) -> Self {
        log::info!("Initializing main memory, addressable up to 0x{:x}", config.max_address);
        State {
            memory: MemoryStore::new(),
            max_address: config.max_address,
            reset_count: 0,
        }
    }

    /// State built from the process-wide configuration.
    pub fn from_global_config() -> Self {
        State::new(&SimConfig::global())
    }

    // Used in tests to skip the global configuration
    pub fn default_for_tests() -> Self {
        State::new(&SimConfig::default())
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn viewer(&self) -> MemoryViewer {
        self.memory.viewer()
    }

    /// Applies one write after the range check. Writes are never reordered.
    pub fn write(&mut self, origin: WriteOrigin, address: Address, value: MemoryValue) -> Result<(), MemoryError> {
        if address > self.max_address {
            log::warn!("Rejected {} to 0x{:x}: above limit 0x{:x}", origin, address, self.max_address);
            return Err(MemoryError::OutOfRange { address, max_address: self.max_address });
        }
        log::trace!("{} 0x{:x}", origin, address);
        self.memory.write(address, value);
        Ok(())
    }

    pub fn store_word(&mut self, address: Address, value: impl Into<MemoryValue>) -> Result<(), MemoryError> {
        self.write(WriteOrigin::Store, address, value.into())
    }

    pub fn write_back(&mut self, address: Address, value: impl Into<MemoryValue>) -> Result<(), MemoryError> {
        self.write(WriteOrigin::WriteBack, address, value.into())
    }

    pub fn reset(&mut self) {
        self.memory.clear();
        self.reset_count += 1;
    }

    pub fn apply(&mut self, op: TraceOp) -> Result<(), MemoryError> {
        match op {
            TraceOp::Write { origin, address, value } => self.write(origin, address, value),
            TraceOp::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Replays a trace in order, stopping at the first rejected write.
    /// Returns how many operations were applied.
    pub fn apply_trace<I: IntoIterator<Item = TraceOp>>(&mut self, ops: I) -> Result<usize, MemoryError> {
        let mut applied = 0;
        for op in ops {
            self.apply(op)?;
            applied += 1;
        }
        Ok(applied)
    }

    pub fn ram_view(&self, term: &str) -> RamView {
        RamView::derive(&self.memory.snapshot(), term)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Main memory:")?;
        writeln!(f, "  used blocks: {}", self.memory.len())?;
        writeln!(f, "  writes since reset: {}", self.memory.write_count())?;
        writeln!(f, "  resets: {}", self.reset_count)?;
        Ok(())
    }
}

/// Tees everything written to it into a log file and the terminal.
/// Also serves as the `log` backend of the binary.
#[derive(Clone, Debug)]
pub struct Logger {
    file: Arc<Mutex<File>>,
    terminal: Arc<Mutex<io::Stdout>>,
    level: log::LevelFilter,
}

impl Logger {
    pub fn new(file_path: &str) -> io::Result<Self> {
        let file = File::create(file_path)?;
        Ok(Logger {
            file: Arc::new(Mutex::new(file)),
            terminal: Arc::new(Mutex::new(io::stdout())),
            level: log::LevelFilter::Info,
        })
    }

    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Installs a clone of this logger behind the `log` macros.
    pub fn install(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.level);
        Ok(())
    }
}

impl Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let mut terminal = self.terminal.lock().unwrap_or_else(PoisonError::into_inner);

        file.write_all(buf)?;
        terminal.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let mut terminal = self.terminal.lock().unwrap_or_else(PoisonError::into_inner);

        file.flush()?;
        terminal.flush()?;
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}\n", record.level(), record.target(), record.args());
        // A failing log sink must not take the simulation down
        let _ = self.clone().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = Write::flush(&mut self.clone());
    }
}
