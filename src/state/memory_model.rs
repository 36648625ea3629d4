// Sparse main memory model: word addressed, one tagged value per written address

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::memory_value::MemoryValue;

pub type Address = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    InvalidAddress(String),
    OutOfRange { address: Address, max_address: Address },
}

impl Error for MemoryError {}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::InvalidAddress(raw) => write!(f, "Invalid memory address: '{}'", raw),
            MemoryError::OutOfRange { address, max_address } => write!(
                f,
                "Memory address 0x{:x} is above the addressable limit 0x{:x}",
                address, max_address
            ),
        }
    }
}

/// Parses an address written either as `0x`-prefixed hexadecimal or as plain decimal.
pub fn parse_address(raw: &str) -> Result<Address, MemoryError> {
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(hex, 16),
        None => trimmed.parse::<Address>(),
    };
    parsed.map_err(|_| MemoryError::InvalidAddress(raw.to_string()))
}

/// Converts a signed integer coming from an untyped collaborator into an address.
pub fn address_from_signed(raw: i64) -> Result<Address, MemoryError> {
    Address::try_from(raw).map_err(|_| MemoryError::InvalidAddress(raw.to_string()))
}

/// One (address, value) pair as handed out to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCell {
    pub address: Address,
    pub value: MemoryValue,
}

impl MemoryCell {
    pub fn new(address: Address, value: MemoryValue) -> Self {
        MemoryCell { address, value }
    }
}

#[derive(Debug, Default)]
struct MemoryCells {
    cells: BTreeMap<Address, MemoryValue>,
    write_count: u64,
}

type SharedCells = Arc<RwLock<MemoryCells>>;

// Every mutation is a single map operation, so a poisoned lock still guards a valid map.
fn read_cells(cells: &SharedCells) -> RwLockReadGuard<'_, MemoryCells> {
    cells.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_cells(cells: &SharedCells) -> RwLockWriteGuard<'_, MemoryCells> {
    cells.write().unwrap_or_else(PoisonError::into_inner)
}

fn snapshot_of(cells: &SharedCells) -> Vec<MemoryCell> {
    read_cells(cells)
        .cells
        .iter()
        .map(|(&address, value)| MemoryCell::new(address, value.clone()))
        .collect()
}

/// Authoritative content of main memory for one simulation session.
///
/// Only the owner of the store can mutate it. Observers get either a
/// [`MemoryViewer`] or a snapshot, both read-only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cells: SharedCells,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Inserts or replaces the cell at `address`. The new value's tag wins.
    pub fn write(&mut self, address: Address, value: impl Into<MemoryValue>) {
        let value = value.into();
        let mut guard = write_cells(&self.cells);
        log::debug!("RAM write 0x{:x} <- {}", address, value);
        guard.cells.insert(address, value);
        guard.write_count += 1;
    }

    pub fn read(&self, address: Address) -> Option<MemoryValue> {
        read_cells(&self.cells).cells.get(&address).cloned()
    }

    pub fn contains(&self, address: Address) -> bool {
        read_cells(&self.cells).cells.contains_key(&address)
    }

    /// Drops every cell, as on a simulation reset.
    pub fn clear(&mut self) {
        let mut guard = write_cells(&self.cells);
        log::info!("Clearing main memory ({} cells)", guard.cells.len());
        guard.cells.clear();
        guard.write_count = 0;
    }

    /// Point-in-time copy of all cells, ascending by address.
    pub fn snapshot(&self) -> Vec<MemoryCell> {
        snapshot_of(&self.cells)
    }

    pub fn len(&self) -> usize {
        read_cells(&self.cells).cells.len()
    }

    pub fn is_empty(&self) -> bool {
        read_cells(&self.cells).cells.is_empty()
    }

    // Writes applied since creation or the last clear, overwrites included
    pub fn write_count(&self) -> u64 {
        read_cells(&self.cells).write_count
    }

    pub fn viewer(&self) -> MemoryViewer {
        MemoryViewer { cells: Arc::clone(&self.cells) }
    }
}

/// Read-only handle on a [`MemoryStore`], safe to poll from another thread.
#[derive(Debug, Clone)]
pub struct MemoryViewer {
    cells: SharedCells,
}

impl MemoryViewer {
    pub fn read(&self, address: Address) -> Option<MemoryValue> {
        read_cells(&self.cells).cells.get(&address).cloned()
    }

    pub fn snapshot(&self) -> Vec<MemoryCell> {
        snapshot_of(&self.cells)
    }

    pub fn len(&self) -> usize {
        read_cells(&self.cells).cells.len()
    }

    pub fn is_empty(&self) -> bool {
        read_cells(&self.cells).cells.is_empty()
    }
}
