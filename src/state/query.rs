/// Read side of main memory: address search and the data the RAM view renders.

use super::memory_model::{Address, MemoryCell};

// Canonical forms an address is searched under
fn hex_form(address: Address) -> String {
    format!("0x{:x}", address)
}

fn decimal_form(address: Address) -> String {
    address.to_string()
}

/// True when `term` (already lowercased and trimmed) occurs in either canonical form of `address`.
pub fn address_matches(address: Address, term: &str) -> bool {
    hex_form(address).contains(term) || decimal_form(address).contains(term)
}

/// Keeps the entries whose address matches `term`, preserving snapshot order.
/// An empty or blank term keeps everything.
pub fn filter_entries(snapshot: &[MemoryCell], term: &str) -> Vec<MemoryCell> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return snapshot.to_vec();
    }
    snapshot
        .iter()
        .filter(|cell| address_matches(cell.address, &term))
        .cloned()
        .collect()
}

/// `0x` followed by uppercase hex, zero padded to at least `width` digits.
pub fn format_address(address: Address, width: usize) -> String {
    format!("0x{:0width$X}", address, width = width)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    // Nothing was ever written
    Empty,
    NoMatch { term: String },
    Entries(Vec<MemoryCell>),
}

/// What the RAM page shows for one snapshot and search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamView {
    pub used_blocks: usize,
    pub outcome: ViewOutcome,
}

impl RamView {
    pub fn derive(snapshot: &[MemoryCell], term: &str) -> Self {
        let used_blocks = snapshot.len();
        if snapshot.is_empty() {
            return RamView { used_blocks, outcome: ViewOutcome::Empty };
        }

        let entries = filter_entries(snapshot, term);
        let outcome = if entries.is_empty() {
            ViewOutcome::NoMatch { term: term.to_string() }
        } else {
            ViewOutcome::Entries(entries)
        };
        RamView { used_blocks, outcome }
    }

    /// Text rendering of the view, one `ADDRESS  value` row per cell.
    pub fn render(&self, address_width: usize) -> String {
        let mut out = format!("Used Blocks: {}\n", self.used_blocks);
        match &self.outcome {
            ViewOutcome::Empty => {
                out.push_str("Memory Empty: no data has been written to RAM yet.\n");
            }
            ViewOutcome::NoMatch { term } => {
                out.push_str(&format!("No memory blocks found matching \"{}\"\n", term));
            }
            ViewOutcome::Entries(entries) => {
                for cell in entries {
                    out.push_str(&format!(
                        "{}  {}\n",
                        format_address(cell.address, address_width),
                        cell.value
                    ));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::memory_value::MemoryValue;

    fn cells(addresses: &[Address]) -> Vec<MemoryCell> {
        addresses
            .iter()
            .map(|&a| MemoryCell::new(a, MemoryValue::Integer(a as i64)))
            .collect()
    }

    #[test]
    fn test_hex_match_is_case_insensitive() {
        let snapshot = cells(&[0xab, 0xcd]);
        let found = filter_entries(&snapshot, " 0XAB ");
        assert_eq!(found, cells(&[0xab]));
    }

    #[test]
    fn test_decimal_form_matches() {
        let snapshot = cells(&[256, 257, 10]);
        assert_eq!(filter_entries(&snapshot, "257"), cells(&[257]));
        // "0x" prefix appears in every hex form
        assert_eq!(filter_entries(&snapshot, "0x"), snapshot);
    }

    #[test]
    fn test_blank_term_is_identity() {
        let snapshot = cells(&[3, 1 << 40]);
        assert_eq!(filter_entries(&snapshot, "   "), snapshot);
    }

    #[test]
    fn test_format_address_pads_without_truncating() {
        assert_eq!(format_address(0x1f, 3), "0x01F");
        assert_eq!(format_address(0x12345, 3), "0x12345");
        assert_eq!(format_address(0, 0), "0x0");
    }

    #[test]
    fn test_render_rows() {
        let snapshot = vec![
            MemoryCell::new(0x100, MemoryValue::Integer(7)),
            MemoryCell::new(0x101, MemoryValue::Text("hi".to_string())),
        ];
        let view = RamView::derive(&snapshot, "");
        assert_eq!(view.render(3), "Used Blocks: 2\n0x100  7\n0x101  \"hi\"\n");
    }

    #[test]
    fn test_render_empty_and_no_match_differ() {
        let empty = RamView::derive(&[], "zzz");
        assert!(empty.render(3).contains("Memory Empty"));

        let missed = RamView::derive(&cells(&[1]), "zzz");
        assert!(missed.render(3).contains("No memory blocks found matching \"zzz\""));
    }
}
