/// Reader for textual write traces, as produced by a CPU/cache run.
///
/// One operation per line:
///   [SW|WB] <address> = <value>
///   RESET
/// Addresses are `0x` hex or decimal, values are signed decimal integers or
/// double-quoted strings. `#` starts a comment.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use super::memory_model::{parse_address, Address};
use super::memory_value::MemoryValue;
use super::state_manager::WriteOrigin;

lazy_static! {
    static ref WRITE_LINE: Regex =
        Regex::new(r"^(?:(?P<origin>SW|WB)\s+)?(?P<address>[^\s=]+)\s*=\s*(?P<value>.+)$")
            .expect("write line pattern is valid");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOp {
    Write { origin: WriteOrigin, address: Address, value: MemoryValue },
    Reset,
}

fn parse_value(raw: &str) -> Result<MemoryValue> {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
        return Ok(MemoryValue::Text(inner.to_string()));
    }
    raw.parse::<i64>()
        .map(MemoryValue::Integer)
        .map_err(|_| anyhow!("value '{}' is neither an integer nor a quoted string", raw))
}

// Drops everything from the first `#` that sits outside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Parses a single trace line. Blank lines and comments yield `None`.
pub fn parse_trace_line(line: &str) -> Result<Option<TraceOp>> {
    let content = strip_comment(line);
    let content = content.trim();
    if content.is_empty() {
        return Ok(None);
    }
    if content.eq_ignore_ascii_case("RESET") {
        return Ok(Some(TraceOp::Reset));
    }

    let caps = WRITE_LINE
        .captures(content)
        .ok_or_else(|| anyhow!("malformed write '{}'", content))?;
    let origin = match caps.name("origin").map(|m| m.as_str()) {
        Some("WB") => WriteOrigin::WriteBack,
        _ => WriteOrigin::Store,
    };
    let address = parse_address(&caps["address"])?;
    let value = parse_value(&caps["value"])?;
    Ok(Some(TraceOp::Write { origin, address, value }))
}

pub fn parse_trace(source: &str) -> Result<Vec<TraceOp>> {
    let mut ops = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let parsed = parse_trace_line(line)
            .with_context(|| format!("Error parsing trace line {}: {}", idx + 1, line))?;
        ops.extend(parsed);
    }
    Ok(ops)
}

pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<TraceOp>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace file {:?}", path))?;
    parse_trace(&source)
}
