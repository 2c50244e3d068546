//! Program image loader.
//!
//! Object files are ASCII hex records, one word per line:
//!
//! ```text
//! AAAAAAAA DDDDDDDD
//! ```
//!
//! where `A` is the word address and `D` the word value, both eight hex
//! digits. Records load into the functional memory before simulation
//! starts; the initial PC is the start of the text segment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::mem::Memory;

/// Loads an object file into memory.
///
/// Returns the number of words loaded. Malformed records fail with the
/// offending line number.
pub fn load_object(mem: &mut Memory, path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read program image '{}'", path.display()))?;
    load_object_str(mem, &text)
        .with_context(|| format!("malformed program image '{}'", path.display()))
}

/// Loads object records from an in-memory string.
pub fn load_object_str(mem: &mut Memory, text: &str) -> Result<usize> {
    let mut words = 0;
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(addr), Some(data), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("line {}: expected 'ADDRESS DATA'", lineno + 1);
        };
        let addr = u32::from_str_radix(addr, 16)
            .with_context(|| format!("line {}: bad address '{addr}'", lineno + 1))?;
        let data = u32::from_str_radix(data, 16)
            .with_context(|| format!("line {}: bad data '{data}'", lineno + 1))?;
        mem.write_32(addr, data);
        words += 1;
    }
    Ok(words)
}

/// Loads a sequence of instruction words at `base`.
pub fn load_words(mem: &mut Memory, base: u32, words: &[u32]) {
    for (i, word) in words.iter().enumerate() {
        mem.write_32(base.wrapping_add(4 * i as u32), *word);
    }
}
