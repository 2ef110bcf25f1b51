use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use structures::{decode_changes, encode_changes, PixelChange};

/// Reads a change log: `.csv` files as CSV, anything else as packed MessagePack.
pub fn load_changes(path: &Path) -> Result<Vec<PixelChange>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        read_csv(path)
    } else {
        let data = fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
        decode_changes(&data).with_context(|| format!("could not decode {}", path.display()))
    }
}

/// Expects an `artist,x,y,color,timestamp` header.
pub fn read_csv(path: &Path) -> Result<Vec<PixelChange>> {
    let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut changes = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let change: PixelChange =
            record.with_context(|| format!("bad change record at row {}", line + 1))?;
        changes.push(change);
    }

    Ok(changes)
}

pub fn pack(in_file: &Path, out_file: &Path) -> Result<usize> {
    let changes = read_csv(in_file)?;
    let packed = encode_changes(&changes).context("could not pack change log")?;

    fs::write(out_file, packed)
        .with_context(|| format!("could not write {}", out_file.display()))?;

    Ok(changes.len())
}
