//! Input decoding: raw export bytes to text, and field delimiter detection.

use std::path::Path;

const CANDIDATES: &[u8] = b",;\t|";
const SNIFF_LINES: usize = 10;

/// Read a file as text. UTF-8 is used as-is; anything else is taken to be
/// Windows-1252, the usual encoding of spreadsheet-saved CSVs.
pub fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode(bytes))
}

pub fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Pick the delimiter that splits the first lines into the most consistent
/// multi-field rows. Earlier candidates win ties; comma if nothing splits.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(SNIFF_LINES).collect();

    let mut best = (b',', 0usize, 0usize);
    for &delim in CANDIDATES {
        let counts: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let Some(&header) = counts.first() else {
            break;
        };
        if header <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == header).count();
        if (consistent, header) > (best.1, best.2) {
            best = (delim, consistent, header);
        }
    }
    best.0
}

fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// Parse a `--delimiter` argument: a single ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(arg: &str) -> Result<u8, String> {
    match arg {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => Err(format!("delimiter must be a single ASCII character, got {other:?}")),
    }
}
