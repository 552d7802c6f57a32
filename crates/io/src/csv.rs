// CSV/TSV reading into a RawTable

use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::table::RawTable;

/// Read a delimited file, sniffing the delimiter.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    log::debug!("{}: delimiter {:?}", path.display(), delimiter as char);
    parse_table(&content, delimiter)
}

/// Parse delimited text. Rows may be ragged; short rows read as empty cells.
pub fn parse_table(content: &str, delimiter: u8) -> Result<RawTable, LoadError> {
    // Excel-exported CSVs often start with a UTF-8 BOM.
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::Parse(format!("line {}: {}", line + 1, e)))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    RawTable::from_records(records).ok_or(LoadError::EmptyTable)
}

/// Pick the delimiter (tab, semicolon, comma, pipe) giving the most
/// consistent multi-field split over the first lines.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                ::csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let target = match counts.first() {
            Some(&n) if n > 1 => n,
            _ => continue,
        };

        // Lines agreeing with the header's field count, weighted by width.
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1252 for legacy exports.
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::debug!("{}: not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sniff_semicolon() {
        let content = "company;analyst;firm\nAcme;Alice;FirmX\nGlobex;Bob;FirmY\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniff_tab() {
        let content = "company\tanalyst\tfirm\nAcme\tAlice\tFirmX\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn sniff_comma_with_quoted_semicolons() {
        let content = "company,analyst,firm\n\"Acme; Inc\",Alice,FirmX\nGlobex,Bob,FirmY\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn sniff_defaults_to_comma_for_single_column() {
        assert_eq!(sniff_delimiter("company\nAcme\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn parse_strips_bom_and_handles_ragged_rows() {
        let t = parse_table("\u{feff}company,analyst,firm\nAcme,Alice\n", b',').unwrap();
        assert_eq!(t.headers[0], "company");
        assert_eq!(t.cell(0, 1), "Alice");
        assert_eq!(t.cell(0, 2), "");
    }

    #[test]
    fn empty_content_is_empty_table() {
        let err = parse_table("\n\n", b',').unwrap_err();
        assert!(matches!(err, LoadError::EmptyTable));
    }

    #[test]
    fn windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        // "Soci\xe9t\xe9" = "Société" in Windows-1252
        let mut bytes = b"company,analyst,firm\nSoci".to_vec();
        bytes.extend_from_slice(&[0xe9, b't', 0xe9]);
        bytes.extend_from_slice(b",Alice,FirmX\n");
        fs::write(&path, bytes).unwrap();

        let t = read_table(&path).unwrap();
        assert_eq!(t.cell(0, 0), "Société");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/nonexistent/coverage.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
