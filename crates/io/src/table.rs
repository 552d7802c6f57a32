/// A header row plus string cells, independent of the source format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Split raw records into header + body. Leading blank records are skipped
    /// so a sheet starting with empty rows still finds its header.
    pub fn from_records(records: Vec<Vec<String>>) -> Option<Self> {
        let mut iter = records.into_iter().skip_while(|r| is_blank(r));
        let headers = iter.next()?;
        Some(Self {
            headers,
            rows: iter.collect(),
        })
    }

    /// Cell at (row, col), empty if the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub(crate) fn is_blank(record: &[String]) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}
