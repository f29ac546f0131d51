use blog_models::{KeywordColumn, KeywordTable, Topic, WebsiteLink};
use calamine::{Data, Range};

/// A worksheet as header row plus records. A `None` cell is an empty one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("Unnamed: {i}")))
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(Option::is_some))
            .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn cell(&self, row: &[Option<String>], column: Option<usize>) -> Option<String> {
        column.and_then(|i| row.get(i).cloned().flatten())
    }

    /// Each column becomes a keyword category; empty cells are dropped.
    pub fn to_keyword_table(&self) -> KeywordTable {
        let columns = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| KeywordColumn {
                name: name.clone(),
                values: self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i).cloned().flatten())
                    .collect(),
            })
            .collect();
        KeywordTable::new(columns)
    }

    pub fn to_topics(&self) -> Vec<Topic> {
        let topic = self.column_index("Topic");
        let description = self.column_index("Description");
        let source = self.column_index("Source & URL");
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| Topic {
                topic: self
                    .cell(row, topic)
                    .unwrap_or_else(|| format!("Topic_{}", i + 1)),
                description: self.cell(row, description).unwrap_or_default(),
                source: self.cell(row, source).unwrap_or_default(),
            })
            .collect()
    }

    pub fn to_links(&self) -> Vec<WebsiteLink> {
        let name = self.column_index("Name");
        let url = self.column_index("URL");
        self.rows
            .iter()
            .filter_map(|row| {
                let link_name = self.cell(row, name);
                let link_url = self.cell(row, url);
                if link_name.is_none() && link_url.is_none() {
                    return None;
                }
                Some(WebsiteLink {
                    name: link_name.unwrap_or_else(|| "Link".to_string()),
                    url: link_url.unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Text of a cell, or `None` for blanks. Whole floats print without a
/// fractional part so numeric ids read the way they were typed.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
