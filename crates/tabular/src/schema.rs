#![forbid(unsafe_code)]

use crate::error::CodecError;
use std::collections::HashMap;

/// One CSV column bound to one field of the row type. The same binding
/// drives both directions: `get` renders the field on flatten, `set` parses
/// the cell on unflatten.
pub struct Column<T> {
    name: String,
    get: Box<dyn Fn(&T) -> String + Send + Sync>,
    set: Box<dyn Fn(&mut T, &str) + Send + Sync>,
}

impl<T> Column<T> {
    pub fn new(
        name: impl Into<String>,
        get: impl Fn(&T) -> String + Send + Sync + 'static,
        set: impl Fn(&mut T, &str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            get: Box::new(get),
            set: Box::new(set),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Result of a header-keyed CSV parse. Rows with a blank key cell (or a file
/// whose header lacks the key column entirely) are skipped, never fatal.
#[derive(Debug)]
pub struct CsvImport<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

/// Declarative column schema: declared once, reused for flatten and
/// unflatten, so the quarter-repetition structure lives in one place.
pub struct Schema<T> {
    key_column: String,
    columns: Vec<Column<T>>,
}

impl<T: Default> Schema<T> {
    pub fn new(key_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> String + Send + Sync + 'static,
        set: impl Fn(&mut T, &str) + Send + Sync + 'static,
    ) -> Self {
        self.columns.push(Column::new(name, get, set));
        self
    }

    pub fn push(&mut self, column: Column<T>) {
        self.columns.push(column);
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn flatten(&self, row: &T) -> Vec<String> {
        self.columns.iter().map(|c| (c.get)(row)).collect()
    }

    pub fn unflatten(&self, values: &HashMap<&str, &str>) -> T {
        let mut row = T::default();
        for column in &self.columns {
            if let Some(value) = values.get(column.name.as_str()) {
                (column.set)(&mut row, value);
            }
        }
        row
    }

    /// Serialize rows to CSV text. Quoting and escaping of embedded quotes,
    /// commas and newlines is handled by the csv writer.
    pub fn write_csv(&self, rows: &[T]) -> Result<String, CodecError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.headers())?;
        for row in rows {
            writer.write_record(self.flatten(row))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| CodecError::Csv(err.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Header-keyed parse: column order on re-import is irrelevant, unknown
    /// columns are ignored, and rows missing the key cell are counted as
    /// skipped.
    pub fn read_csv(&self, text: &str) -> Result<CsvImport<T>, CodecError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let key_index = headers
            .iter()
            .position(|name| name == self.key_column);

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };

            let key_present = key_index
                .and_then(|index| record.get(index))
                .is_some_and(|value| !value.trim().is_empty());
            if !key_present {
                skipped += 1;
                continue;
            }

            let mut values: HashMap<&str, &str> = HashMap::new();
            for (index, name) in headers.iter().enumerate() {
                if let Some(value) = record.get(index) {
                    values.insert(name, value);
                }
            }
            rows.push(self.unflatten(&values));
        }

        Ok(CsvImport { rows, skipped })
    }
}
