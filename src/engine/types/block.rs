use super::field::Field;

/// One named column of a [`DataBlock`]. `values[i]` belongs to row `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// Columnar slice of matching rows handed to the per-block callback.
///
/// All columns carry the same number of values. An empty value means the
/// field is absent for that row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBlock {
    pub columns: Vec<BlockColumn>,
}

impl DataBlock {
    pub fn rows_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    /// Builds a block from row-oriented records. Fields missing from a row
    /// become empty values in the corresponding column.
    pub fn from_rows(rows: &[Vec<Field>]) -> Self {
        let mut columns: Vec<BlockColumn> = Vec::new();
        for (row_idx, row) in rows.iter().enumerate() {
            for field in row {
                let idx = match columns.iter().position(|c| c.name == field.name) {
                    Some(idx) => idx,
                    None => {
                        columns.push(BlockColumn {
                            name: field.name.clone(),
                            values: vec![String::new(); row_idx],
                        });
                        columns.len() - 1
                    }
                };
                let column = &mut columns[idx];
                column.values.push(field.value.clone());
            }
            for column in &mut columns {
                column.values.resize(row_idx + 1, String::new());
            }
        }
        Self { columns }
    }

    /// Non-empty fields of row `row_idx`, in column order.
    pub fn row_fields(&self, row_idx: usize) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().filter_map(move |column| {
            let value = column.values.get(row_idx)?;
            if value.is_empty() {
                None
            } else {
                Some((column.name.as_str(), value.as_str()))
            }
        })
    }
}
