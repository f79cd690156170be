//! Reads factory/product rows out of an `xls` or `xlsx` workbook.
//!
//! Only the first worksheet is read. Its first row is the header; the three
//! configured columns may appear in any position and extra columns are
//! ignored.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

use crate::domain::model::SheetRow;
use crate::domain::ports::ColumnNames;
use crate::utils::error::{LabelError, Result};

pub struct SpreadsheetReader {
    columns: ColumnNames,
}

struct ColumnIndex {
    factory: usize,
    product_info: usize,
    product_quantity: usize,
}

impl SpreadsheetReader {
    pub fn new(columns: ColumnNames) -> Self {
        Self { columns }
    }

    pub fn read(&self, bytes: Vec<u8>) -> Result<Vec<SheetRow>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LabelError::EmptyWorkbook)??;

        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();
        let header = rows.next().ok_or(LabelError::NoProductRows)?;
        let index = self.locate_columns(header)?;

        let mut records = Vec::new();
        for (offset, row) in rows.enumerate() {
            // 1-based, and the header occupies the first used row
            let row_number = first_row + offset + 2;
            let factory_name = cell_text(row.get(index.factory));
            let product_info = cell_text(row.get(index.product_info));
            let product_quantity = cell_text(row.get(index.product_quantity));

            if factory_name.is_empty() {
                if product_info.is_empty() && product_quantity.is_empty() {
                    continue;
                }
                return Err(LabelError::MissingFactory { row: row_number });
            }

            records.push(SheetRow {
                row: row_number,
                factory_name,
                product_info,
                product_quantity,
            });
        }

        if records.is_empty() {
            return Err(LabelError::NoProductRows);
        }

        tracing::debug!("Read {} product rows from spreadsheet", records.len());
        Ok(records)
    }

    fn locate_columns(&self, header: &[Data]) -> Result<ColumnIndex> {
        let headers: Vec<String> = header.iter().map(|cell| cell_text(Some(cell))).collect();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let factory = position(self.columns.factory.as_str());
        let product_info = position(self.columns.product_info.as_str());
        let product_quantity = position(self.columns.product_quantity.as_str());

        match (factory, product_info, product_quantity) {
            (Some(factory), Some(product_info), Some(product_quantity)) => Ok(ColumnIndex {
                factory,
                product_info,
                product_quantity,
            }),
            _ => {
                let missing = [
                    (factory, &self.columns.factory),
                    (product_info, &self.columns.product_info),
                    (product_quantity, &self.columns.product_quantity),
                ]
                .into_iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name.clone())
                .collect();
                Err(LabelError::MissingColumns { missing })
            }
        }
    }
}

/// Text of a cell as it should appear on a label. Whole-number floats lose
/// their fractional part so `10.0` prints as `10`.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Some(other) => other.to_string().trim().to_string(),
    }
}
