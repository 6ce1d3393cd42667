//! Workbook graph -> persisted representation

use sheetcraft_core::{Cell, CellValue, Column, StyleTable, Workbook, Worksheet};

use crate::document::{
    CellRecord, ColumnRecord, PersistedSheet, PersistedWorkbook, RowRecord, SharedStringItem,
    StyleLists, ValueDescriptor,
};
use crate::shared_strings::SharedStrings;

/// Flatten a workbook into its persisted form
///
/// Interns every explicit cell style and row/column default into a fresh
/// [`StyleTable`] and every string into a fresh shared-string list.
pub fn encode(workbook: &Workbook) -> PersistedWorkbook {
    let mut encoder = Encoder {
        styles: StyleTable::new(),
        strings: SharedStrings::new(),
    };

    let sheets = workbook
        .worksheets()
        .map(|sheet| encoder.sheet(sheet))
        .collect();

    log::trace!(
        "encoded {} sheets: {} cell formats, {} fonts",
        workbook.sheet_count(),
        encoder.styles.len(),
        encoder.styles.fonts().len()
    );

    PersistedWorkbook {
        properties: workbook.properties().clone(),
        sheets,
        active_sheet: workbook.active_sheet(),
        styles: StyleLists::from_table(&encoder.styles),
        shared_strings: encoder.strings.into_items(),
    }
}

struct Encoder {
    styles: StyleTable,
    strings: SharedStrings,
}

impl Encoder {
    fn sheet(&mut self, sheet: &Worksheet) -> PersistedSheet {
        let mut persisted = PersistedSheet::new(sheet.name());
        persisted.visible = sheet.is_visible();
        persisted.merges = sheet.merged_regions().to_vec();
        persisted.freeze_panes = sheet.freeze_panes().copied();

        for row in sheet.rows() {
            if row.is_empty() {
                continue;
            }
            let cells = row.cells().map(|cell| self.cell(cell)).collect();
            persisted.rows.push(RowRecord {
                number: row.number(),
                height: row.height,
                hidden: row.hidden,
                outline_level: row.outline_level,
                style_id: row.default_style().map(|s| self.styles.intern(s)),
                cells,
            });
        }

        persisted.columns = self.columns(sheet.columns().filter(|c| c.has_custom_settings()));
        persisted
    }

    fn cell(&mut self, cell: &Cell) -> CellRecord {
        CellRecord {
            column: cell.address().col,
            value: self.value(cell.value()),
            style_id: cell.style().map(|s| self.styles.intern(s)),
        }
    }

    fn value(&mut self, value: &CellValue) -> ValueDescriptor {
        match value {
            CellValue::Empty => ValueDescriptor::Blank,
            CellValue::Number(n) => ValueDescriptor::Number(*n),
            CellValue::Boolean(b) => ValueDescriptor::Boolean(*b),
            CellValue::Date(d) => ValueDescriptor::Date(*d),
            CellValue::Error(e) => ValueDescriptor::Error(*e),
            CellValue::String(s) => ValueDescriptor::SharedString(
                self.strings
                    .intern(SharedStringItem::Plain(s.as_str().to_string())),
            ),
            CellValue::RichText(rt) => {
                ValueDescriptor::SharedString(self.strings.intern(SharedStringItem::Rich(rt.clone())))
            }
            CellValue::Formula {
                text,
                cached_value,
            } => ValueDescriptor::Formula {
                text: text.strip_prefix('=').unwrap_or(text).to_string(),
                cached: cached_value
                    .as_deref()
                    .and_then(formula_result)
                    .map(Box::new),
            },
        }
    }

    /// Coalesce adjacent columns with identical settings into ranges
    fn columns<'a>(&mut self, columns: impl Iterator<Item = &'a Column>) -> Vec<ColumnRecord> {
        let mut records: Vec<ColumnRecord> = Vec::new();
        let mut previous: Option<&Column> = None;

        for column in columns {
            let extends = match (previous, records.last()) {
                (Some(prev), Some(last)) => {
                    last.max + 1 == column.number() && prev.same_settings(column)
                }
                _ => false,
            };
            if extends {
                if let Some(last) = records.last_mut() {
                    last.max = column.number();
                }
            } else {
                records.push(ColumnRecord {
                    min: column.number(),
                    max: column.number(),
                    width: column.width,
                    hidden: column.hidden,
                    outline_level: column.outline_level,
                    style_id: column.default_style().map(|s| self.styles.intern(s)),
                });
            }
            previous = Some(column);
        }
        records
    }
}

/// Cached results are stored inline; strings become `t="str"` values
fn formula_result(value: &CellValue) -> Option<ValueDescriptor> {
    Some(match value {
        CellValue::Number(n) => ValueDescriptor::Number(*n),
        CellValue::Boolean(b) => ValueDescriptor::Boolean(*b),
        CellValue::Date(d) => ValueDescriptor::Date(*d),
        CellValue::Error(e) => ValueDescriptor::Error(*e),
        CellValue::String(s) => ValueDescriptor::InlineString(s.as_str().to_string()),
        CellValue::RichText(rt) => ValueDescriptor::InlineString(rt.plain_text()),
        CellValue::Empty | CellValue::Formula { .. } => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetcraft_core::{Color, FontStyle, HorizontalAlignment, RichText, Style};

    #[test]
    fn test_equal_styles_share_one_record() {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet("Sheet1").unwrap();
        let red = Style::new().fill_color(Color::RED);
        sheet.set_style("A1", red.clone()).unwrap();
        sheet.set_style("C7", red).unwrap();
        sheet
            .set_style("B2", Style::new().fill_color(Color::BLUE))
            .unwrap();

        let persisted = encode(&wb);
        let ids: Vec<_> = persisted.sheets[0]
            .rows
            .iter()
            .flat_map(|r| r.cells.iter().map(|c| c.style_id))
            .collect();
        // rows 1, 2, 7
        assert_eq!(ids[0], ids[2]);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.is_some_and(|id| id != 0)));
    }

    #[test]
    fn test_strings_are_shared() {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet("Sheet1").unwrap();
        sheet.set_value("A1", "same").unwrap();
        sheet.set_value("A2", "same").unwrap();
        sheet
            .set_value("A3", RichText::new().push("same", Some(FontStyle::new().with_bold(true))))
            .unwrap();

        let persisted = encode(&wb);
        assert_eq!(persisted.shared_strings.len(), 2);
        assert_eq!(persisted.string_references(), 3);
        let values: Vec<_> = persisted.sheets[0]
            .rows
            .iter()
            .map(|r| r.cells[0].value.clone())
            .collect();
        assert_eq!(
            values,
            vec![
                ValueDescriptor::SharedString(0),
                ValueDescriptor::SharedString(0),
                ValueDescriptor::SharedString(1),
            ]
        );
    }

    #[test]
    fn test_columns_coalesce() {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet("Sheet1").unwrap();
        for col in 2..=4 {
            sheet.set_column_width(col, 20.0).unwrap();
        }
        sheet.set_column_width(5, 8.0).unwrap();
        sheet.set_column_width(7, 8.0).unwrap();
        sheet
            .set_column_facet(
                8,
                sheetcraft_core::Alignment::new().with_horizontal(HorizontalAlignment::Right),
            )
            .unwrap();

        let persisted = encode(&wb);
        let spans: Vec<_> = persisted.sheets[0]
            .columns
            .iter()
            .map(|c| (c.min, c.max, c.width, c.style_id.is_some()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (2, 4, Some(20.0), false),
                (5, 5, Some(8.0), false),
                (7, 7, Some(8.0), false),
                (8, 8, None, true),
            ]
        );
    }

    #[test]
    fn test_formula_text_and_result() {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet("Sheet1").unwrap();
        sheet
            .set_value("A1", CellValue::formula_with_result("CONCAT(\"a\",\"b\")", "ab".into()))
            .unwrap();

        let persisted = encode(&wb);
        assert_eq!(
            persisted.sheets[0].rows[0].cells[0].value,
            ValueDescriptor::Formula {
                text: "CONCAT(\"a\",\"b\")".into(),
                cached: Some(Box::new(ValueDescriptor::InlineString("ab".into()))),
            }
        );
    }

    #[test]
    fn test_rows_without_cells_or_settings_are_skipped() {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet("Sheet1").unwrap();
        sheet.set_value("A1", 1).unwrap();
        sheet.set_value("A2", 2).unwrap();
        sheet.clear_cell("A2").unwrap();
        sheet.set_row_height(3, 24.0).unwrap();

        let persisted = encode(&wb);
        let rows: Vec<_> = persisted.sheets[0]
            .rows
            .iter()
            .map(|r| (r.number, r.cells.len(), r.height))
            .collect();
        assert_eq!(rows, vec![(1, 1, None), (3, 0, Some(24.0))]);
    }
}
