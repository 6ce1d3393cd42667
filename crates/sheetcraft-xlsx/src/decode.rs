//! Persisted representation -> workbook graph

use std::sync::Arc;

use sheetcraft_core::{Cell, CellAddress, CellValue, Style, StyleTable, Workbook, Worksheet};

use crate::document::{PersistedSheet, PersistedWorkbook, SharedStringItem, ValueDescriptor};
use crate::error::{XlsxError, XlsxResult};

/// Rebuild a workbook from its persisted form
///
/// Every style id is resolved through a [`StyleTable`] rebuilt from the
/// persisted lists, so a dangling reference anywhere fails the whole load.
/// Row and column defaults are restored as stored and cells are inserted
/// without re-applying them.
pub fn decode(persisted: PersistedWorkbook) -> XlsxResult<Workbook> {
    let PersistedWorkbook {
        properties,
        sheets,
        active_sheet,
        styles,
        shared_strings,
    } = persisted;

    let table = styles.into_table()?;
    let strings = Strings(&shared_strings);

    let mut workbook = Workbook::empty();
    for sheet in &sheets {
        let worksheet = workbook.add_worksheet(&sheet.name)?;
        decode_sheet(worksheet, sheet, &table, &strings)?;
    }

    if !workbook.is_empty() {
        if active_sheet < workbook.sheet_count() {
            workbook.set_active_sheet(active_sheet)?;
        } else {
            log::warn!("active sheet {} out of range, using first sheet", active_sheet);
        }
    }
    *workbook.properties_mut() = properties;

    log::debug!(
        "decoded {} sheets, {} cell formats, {} shared strings",
        workbook.sheet_count(),
        table.len(),
        shared_strings.len()
    );
    Ok(workbook)
}

struct Strings<'a>(&'a [SharedStringItem]);

impl Strings<'_> {
    fn value(&self, index: u32, cell: CellAddress) -> XlsxResult<CellValue> {
        match self.0.get(index as usize) {
            Some(SharedStringItem::Plain(s)) => Ok(CellValue::string(s)),
            Some(SharedStringItem::Rich(rt)) => Ok(CellValue::RichText(rt.clone())),
            None => Err(XlsxError::Parse(format!(
                "cell {} refers to shared string {} of {}",
                cell,
                index,
                self.0.len()
            ))),
        }
    }
}

fn decode_sheet(
    worksheet: &mut Worksheet,
    sheet: &PersistedSheet,
    table: &StyleTable,
    strings: &Strings<'_>,
) -> XlsxResult<()> {
    worksheet.set_visible(sheet.visible);

    // merges first so inserted cells learn their master
    for range in &sheet.merges {
        if range.is_single() {
            log::warn!("{}: ignoring single-cell merge {}", sheet.name, range);
            continue;
        }
        worksheet.merge_cells(*range)?;
    }

    for record in &sheet.columns {
        let style = default_style(table, record.style_id)?;
        for col in record.min..=record.max {
            let column = worksheet.column_mut(col)?;
            column.width = record.width;
            column.hidden = record.hidden;
            column.outline_level = record.outline_level;
            worksheet.restore_column_style(col, style.clone())?;
        }
    }

    for record in &sheet.rows {
        let row = worksheet.row_mut(record.number)?;
        row.height = record.height;
        row.hidden = record.hidden;
        row.outline_level = record.outline_level;
        worksheet.restore_row_style(record.number, default_style(table, record.style_id)?)?;

        for cell in &record.cells {
            let address = CellAddress::checked(record.number, cell.column as u32)?;
            let value = value(&cell.value, address, strings)?;
            let style = match cell.style_id {
                Some(id) => Some(Arc::clone(table.require_style(id)?)),
                None => None,
            };
            worksheet.insert_cell(Cell::with_parts(address, value, style))?;
        }
    }

    if let Some(panes) = sheet.freeze_panes {
        worksheet.set_freeze_panes(panes.rows, panes.cols)?;
    }
    Ok(())
}

fn default_style(table: &StyleTable, id: Option<u32>) -> XlsxResult<Option<Style>> {
    Ok(match id {
        Some(id) => Some(table.require_style(id)?.as_ref().clone()),
        None => None,
    })
}

fn value(
    descriptor: &ValueDescriptor,
    cell: CellAddress,
    strings: &Strings<'_>,
) -> XlsxResult<CellValue> {
    Ok(match descriptor {
        ValueDescriptor::Blank => CellValue::Empty,
        ValueDescriptor::Number(n) => CellValue::Number(*n),
        ValueDescriptor::Boolean(b) => CellValue::Boolean(*b),
        ValueDescriptor::Error(e) => CellValue::Error(*e),
        ValueDescriptor::Date(d) => CellValue::Date(*d),
        ValueDescriptor::SharedString(index) => strings.value(*index, cell)?,
        ValueDescriptor::InlineString(s) => CellValue::string(s),
        ValueDescriptor::Formula { text, cached } => match cached {
            Some(result) => {
                CellValue::formula_with_result(text.as_str(), value(result, cell, strings)?)
            }
            None => CellValue::formula(text.as_str()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{CellRecord, ColumnRecord, RowRecord, StyleLists};
    use pretty_assertions::assert_eq;
    use sheetcraft_core::{Color, Error as CoreError, FontStyle, RichText, StyleRefKind, XfRecord};

    fn lists_with_bold_font() -> StyleLists {
        StyleLists {
            num_fmts: Vec::new(),
            fonts: vec![FontStyle::default(), FontStyle::new().with_bold(true)],
            fills: Vec::new(),
            borders: Vec::new(),
            cell_xfs: vec![
                XfRecord::default(),
                XfRecord {
                    font_id: 1,
                    apply_font: true,
                    ..XfRecord::default()
                },
            ],
        }
    }

    fn one_sheet(rows: Vec<RowRecord>) -> PersistedWorkbook {
        let mut sheet = PersistedSheet::new("Data");
        sheet.rows = rows;
        PersistedWorkbook {
            sheets: vec![sheet],
            styles: lists_with_bold_font(),
            ..PersistedWorkbook::default()
        }
    }

    #[test]
    fn test_decode_restores_defaults_without_broadcast() {
        let mut persisted = one_sheet(vec![RowRecord {
            number: 3,
            style_id: Some(1),
            cells: vec![CellRecord {
                column: 2,
                value: ValueDescriptor::Number(1.0),
                style_id: None,
            }],
            ..RowRecord::default()
        }]);
        persisted.sheets[0].columns.push(ColumnRecord {
            min: 4,
            max: 6,
            width: Some(12.5),
            hidden: false,
            outline_level: 0,
            style_id: Some(1),
        });

        let wb = decode(persisted).unwrap();
        let ws = wb.worksheet(0).unwrap();
        let row = ws.find_row(3).unwrap();
        assert!(row.default_style().is_some_and(|s| s.font.as_ref().is_some_and(|f| f.bold)));
        // the stored cell had no explicit style and keeps none
        assert!(ws.find_cell("B3").unwrap().unwrap().style().is_none());
        for col in 4..=6 {
            assert_eq!(ws.find_column(col).unwrap().width, Some(12.5));
        }
    }

    #[test]
    fn test_dangling_cell_style_fails() {
        let persisted = one_sheet(vec![RowRecord {
            number: 1,
            cells: vec![CellRecord {
                column: 1,
                value: ValueDescriptor::Blank,
                style_id: Some(9),
            }],
            ..RowRecord::default()
        }]);

        match decode(persisted) {
            Err(XlsxError::Core(CoreError::UnknownStyleReference { kind, id })) => {
                assert_eq!(kind, StyleRefKind::CellStyle);
                assert_eq!(id, 9);
            }
            other => panic!("expected unknown style reference, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_font_fails() {
        let mut persisted = one_sheet(Vec::new());
        persisted.styles.cell_xfs.push(XfRecord {
            font_id: 40,
            apply_font: true,
            ..XfRecord::default()
        });
        assert!(matches!(
            decode(persisted),
            Err(XlsxError::Core(CoreError::UnknownStyleReference {
                kind: StyleRefKind::Font,
                id: 40
            }))
        ));
    }

    #[test]
    fn test_shared_string_kinds() {
        let mut persisted = one_sheet(vec![RowRecord {
            number: 1,
            cells: vec![
                CellRecord {
                    column: 1,
                    value: ValueDescriptor::SharedString(0),
                    style_id: None,
                },
                CellRecord {
                    column: 2,
                    value: ValueDescriptor::SharedString(1),
                    style_id: Some(1),
                },
            ],
            ..RowRecord::default()
        }]);
        let rich = RichText::new()
            .push("red", Some(FontStyle::new().with_color(Color::RED)))
            .push(" plain", None);
        persisted.shared_strings = vec![
            SharedStringItem::Plain("hello".into()),
            SharedStringItem::Rich(rich.clone()),
        ];

        let wb = decode(persisted).unwrap();
        let ws = wb.worksheet(0).unwrap();
        assert_eq!(ws.value("A1").unwrap(), CellValue::string("hello"));
        assert_eq!(ws.value("B1").unwrap(), CellValue::RichText(rich));
    }

    #[test]
    fn test_out_of_range_shared_string() {
        let persisted = one_sheet(vec![RowRecord {
            number: 1,
            cells: vec![CellRecord {
                column: 1,
                value: ValueDescriptor::SharedString(5),
                style_id: None,
            }],
            ..RowRecord::default()
        }]);
        assert!(matches!(decode(persisted), Err(XlsxError::Parse(_))));
    }
}
