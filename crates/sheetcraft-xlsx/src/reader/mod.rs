//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::decode::decode;
use crate::document::{
    CellRecord, ColumnRecord, PersistedSheet, PersistedWorkbook, RowRecord, StyleLists,
    ValueDescriptor,
};
use crate::error::{XlsxError, XlsxResult};
use crate::shared_strings::read_shared_strings_xml;
use crate::styles::read_styles_xml;
use crate::writer::DATE_FORMAT;
use crate::xml::{attr, attr_bool, attr_parse, decode_excel_escapes, parse_bool};
use sheetcraft_core::{
    CellAddress, CellError, CellRange, DocumentProperties, FreezePanes, Workbook, MAX_COLS,
    MAX_ROWS,
};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path).map_err(XlsxError::read)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from a reader
    ///
    /// Any malformed part, dangling style reference or unknown cell value
    /// type fails the whole read; no partial workbook is returned.
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        decode(Self::read_document(reader)?)
    }

    /// Read the persisted representation without building a workbook
    pub fn read_document<R: Read + Seek>(reader: R) -> XlsxResult<PersistedWorkbook> {
        let mut archive = ZipArchive::new(reader).map_err(XlsxError::read)?;

        let workbook_xml = require_part(&mut archive, WORKBOOK_PART)?;
        let (sheet_entries, active_sheet) = read_workbook_xml(&workbook_xml)?;
        let rels_xml = require_part(&mut archive, WORKBOOK_RELS_PART)?;
        let rels = read_relationships(&rels_xml, WORKBOOK_RELS_PART)?;

        let mut styles_path = "xl/styles.xml".to_string();
        let mut strings_path = "xl/sharedStrings.xml".to_string();
        let mut sheet_paths = HashMap::new();
        for rel in rels {
            let target = resolve_target("xl", &rel.target);
            match rel.kind.rsplit('/').next() {
                Some("worksheet") => {
                    sheet_paths.insert(rel.id, target);
                }
                Some("styles") => styles_path = target,
                Some("sharedStrings") => strings_path = target,
                _ => log::warn!("skipping relationship {} ({})", rel.id, rel.kind),
            }
        }

        let styles = match read_part(&mut archive, &styles_path)? {
            Some(bytes) => read_styles_xml(&bytes[..], &styles_path)?,
            None => StyleLists::default(),
        };
        let shared_strings = match read_part(&mut archive, &strings_path)? {
            Some(bytes) => read_shared_strings_xml(&bytes[..], &strings_path)?,
            None => Vec::new(),
        };
        let properties = match read_part(&mut archive, CORE_PROPERTIES_PART)? {
            Some(bytes) => read_core_properties(&bytes)?,
            None => DocumentProperties::default(),
        };

        let mut sheets = Vec::with_capacity(sheet_entries.len());
        for entry in sheet_entries {
            let path = sheet_paths.get(&entry.rel_id).ok_or_else(|| {
                XlsxError::Parse(format!(
                    "sheet '{}' refers to unknown relationship {}",
                    entry.name, entry.rel_id
                ))
            })?;
            let bytes = require_part(&mut archive, path)?;
            let mut sheet = read_worksheet_xml(&bytes, path, &entry.name)?;
            sheet.visible = entry.visible;
            log::debug!(
                "read sheet '{}': {} rows, {} column ranges",
                sheet.name,
                sheet.rows.len(),
                sheet.columns.len()
            );
            sheets.push(sheet);
        }

        Ok(PersistedWorkbook {
            properties,
            sheets,
            active_sheet,
            styles,
            shared_strings,
        })
    }
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> XlsxResult<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(XlsxError::read(e)),
    };
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes).map_err(XlsxError::read)?;
    log::debug!("read {} ({} bytes)", name, bytes.len());
    Ok(Some(bytes))
}

fn require_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> XlsxResult<Vec<u8>> {
    read_part(archive, name)?.ok_or_else(|| XlsxError::MissingPart(name.to_string()))
}

/// Relationship targets are relative to the source part's folder unless
/// they start with `/`
fn resolve_target(base: &str, target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}/{}", base, target),
    }
}

struct SheetEntry {
    name: String,
    rel_id: String,
    visible: bool,
}

/// Sheet entries in display order plus the active tab
fn read_workbook_xml(bytes: &[u8]) -> XlsxResult<(Vec<SheetEntry>, usize)> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    let mut active_sheet = 0;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sheet" => {
                    let mut name = None;
                    let mut rel_id = None;
                    let mut visible = true;
                    for a in e.attributes().flatten() {
                        let value = a.unescape_value().ok().map(|v| v.into_owned());
                        match a.key.local_name().as_ref() {
                            b"name" => name = value,
                            b"id" => rel_id = value,
                            b"state" => visible = value.as_deref() == Some("visible"),
                            _ => {}
                        }
                    }
                    match (name, rel_id) {
                        (Some(name), Some(rel_id)) => sheets.push(SheetEntry {
                            name,
                            rel_id,
                            visible,
                        }),
                        _ => {
                            return Err(XlsxError::Parse(
                                "sheet entry without name or relationship id".into(),
                            ))
                        }
                    }
                }
                b"workbookView" => {
                    active_sheet = attr_parse(&e, b"activeTab").unwrap_or(0);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(WORKBOOK_PART)(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, active_sheet))
}

struct Relationship {
    id: String,
    kind: String,
    target: String,
}

fn read_relationships(bytes: &[u8], part: &str) -> XlsxResult<Vec<Relationship>> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(kind), Some(target)) =
                    (attr(&e, b"Id"), attr(&e, b"Type"), attr(&e, b"Target"))
                {
                    rels.push(Relationship { id, kind, target });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(part)(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

fn read_core_properties(bytes: &[u8]) -> XlsxResult<DocumentProperties> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut properties = DocumentProperties::default();
    let mut current: Option<Vec<u8>> = None;
    let mut text = String::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = Some(e.local_name().as_ref().to_vec());
                text.clear();
            }
            Ok(Event::Text(e)) if current.is_some() => {
                text.push_str(&e.unescape().map_err(XlsxError::xml(CORE_PROPERTIES_PART))?);
            }
            Ok(Event::End(_)) => {
                if let Some(name) = current.take() {
                    let value = std::mem::take(&mut text);
                    match name.as_slice() {
                        b"title" => properties.title = Some(value),
                        b"subject" => properties.subject = Some(value),
                        b"creator" => properties.creator = Some(value),
                        b"lastModifiedBy" => properties.last_modified_by = Some(value),
                        b"created" => properties.created = parse_timestamp(&value),
                        b"modified" => properties.modified = parse_timestamp(&value),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(CORE_PROPERTIES_PART)(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(properties)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("ignoring document timestamp '{}': {}", value, e);
            None
        }
    }
}

/// Where text events inside a cell go
#[derive(Clone, Copy, PartialEq)]
enum CellText {
    None,
    Value,
    Formula,
    Inline,
}

#[derive(Default)]
struct PendingCell {
    reference: String,
    column: u16,
    kind: Option<String>,
    style_id: Option<u32>,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
}

impl PendingCell {
    fn finish(self) -> XlsxResult<CellRecord> {
        let value = match self.formula.filter(|f| !f.is_empty()) {
            Some(text) => {
                let cached = parse_value(
                    &self.reference,
                    self.kind.as_deref(),
                    self.value.as_deref(),
                    self.inline,
                )?;
                ValueDescriptor::Formula {
                    text: text.strip_prefix('=').unwrap_or(&text).to_string(),
                    cached: (!cached.is_blank()).then(|| Box::new(cached)),
                }
            }
            None => parse_value(
                &self.reference,
                self.kind.as_deref(),
                self.value.as_deref(),
                self.inline,
            )?,
        };
        Ok(CellRecord {
            column: self.column,
            value,
            style_id: self.style_id,
        })
    }
}

/// Decode a cell's `t` attribute and `<v>` text
fn parse_value(
    cell: &str,
    kind: Option<&str>,
    value: Option<&str>,
    inline: Option<String>,
) -> XlsxResult<ValueDescriptor> {
    let kind = kind.unwrap_or("n");
    if kind == "inlineStr" {
        return Ok(match inline.or_else(|| value.map(str::to_string)) {
            Some(text) => ValueDescriptor::InlineString(decode_excel_escapes(&text)),
            None => ValueDescriptor::Blank,
        });
    }

    let Some(v) = value else {
        return match kind {
            "n" | "s" | "str" | "b" | "e" | "d" => Ok(ValueDescriptor::Blank),
            other => Err(unsupported(cell, other)),
        };
    };

    Ok(match kind {
        "n" => ValueDescriptor::Number(v.trim().parse().map_err(|_| {
            XlsxError::Parse(format!("invalid number '{}' in cell {}", v, cell))
        })?),
        "s" => ValueDescriptor::SharedString(v.trim().parse().map_err(|_| {
            XlsxError::Parse(format!("invalid shared string index '{}' in cell {}", v, cell))
        })?),
        "str" => ValueDescriptor::InlineString(decode_excel_escapes(v)),
        "b" => ValueDescriptor::Boolean(parse_bool(v.trim())),
        "e" => match CellError::parse(v.trim()) {
            Some(e) => ValueDescriptor::Error(e),
            None => {
                log::warn!("cell {}: unknown error value '{}' read as text", cell, v);
                ValueDescriptor::InlineString(v.to_string())
            }
        },
        "d" => ValueDescriptor::Date(parse_date(v.trim()).ok_or_else(|| {
            XlsxError::Parse(format!("invalid date '{}' in cell {}", v, cell))
        })?),
        other => return Err(unsupported(cell, other)),
    })
}

fn unsupported(cell: &str, kind: &str) -> XlsxError {
    XlsxError::UnsupportedValueType {
        cell: cell.to_string(),
        kind: kind.to_string(),
    }
}

fn parse_date(v: &str) -> Option<NaiveDateTime> {
    let v = v.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(v, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_row(e: &BytesStart<'_>, previous: Option<u32>) -> XlsxResult<RowRecord> {
    let number = match attr(e, b"r") {
        Some(r) => r
            .trim()
            .parse::<u32>()
            .map_err(|_| XlsxError::Parse(format!("invalid row number '{}'", r)))?,
        None => previous
            .map_or(Some(1), |r| r.checked_add(1))
            .ok_or_else(|| XlsxError::Parse("row number overflows".into()))?,
    };
    if number == 0 || number > MAX_ROWS {
        return Err(XlsxError::Parse(format!(
            "row {} out of bounds (max: {})",
            number, MAX_ROWS
        )));
    }
    let custom_height = attr_bool(e, b"customHeight").unwrap_or(false);
    let custom_format = attr_bool(e, b"customFormat").unwrap_or(false);
    Ok(RowRecord {
        number,
        height: if custom_height {
            attr_parse(e, b"ht")
        } else {
            None
        },
        hidden: attr_bool(e, b"hidden").unwrap_or(false),
        outline_level: attr_parse(e, b"outlineLevel").unwrap_or(0),
        style_id: if custom_format {
            attr_parse(e, b"s")
        } else {
            None
        },
        cells: Vec::new(),
    })
}

fn parse_column(e: &BytesStart<'_>) -> Option<ColumnRecord> {
    let min: u16 = attr_parse(e, b"min")?;
    let max: u16 = attr_parse(e, b"max").unwrap_or(min);
    let custom_width = attr_bool(e, b"customWidth").unwrap_or(false);
    Some(ColumnRecord {
        min,
        max: max.max(min),
        width: if custom_width {
            attr_parse(e, b"width")
        } else {
            None
        },
        hidden: attr_bool(e, b"hidden").unwrap_or(false),
        outline_level: attr_parse(e, b"outlineLevel").unwrap_or(0),
        style_id: attr_parse(e, b"style"),
    })
}

fn parse_cell(e: &BytesStart<'_>, row: &RowRecord) -> XlsxResult<PendingCell> {
    let (reference, column) = match attr(e, b"r") {
        Some(r) => {
            let addr = CellAddress::parse(&r)
                .map_err(|err| XlsxError::Parse(format!("invalid cell reference '{}': {}", r, err)))?;
            (r, addr.col)
        }
        None => {
            let next = row.cells.last().map_or(1, |c| u32::from(c.column) + 1);
            let addr = CellAddress::checked(row.number, next).map_err(|err| {
                XlsxError::Parse(format!("cell without reference in row {}: {}", row.number, err))
            })?;
            (addr.to_a1_string(), addr.col)
        }
    };
    Ok(PendingCell {
        reference,
        column,
        kind: attr(e, b"t"),
        style_id: attr_parse(e, b"s"),
        ..PendingCell::default()
    })
}

fn parse_pane(e: &BytesStart<'_>) -> XlsxResult<Option<FreezePanes>> {
    if attr(e, b"state").as_deref() != Some("frozen") {
        return Ok(None);
    }
    let cols = pane_split(e, b"xSplit", u32::from(MAX_COLS))? as u16;
    let rows = pane_split(e, b"ySplit", MAX_ROWS)?;
    Ok((rows > 0 || cols > 0).then_some(FreezePanes { rows, cols }))
}

/// A frozen split is a whole count of rows or columns below `limit`
fn pane_split(e: &BytesStart<'_>, key: &[u8], limit: u32) -> XlsxResult<u32> {
    let Some(raw) = attr(e, key) else {
        return Ok(0);
    };
    let invalid = || {
        XlsxError::Parse(format!(
            "invalid pane split {}=\"{}\"",
            String::from_utf8_lossy(key),
            raw
        ))
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= f64::from(limit) {
        return Err(invalid());
    }
    Ok(value as u32)
}

/// Read one worksheet part
pub(crate) fn read_worksheet_xml(bytes: &[u8], part: &str, name: &str) -> XlsxResult<PersistedSheet> {
    let mut xml_reader = Reader::from_reader(bytes);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut sheet = PersistedSheet::new(name);
    let mut row: Option<RowRecord> = None;
    let mut cell: Option<PendingCell> = None;
    let mut target = CellText::None;
    let mut last_row: Option<u32> = None;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => row = Some(parse_row(&e, last_row)?),
                b"c" => {
                    if let Some(r) = row.as_ref() {
                        cell = Some(parse_cell(&e, r)?);
                    }
                }
                b"v" if cell.is_some() => target = CellText::Value,
                b"f" => {
                    if let Some(c) = cell.as_mut() {
                        c.formula.get_or_insert_with(String::new);
                        target = CellText::Formula;
                    }
                }
                b"is" => {
                    if let Some(c) = cell.as_mut() {
                        c.inline.get_or_insert_with(String::new);
                    }
                }
                b"t" if cell.as_ref().is_some_and(|c| c.inline.is_some()) => {
                    target = CellText::Inline
                }
                b"col" => sheet.columns.extend(parse_column(&e)),
                b"mergeCell" => read_merge(&e, &mut sheet)?,
                b"pane" => sheet.freeze_panes = parse_pane(&e)?.or(sheet.freeze_panes),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    let record = parse_row(&e, last_row)?;
                    last_row = Some(record.number);
                    sheet.rows.push(record);
                }
                b"c" => {
                    if let Some(r) = row.as_mut() {
                        let record = parse_cell(&e, r)?.finish()?;
                        r.cells.push(record);
                    }
                }
                b"f" => {
                    if attr(&e, b"t").as_deref() == Some("shared") {
                        log::warn!("{}: shared formula reference read as its cached value", part);
                    }
                }
                b"col" => sheet.columns.extend(parse_column(&e)),
                b"mergeCell" => read_merge(&e, &mut sheet)?,
                b"pane" => sheet.freeze_panes = parse_pane(&e)?.or(sheet.freeze_panes),
                _ => {}
            },
            Ok(Event::Text(e)) if target != CellText::None => {
                let text = e.unescape().map_err(XlsxError::xml(part))?;
                if let Some(c) = cell.as_mut() {
                    let slot = match target {
                        CellText::Value => c.value.get_or_insert_with(String::new),
                        CellText::Formula => c.formula.get_or_insert_with(String::new),
                        _ => c.inline.get_or_insert_with(String::new),
                    };
                    slot.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"f" | b"t" => target = CellText::None,
                b"c" => {
                    if let (Some(pending), Some(r)) = (cell.take(), row.as_mut()) {
                        r.cells.push(pending.finish()?);
                    }
                }
                b"row" => {
                    if let Some(record) = row.take() {
                        last_row = Some(record.number);
                        sheet.rows.push(record);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(part)(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

fn read_merge(e: &BytesStart<'_>, sheet: &mut PersistedSheet) -> XlsxResult<()> {
    if let Some(reference) = attr(e, b"ref") {
        sheet.merges.push(CellRange::parse(&reference)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn sheet(body: &str) -> XlsxResult<PersistedSheet> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{}</worksheet>"#,
            body
        );
        read_worksheet_xml(xml.as_bytes(), "xl/worksheets/sheet1.xml", "Sheet1")
    }

    #[test]
    fn test_value_types() {
        let parsed = sheet(
            r#"<sheetData><row r="1">
                <c r="A1"><v>42.5</v></c>
                <c r="B1" t="s"><v>3</v></c>
                <c r="C1" t="b"><v>1</v></c>
                <c r="D1" t="e"><v>#N/A</v></c>
                <c r="E1" t="inlineStr"><is><t xml:space="preserve"> hi </t></is></c>
                <c r="F1" t="d"><v>2023-07-04T12:00:00</v></c>
                <c r="G1" s="2"/>
                <c r="H1" t="str"><f>UPPER("a")</f><v>A</v></c>
            </row></sheetData>"#,
        )
        .unwrap();

        let values: Vec<_> = parsed.rows[0].cells.iter().map(|c| c.value.clone()).collect();
        let date = NaiveDate::from_ymd_opt(2023, 7, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            values,
            vec![
                ValueDescriptor::Number(42.5),
                ValueDescriptor::SharedString(3),
                ValueDescriptor::Boolean(true),
                ValueDescriptor::Error(CellError::Na),
                ValueDescriptor::InlineString(" hi ".into()),
                ValueDescriptor::Date(date),
                ValueDescriptor::Blank,
                ValueDescriptor::Formula {
                    text: "UPPER(\"a\")".into(),
                    cached: Some(Box::new(ValueDescriptor::InlineString("A".into()))),
                },
            ]
        );
        assert_eq!(parsed.rows[0].cells[6].style_id, Some(2));
        assert_eq!(parsed.rows[0].cells[0].style_id, None);
    }

    #[test]
    fn test_unknown_value_type() {
        let err = sheet(r#"<sheetData><row r="1"><c r="B1" t="x"><v>1</v></c></row></sheetData>"#)
            .unwrap_err();
        match err {
            XlsxError::UnsupportedValueType { cell, kind } => {
                assert_eq!(cell, "B1");
                assert_eq!(kind, "x");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_bad_number() {
        let err = sheet(r#"<sheetData><row r="1"><c r="A1"><v>abc</v></c></row></sheetData>"#)
            .unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));
    }

    #[test]
    fn test_missing_references_are_inferred() {
        let parsed = sheet(
            r#"<sheetData>
                <row r="3"><c r="B3"><v>1</v></c><c><v>2</v></c></row>
                <row><c><v>3</v></c></row>
            </sheetData>"#,
        )
        .unwrap();
        assert_eq!(parsed.rows[0].cells[1].column, 3);
        assert_eq!(parsed.rows[1].number, 4);
        assert_eq!(parsed.rows[1].cells[0].column, 1);
    }

    #[test]
    fn test_inferred_row_past_last_row() {
        let err = sheet(r#"<sheetData><row r="4294967295"/><row/></sheetData>"#).unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));

        let err = sheet(r#"<sheetData><row r="1048576"/><row/></sheetData>"#).unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));

        let parsed = sheet(r#"<sheetData><row r="1048575"/><row/></sheetData>"#).unwrap();
        assert_eq!(parsed.rows[1].number, 1_048_576);
    }

    #[test]
    fn test_bad_row_numbers() {
        for r in ["0", "1048577", "-1", "abc", "99999999999"] {
            let body = format!(r#"<sheetData><row r="{}"><c><v>1</v></c></row></sheetData>"#, r);
            let err = sheet(&body).unwrap_err();
            assert!(matches!(err, XlsxError::Parse(_)), "row r={}", r);
        }
    }

    #[test]
    fn test_inferred_cell_past_last_column() {
        let err = sheet(r#"<sheetData><row r="1"><c r="XFD1"><v>1</v></c><c><v>2</v></c></row></sheetData>"#)
            .unwrap_err();
        assert!(matches!(err, XlsxError::Parse(_)));
    }

    #[test]
    fn test_bad_pane_splits() {
        for (x, y) in [("-1", "0"), ("NaN", "1"), ("1.5", "0"), ("0", "1e12"), ("16384", "0")] {
            let body = format!(
                r#"<sheetViews><sheetView><pane xSplit="{}" ySplit="{}" state="frozen"/></sheetView></sheetViews>"#,
                x, y
            );
            let err = sheet(&body).unwrap_err();
            assert!(matches!(err, XlsxError::Parse(_)), "xSplit={} ySplit={}", x, y);
        }

        let parsed = sheet(
            r#"<sheetViews><sheetView><pane ySplit="3.0" state="frozen"/></sheetView></sheetViews>"#,
        )
        .unwrap();
        assert_eq!(parsed.freeze_panes, Some(FreezePanes { rows: 3, cols: 0 }));
    }

    #[test]
    fn test_row_column_and_view_settings() {
        let parsed = sheet(
            r#"<sheetViews><sheetView workbookViewId="0">
                <pane xSplit="2" ySplit="1" topLeftCell="C2" activePane="bottomRight" state="frozen"/>
               </sheetView></sheetViews>
               <cols>
                 <col min="1" max="3" width="20" customWidth="1" style="1"/>
                 <col min="5" max="5" width="9.140625" hidden="1"/>
               </cols>
               <sheetData>
                 <row r="2" ht="30" customHeight="1" s="1" customFormat="1"/>
                 <row r="4" ht="15" s="1"><c r="A4"><v>1</v></c></row>
               </sheetData>
               <mergeCells count="1"><mergeCell ref="A1:B2"/></mergeCells>"#,
        )
        .unwrap();

        assert_eq!(parsed.freeze_panes, Some(FreezePanes { rows: 1, cols: 2 }));
        assert_eq!(
            parsed.columns,
            vec![
                ColumnRecord {
                    min: 1,
                    max: 3,
                    width: Some(20.0),
                    hidden: false,
                    outline_level: 0,
                    style_id: Some(1),
                },
                ColumnRecord {
                    min: 5,
                    max: 5,
                    width: None,
                    hidden: true,
                    outline_level: 0,
                    style_id: None,
                },
            ]
        );
        assert_eq!(parsed.rows[0].height, Some(30.0));
        assert_eq!(parsed.rows[0].style_id, Some(1));
        // no customHeight / customFormat
        assert_eq!(parsed.rows[1].height, None);
        assert_eq!(parsed.rows[1].style_id, None);
        assert_eq!(parsed.merges, vec![CellRange::parse("A1:B2").unwrap()]);
    }

    #[test]
    fn test_workbook_entries() {
        let xml = br#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
            <bookViews><workbookView activeTab="1"/></bookViews>
            <sheets>
              <sheet name="One &amp; Two" sheetId="1" r:id="rId1"/>
              <sheet name="Secret" sheetId="2" state="hidden" r:id="rId2"/>
            </sheets></workbook>"#;
        let (entries, active) = read_workbook_xml(xml).unwrap();
        assert_eq!(active, 1);
        assert_eq!(entries[0].name, "One & Two");
        assert!(entries[0].visible);
        assert_eq!(entries[1].rel_id, "rId2");
        assert!(!entries[1].visible);
    }

    #[test]
    fn test_core_properties() {
        let xml = br#"<cp:coreProperties xmlns:cp="x" xmlns:dc="y" xmlns:dcterms="z">
            <dc:creator>Finance Team</dc:creator>
            <dcterms:modified>2024-05-06T07:08:09.5Z</dcterms:modified>
        </cp:coreProperties>"#;
        let props = read_core_properties(xml).unwrap();
        assert_eq!(props.creator.as_deref(), Some("Finance Team"));
        let modified = props.modified.unwrap();
        assert_eq!(modified.timestamp_subsec_millis(), 500);
        assert!(props.created.is_none());
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("xl", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("xl", "/xl/styles.xml"), "xl/styles.xml");
    }

    #[test]
    fn test_missing_workbook_part() {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.finish().unwrap();
        }
        buffer.set_position(0);
        match XlsxReader::read(buffer) {
            Err(XlsxError::MissingPart(part)) => assert_eq!(part, "xl/workbook.xml"),
            other => panic!("expected missing part, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let result = XlsxReader::read(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(XlsxError::ContainerRead(_))));
    }
}
