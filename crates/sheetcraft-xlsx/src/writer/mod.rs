//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::document::{
    CellRecord, ColumnRecord, PersistedSheet, PersistedWorkbook, RowRecord, ValueDescriptor,
};
use crate::encode::encode;
use crate::error::{XlsxError, XlsxResult};
use crate::shared_strings::write_shared_strings_xml;
use crate::styles::write_styles_xml;
use crate::xml::{bool_attr, encode_excel_escapes, escape_xml, NS_MAIN, NS_PKG_REL, NS_REL, XML_HEADER};
use sheetcraft_core::{CellAddress, CellError, CellRange, DocumentProperties, FreezePanes, Workbook};

/// Column width written when a column has settings but no custom width
const DEFAULT_COLUMN_WIDTH: f64 = 9.140625;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    ///
    /// The package is built in a temporary file next to `path` and renamed
    /// over it once complete; on failure an existing file at `path` is left
    /// as it was.
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        write_atomically(path.as_ref(), |file| Self::write(workbook, file))
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        Self::write_document(&encode(workbook), writer)
    }

    /// Write an already encoded workbook
    pub fn write_document<W: Write + Seek>(
        document: &PersistedWorkbook,
        writer: W,
    ) -> XlsxResult<()> {
        let mut zip = ZipWriter::new(writer);
        let has_strings = !document.shared_strings.is_empty();

        add_part(
            &mut zip,
            "[Content_Types].xml",
            &content_types_xml(document.sheets.len(), has_strings),
        )?;
        add_part(&mut zip, "_rels/.rels", &root_rels_xml())?;
        add_part(
            &mut zip,
            "docProps/core.xml",
            &core_properties_xml(&document.properties),
        )?;
        add_part(&mut zip, "xl/workbook.xml", &workbook_xml(document))?;
        add_part(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            &workbook_rels_xml(document.sheets.len(), has_strings),
        )?;
        add_part(&mut zip, "xl/styles.xml", &write_styles_xml(&document.styles))?;
        if has_strings {
            add_part(
                &mut zip,
                "xl/sharedStrings.xml",
                &write_shared_strings_xml(&document.shared_strings, document.string_references()),
            )?;
        }

        for (i, sheet) in document.sheets.iter().enumerate() {
            let selected = i == document.active_sheet;
            add_part(
                &mut zip,
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                &worksheet_xml(sheet, selected),
            )?;
        }

        zip.finish().map_err(XlsxError::write)?;
        Ok(())
    }
}

fn add_part<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str, content: &str) -> XlsxResult<()> {
    zip.start_file(name, SimpleFileOptions::default())
        .map_err(XlsxError::write)?;
    zip.write_all(content.as_bytes()).map_err(XlsxError::write)?;
    log::debug!("wrote {} ({} bytes)", name, content.len());
    Ok(())
}

/// Run `write` against a temporary file beside `path`, then rename it over
/// `path`. The temporary file is removed if anything fails.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> XlsxResult<()>
where
    F: FnOnce(&mut File) -> XlsxResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(XlsxError::write)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all().map_err(XlsxError::write)?;
    temp.persist(path).map_err(|e| XlsxError::write(e.error))?;
    Ok(())
}

fn content_types_xml(sheet_count: usize, has_strings: bool) -> String {
    let mut content = format!(
        r#"{}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        XML_HEADER
    );

    if has_strings {
        content.push_str(
            r#"
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
    }

    for i in 0..sheet_count {
        content.push_str(&format!(
            r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }

    content.push_str("\n</Types>");
    content
}

fn root_rels_xml() -> String {
    format!(
        r#"{}
<Relationships xmlns="{}">
    <Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#,
        XML_HEADER, NS_PKG_REL, NS_REL
    )
}

fn core_properties_xml(properties: &DocumentProperties) -> String {
    let mut content = format!(
        r#"{}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        XML_HEADER
    );

    let text_elements = [
        ("dc:title", &properties.title),
        ("dc:subject", &properties.subject),
        ("dc:creator", &properties.creator),
        ("cp:lastModifiedBy", &properties.last_modified_by),
    ];
    for (tag, value) in text_elements {
        if let Some(value) = value {
            content.push_str(&format!("\n    <{0}>{1}</{0}>", tag, escape_xml(value)));
        }
    }

    for (tag, value) in [
        ("dcterms:created", &properties.created),
        ("dcterms:modified", &properties.modified),
    ] {
        if let Some(value) = value {
            content.push_str(&format!(
                "\n    <{0} xsi:type=\"dcterms:W3CDTF\">{1}</{0}>",
                tag,
                w3c_timestamp(value)
            ));
        }
    }

    content.push_str("\n</cp:coreProperties>");
    content
}

fn w3c_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn workbook_xml(document: &PersistedWorkbook) -> String {
    let mut content = format!(
        r#"{}
<workbook xmlns="{}" xmlns:r="{}">
    <bookViews>
        <workbookView activeTab="{}"/>
    </bookViews>
    <sheets>"#,
        XML_HEADER, NS_MAIN, NS_REL, document.active_sheet
    );

    for (i, sheet) in document.sheets.iter().enumerate() {
        let state = if sheet.visible { "" } else { " state=\"hidden\"" };
        content.push_str(&format!(
            r#"
        <sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            state,
            i + 1
        ));
    }

    content.push_str(
        r#"
    </sheets>
</workbook>"#,
    );
    content
}

fn workbook_rels_xml(sheet_count: usize, has_strings: bool) -> String {
    let mut content = format!(
        r#"{}
<Relationships xmlns="{}">"#,
        XML_HEADER, NS_PKG_REL
    );

    for i in 0..sheet_count {
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            NS_REL,
            i + 1
        ));
    }

    content.push_str(&format!(
        r#"
    <Relationship Id="rId{}" Type="{}/styles" Target="styles.xml"/>"#,
        sheet_count + 1,
        NS_REL
    ));
    if has_strings {
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="{}/sharedStrings" Target="sharedStrings.xml"/>"#,
            sheet_count + 2,
            NS_REL
        ));
    }

    content.push_str("\n</Relationships>");
    content
}

fn worksheet_xml(sheet: &PersistedSheet, selected: bool) -> String {
    let mut content = format!(
        r#"{}
<worksheet xmlns="{}" xmlns:r="{}">
    <dimension ref="{}"/>"#,
        XML_HEADER,
        NS_MAIN,
        NS_REL,
        dimension(sheet)
    );

    content.push_str(&format!(
        "\n    <sheetViews>\n        <sheetView{} workbookViewId=\"0\">",
        if selected { " tabSelected=\"1\"" } else { "" }
    ));
    if let Some(panes) = &sheet.freeze_panes {
        content.push_str(&pane_xml(panes));
    }
    content.push_str("\n        </sheetView>\n    </sheetViews>");
    content.push_str("\n    <sheetFormatPr defaultRowHeight=\"15\"/>");

    if !sheet.columns.is_empty() {
        content.push_str("\n    <cols>");
        for column in &sheet.columns {
            content.push_str(&column_xml(column));
        }
        content.push_str("\n    </cols>");
    }

    content.push_str("\n    <sheetData>");
    for row in &sheet.rows {
        write_row(&mut content, row);
    }
    content.push_str("\n    </sheetData>");

    if !sheet.merges.is_empty() {
        content.push_str(&format!("\n    <mergeCells count=\"{}\">", sheet.merges.len()));
        for range in &sheet.merges {
            content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
        }
        content.push_str("\n    </mergeCells>");
    }

    content.push_str("\n</worksheet>");
    content
}

/// Bounding range of the stored cells; `A1` for a sheet without any
fn dimension(sheet: &PersistedSheet) -> String {
    let mut bounds: Option<(CellAddress, CellAddress)> = None;
    for row in &sheet.rows {
        for cell in &row.cells {
            let addr = CellAddress::new(row.number, cell.column);
            bounds = Some(match bounds {
                None => (addr, addr),
                Some((lo, hi)) => (
                    CellAddress::new(lo.row.min(addr.row), lo.col.min(addr.col)),
                    CellAddress::new(hi.row.max(addr.row), hi.col.max(addr.col)),
                ),
            });
        }
    }
    match bounds {
        Some((lo, hi)) => CellRange::new(lo, hi).to_a1_string(),
        None => "A1".to_string(),
    }
}

fn pane_xml(panes: &FreezePanes) -> String {
    let active = match (panes.rows > 0, panes.cols > 0) {
        (true, true) => "bottomRight",
        (true, false) => "bottomLeft",
        _ => "topRight",
    };
    let mut pane = String::from("\n            <pane");
    if panes.cols > 0 {
        pane.push_str(&format!(" xSplit=\"{}\"", panes.cols));
    }
    if panes.rows > 0 {
        pane.push_str(&format!(" ySplit=\"{}\"", panes.rows));
    }
    pane.push_str(&format!(
        " topLeftCell=\"{}\" activePane=\"{}\" state=\"frozen\"/>",
        panes.top_left_cell(),
        active
    ));
    pane
}

fn column_xml(column: &ColumnRecord) -> String {
    let mut xml = format!("\n        <col min=\"{}\" max=\"{}\"", column.min, column.max);
    match column.width {
        Some(width) => xml.push_str(&format!(" width=\"{}\" customWidth=\"1\"", width)),
        None => xml.push_str(&format!(" width=\"{}\"", DEFAULT_COLUMN_WIDTH)),
    }
    if let Some(id) = column.style_id {
        xml.push_str(&format!(" style=\"{}\"", id));
    }
    if column.hidden {
        xml.push_str(" hidden=\"1\"");
    }
    if column.outline_level > 0 {
        xml.push_str(&format!(" outlineLevel=\"{}\"", column.outline_level));
    }
    xml.push_str("/>");
    xml
}

fn write_row(content: &mut String, row: &RowRecord) {
    content.push_str(&format!("\n        <row r=\"{}\"", row.number));
    if let Some(id) = row.style_id {
        content.push_str(&format!(" s=\"{}\" customFormat=\"1\"", id));
    }
    if let Some(height) = row.height {
        content.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
    }
    if row.hidden {
        content.push_str(" hidden=\"1\"");
    }
    if row.outline_level > 0 {
        content.push_str(&format!(" outlineLevel=\"{}\"", row.outline_level));
    }

    if row.cells.is_empty() {
        content.push_str("/>");
        return;
    }
    content.push('>');
    for cell in &row.cells {
        write_cell(content, row.number, cell);
    }
    content.push_str("\n        </row>");
}

fn write_cell(content: &mut String, row: u32, cell: &CellRecord) {
    let cell_ref = CellAddress::new(row, cell.column).to_a1_string();
    content.push_str(&format!("\n            <c r=\"{}\"", cell_ref));
    if let Some(id) = cell.style_id.filter(|&id| id != 0) {
        content.push_str(&format!(" s=\"{}\"", id));
    }

    let (kind, body) = match &cell.value {
        ValueDescriptor::Formula { text, cached } => {
            let (kind, value) = cached
                .as_deref()
                .and_then(|result| scalar(result, &cell_ref))
                .map_or((None, None), |(kind, value)| (kind, Some(value)));
            let mut body = format!("<f>{}</f>", escape_xml(text));
            if let Some(value) = value {
                body.push_str(&format!("<v>{}</v>", value));
            }
            // a cached text result is `str`, not a shared-string index
            let kind = kind.map(|k| if k == "inlineStr" { "str" } else { k });
            (kind, Some(body))
        }
        ValueDescriptor::InlineString(text) => (
            Some("inlineStr"),
            Some(format!(
                "<is><t xml:space=\"preserve\">{}</t></is>",
                encode_excel_escapes(text)
            )),
        ),
        other => match scalar(other, &cell_ref) {
            Some((kind, value)) => (kind, Some(format!("<v>{}</v>", value))),
            None => (None, None),
        },
    };

    if let Some(kind) = kind {
        content.push_str(&format!(" t=\"{}\"", kind));
    }
    match body {
        Some(body) => content.push_str(&format!(">{}</c>", body)),
        None => content.push_str("/>"),
    }
}

/// `t` attribute and `<v>` text for a non-formula value; `None` for blanks
fn scalar(value: &ValueDescriptor, cell_ref: &str) -> Option<(Option<&'static str>, String)> {
    Some(match value {
        ValueDescriptor::Blank | ValueDescriptor::Formula { .. } => return None,
        ValueDescriptor::Number(n) if n.is_finite() => (None, n.to_string()),
        ValueDescriptor::Number(n) => {
            log::warn!("{}: non-finite number {} written as {}", cell_ref, n, CellError::Num);
            (Some("e"), CellError::Num.as_str().to_string())
        }
        ValueDescriptor::Boolean(b) => (Some("b"), bool_attr(*b).to_string()),
        ValueDescriptor::Error(e) => (Some("e"), escape_xml(e.as_str())),
        ValueDescriptor::Date(d) => (Some("d"), d.format(DATE_FORMAT).to_string()),
        ValueDescriptor::SharedString(index) => (Some("s"), index.to_string()),
        ValueDescriptor::InlineString(text) => (Some("inlineStr"), encode_excel_escapes(text)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use std::io::Cursor;

    fn sheet_with(cells: Vec<CellRecord>) -> PersistedSheet {
        let mut sheet = PersistedSheet::new("Sheet1");
        sheet.rows.push(RowRecord {
            number: 2,
            cells,
            ..RowRecord::default()
        });
        sheet
    }

    #[test]
    fn test_cell_markup() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let sheet = sheet_with(vec![
            CellRecord {
                column: 1,
                value: ValueDescriptor::Number(1.5),
                style_id: Some(0),
            },
            CellRecord {
                column: 2,
                value: ValueDescriptor::Blank,
                style_id: Some(3),
            },
            CellRecord {
                column: 3,
                value: ValueDescriptor::Date(date),
                style_id: None,
            },
            CellRecord {
                column: 4,
                value: ValueDescriptor::Formula {
                    text: "A2&\"x\"".into(),
                    cached: Some(Box::new(ValueDescriptor::InlineString("1.5x".into()))),
                },
                style_id: None,
            },
            CellRecord {
                column: 5,
                value: ValueDescriptor::Error(CellError::Div0),
                style_id: None,
            },
        ]);

        let xml = worksheet_xml(&sheet, true);
        assert!(xml.contains(r#"<c r="A2"><v>1.5</v></c>"#));
        assert!(xml.contains(r#"<c r="B2" s="3"/>"#));
        assert!(xml.contains(r#"<c r="C2" t="d"><v>2024-03-01T08:30:00</v></c>"#));
        assert!(xml.contains(r#"<c r="D2" t="str"><f>A2&amp;&quot;x&quot;</f><v>1.5x</v></c>"#));
        assert!(xml.contains(r#"<c r="E2" t="e"><v>#DIV/0!</v></c>"#));
        assert!(xml.contains(r#"<dimension ref="A2:E2"/>"#));
        assert!(xml.contains("tabSelected=\"1\""));
    }

    #[test]
    fn test_row_and_column_settings() {
        let mut sheet = PersistedSheet::new("Sheet1");
        sheet.rows.push(RowRecord {
            number: 4,
            height: Some(30.0),
            hidden: true,
            style_id: Some(2),
            ..RowRecord::default()
        });
        sheet.columns.push(ColumnRecord {
            min: 2,
            max: 3,
            width: None,
            hidden: false,
            outline_level: 1,
            style_id: Some(1),
        });
        sheet.freeze_panes = Some(FreezePanes { rows: 1, cols: 0 });

        let xml = worksheet_xml(&sheet, false);
        assert!(xml.contains(
            r#"<row r="4" s="2" customFormat="1" ht="30" customHeight="1" hidden="1"/>"#
        ));
        assert!(xml.contains(
            r#"<col min="2" max="3" width="9.140625" style="1" outlineLevel="1"/>"#
        ));
        assert!(xml.contains(
            r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#
        ));
        assert!(!xml.contains("tabSelected"));
    }

    #[test]
    fn test_workbook_part_escapes_names() {
        let mut document = PersistedWorkbook::default();
        document.sheets.push(PersistedSheet::new("R&D"));
        let mut hidden = PersistedSheet::new("Hidden");
        hidden.visible = false;
        document.sheets.push(hidden);

        let xml = workbook_xml(&document);
        assert!(xml.contains(r#"name="R&amp;D""#));
        assert!(xml.contains(r#"sheetId="2" state="hidden" r:id="rId2""#));
    }

    #[test]
    fn test_core_properties() {
        let properties = DocumentProperties {
            creator: Some("Ops <team>".into()),
            created: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..DocumentProperties::default()
        };
        let xml = core_properties_xml(&properties);
        assert!(xml.contains("<dc:creator>Ops &lt;team&gt;</dc:creator>"));
        assert!(xml.contains(">2024-01-02T03:04:05Z</dcterms:created>"));
        assert!(!xml.contains("dc:title"));
    }

    #[test]
    fn test_write_produces_archive() {
        let mut wb = Workbook::new();
        wb.add_worksheet("Sheet1").unwrap().set_value("A1", "hi").unwrap();

        let mut buffer = Cursor::new(Vec::new());
        XlsxWriter::write(&wb, &mut buffer).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/sharedStrings.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
    }

    #[test]
    fn test_failed_write_keeps_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"previous contents").unwrap();

        let result = write_atomically(&path, |file| {
            file.write_all(b"partial").map_err(XlsxError::write)?;
            Err(XlsxError::Parse("interrupted".into()))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_file_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, b"old").unwrap();

        let mut wb = Workbook::new();
        wb.add_worksheet("Sheet1").unwrap();
        XlsxWriter::write_file(&wb, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
