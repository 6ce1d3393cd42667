//! Row and column defaults, broadcast and cell materialization

use pretty_assertions::assert_eq;
use sheetcraft::prelude::*;
use sheetcraft::{FacetValue, StyleTable};

fn font_x() -> FontStyle {
    FontStyle::new().with_name("Arial").with_size(10.0)
}

fn font_y() -> FontStyle {
    FontStyle::new()
        .with_name("Georgia")
        .with_size(14.0)
        .with_bold(true)
        .with_color(Color::BLUE)
}

fn alignment_p() -> Alignment {
    Alignment::new()
        .with_horizontal(HorizontalAlignment::Center)
        .with_vertical(VerticalAlignment::Top)
}

fn border_q() -> BorderStyle {
    BorderStyle::new().with_bottom(BorderLineStyle::Double, Color::BLACK)
}

fn fill_r() -> FillStyle {
    FillStyle::solid(Color::YELLOW)
}

/// The style every cell of a row or column shows after five facet writes
fn defaults_style() -> Style {
    Style::new()
        .number_format("0.00%")
        .with(font_y())
        .with(alignment_p())
        .with(border_q())
        .with(fill_r())
}

fn apply_to_row(sheet: &mut Worksheet, row: u32) {
    sheet.set_row_facet(row, NumberFormat::from_code("0.00%")).unwrap();
    sheet.set_row_facet(row, font_y()).unwrap();
    sheet.set_row_facet(row, alignment_p()).unwrap();
    sheet.set_row_facet(row, border_q()).unwrap();
    sheet.set_row_facet(row, fill_r()).unwrap();
}

fn apply_to_column(sheet: &mut Worksheet, col: u16) {
    sheet.set_column_facet(col, NumberFormat::from_code("0.00%")).unwrap();
    sheet.set_column_facet(col, font_y()).unwrap();
    sheet.set_column_facet(col, alignment_p()).unwrap();
    sheet.set_column_facet(col, border_q()).unwrap();
    sheet.set_column_facet(col, fill_r()).unwrap();
}

fn basket() -> Workbook {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("basket").unwrap();
    sheet.set_value("A1", 5).unwrap();
    sheet
        .set_style("A1", Style::new().number_format("#,##0").with(font_x()))
        .unwrap();
    sheet.set_value("C1", "Hello, World!").unwrap();
    sheet
        .set_style(
            "C1",
            Style::new()
                .with(Alignment::new().with_horizontal(HorizontalAlignment::Right))
                .with(BorderStyle::all(BorderLineStyle::Thin, Color::RED))
                .with(FillStyle::solid(Color::GREEN)),
        )
        .unwrap();
    wb
}

#[test]
fn test_row_defaults_reach_existing_and_future_cells() {
    let mut wb = basket();
    let sheet = wb.worksheet_mut(0).unwrap();
    apply_to_row(sheet, 1);

    assert_eq!(sheet.effective_style("A1").unwrap(), defaults_style());
    assert_eq!(sheet.effective_style("C1").unwrap(), defaults_style());
    assert_eq!(sheet.value("A1").unwrap(), CellValue::Number(5.0));
    assert_eq!(sheet.value("C1").unwrap().as_string(), Some("Hello, World!"));

    let b1 = sheet.cell("B1").unwrap();
    assert!(!b1.materialized);
    assert_eq!(b1.style, defaults_style());

    sheet.set_value("B1", "new").unwrap();
    let b1 = sheet.find_cell("B1").unwrap().unwrap();
    assert_eq!(b1.style(), Some(&defaults_style()));
}

#[test]
fn test_column_defaults_reach_existing_and_future_cells() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("basket").unwrap();
    sheet.set_value("A1", 5).unwrap();
    sheet
        .set_style("A1", Style::new().number_format("#,##0").with(font_x()))
        .unwrap();
    sheet.set_value("A3", "Hello, World!").unwrap();
    sheet
        .set_style("A3", Style::new().with(FillStyle::solid(Color::GREEN)))
        .unwrap();

    apply_to_column(sheet, 1);

    assert_eq!(sheet.effective_style("A1").unwrap(), defaults_style());
    assert_eq!(sheet.effective_style("A3").unwrap(), defaults_style());
    assert_eq!(sheet.effective_style("A2").unwrap(), defaults_style());
    assert!(sheet.find_cell("A2").unwrap().is_none());
    // Untouched columns keep nothing
    assert!(sheet.effective_style("B1").unwrap().is_empty());
}

#[test]
fn test_reads_never_create_cells() {
    let mut wb = basket();
    let sheet = wb.worksheet_mut(0).unwrap();
    apply_to_row(sheet, 1);
    let before = sheet.cell_count();

    for addr in ["B1", "D1", "A2", "Z100"] {
        sheet.cell(addr).unwrap();
        sheet.value(addr).unwrap();
        sheet.effective_style(addr).unwrap();
    }

    assert_eq!(sheet.cell_count(), before);
}

#[test]
fn test_precedence_is_per_facet() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_row_facet(2, alignment_p()).unwrap();
    sheet
        .set_column_facet(2, FontStyle::new().with_italic(true))
        .unwrap();

    let style = sheet.effective_style("B2").unwrap();
    assert_eq!(style.alignment, Some(alignment_p()));
    assert_eq!(style.font, Some(FontStyle::new().with_italic(true)));
}

#[test]
fn test_conflicting_facet_follows_policy() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_row_facet(4, FillStyle::solid(Color::RED)).unwrap();
    sheet.set_column_facet(4, FillStyle::solid(Color::BLUE)).unwrap();

    assert_eq!(
        sheet.effective_style("D4").unwrap().fill,
        Some(FillStyle::solid(Color::RED))
    );

    sheet.set_style_precedence(StylePrecedence::ColumnFirst);
    assert_eq!(
        sheet.effective_style("D4").unwrap().fill,
        Some(FillStyle::solid(Color::BLUE))
    );
}

#[test]
fn test_workbook_precedence_applies_to_new_sheets() {
    let mut wb = Workbook::new();
    wb.set_style_precedence(StylePrecedence::ColumnFirst);
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    assert_eq!(sheet.style_precedence(), StylePrecedence::ColumnFirst);
}

#[test]
fn test_new_cells_snapshot_defaults() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_row_facet(4, FillStyle::solid(Color::RED)).unwrap();
    sheet.set_column_facet(4, FillStyle::solid(Color::BLUE)).unwrap();

    sheet.set_value("D4", 1).unwrap();
    sheet.set_style_precedence(StylePrecedence::ColumnFirst);

    // D4 took the row fill when it was created and keeps it
    assert_eq!(
        sheet.effective_style("D4").unwrap().fill,
        Some(FillStyle::solid(Color::RED))
    );
    assert_eq!(
        sheet.find_cell("D4").unwrap().unwrap().style(),
        Some(&Style::new().with(FillStyle::solid(Color::RED)))
    );
}

#[test]
fn test_broadcast_touches_one_facet() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_value("B3", 1).unwrap();
    sheet
        .set_cell_facet("B3", FillStyle::solid(Color::GREEN))
        .unwrap();
    sheet.set_cell_facet("B3", border_q()).unwrap();

    sheet.set_row_facet(3, font_y()).unwrap();

    let style = sheet.effective_style("B3").unwrap();
    assert_eq!(style.font, Some(font_y()));
    assert_eq!(style.fill, Some(FillStyle::solid(Color::GREEN)));
    assert_eq!(style.border, Some(border_q()));
}

#[test]
fn test_later_broadcast_overwrites_cell_facet() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet
        .set_cell_facet("A1", FillStyle::solid(Color::GREEN))
        .unwrap();
    sheet.set_column_facet(1, FillStyle::solid(Color::RED)).unwrap();

    assert_eq!(
        sheet.effective_style("A1").unwrap().fill,
        Some(FillStyle::solid(Color::RED))
    );
}

#[test]
fn test_cell_facet_keeps_inherited_facets() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_row_facet(2, font_y()).unwrap();

    sheet.set_cell_facet("C2", Protection::unlocked()).unwrap();

    let cell = sheet.find_cell("C2").unwrap().unwrap();
    assert_eq!(
        cell.style(),
        Some(&Style::new().with(font_y()).with(Protection::unlocked()))
    );
}

#[test]
fn test_whole_style_replaces_every_facet() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_row_facet(1, font_y()).unwrap();
    sheet.set_value("A1", 1).unwrap();

    sheet.set_style("A1", Style::new().fill_color(Color::GRAY)).unwrap();

    let style = sheet.effective_style("A1").unwrap();
    assert_eq!(style.font, None);
    assert_eq!(style.fill, Some(FillStyle::solid(Color::GRAY)));
}

#[test]
fn test_merged_area_reports_master() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet.set_value("A1", "title").unwrap();
    sheet.set_value("B2", "dropped").unwrap();
    sheet.merge_cells("A1:B2").unwrap();

    sheet.set_row_facet(2, fill_r()).unwrap();

    let b2 = sheet.cell("B2").unwrap();
    assert_eq!(b2.value.as_string(), Some("title"));
    assert_eq!(b2.style, sheet.effective_style("A1").unwrap());
    assert_eq!(b2.style.fill, None);

    // Writes through a merged-away address land on the master
    sheet.set_value("B1", "renamed").unwrap();
    assert_eq!(sheet.value("A1").unwrap().as_string(), Some("renamed"));
}

#[test]
fn test_rich_text_reads_as_plain_text() {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet("Sheet1").unwrap();
    sheet
        .set_value(
            "A1",
            RichText::new()
                .push("Hello, ", None)
                .push("World!", Some(FontStyle::new().with_bold(true))),
        )
        .unwrap();
    sheet.set_value("A2", "Hello, World!").unwrap();

    assert_eq!(
        sheet.value("A1").unwrap().text(),
        sheet.value("A2").unwrap().text()
    );
}

#[test]
fn test_interning_is_deterministic() {
    let styles = [
        defaults_style(),
        Style::new().with(font_x()),
        Style::new().number_format("#,##0").with(font_x()),
        defaults_style(),
    ];

    let mut first = StyleTable::new();
    let ids: Vec<u32> = styles.iter().map(|s| first.intern(s)).collect();
    let mut second = StyleTable::new();
    let again: Vec<u32> = styles.iter().map(|s| second.intern(s)).collect();

    assert_eq!(ids, again);
    assert_eq!(ids[0], ids[3]);
    assert_eq!(first.records(), second.records());
    assert_eq!(first.fonts(), second.fonts());
    // font_x is stored once for both composites that use it
    assert_eq!(first.fonts().iter().filter(|f| **f == font_x()).count(), 1);
}

#[test]
fn test_facet_value_converts_from_facets() {
    let value: FacetValue = fill_r().into();
    assert_eq!(Style::new().with(value), Style::new().with(fill_r()));
}
