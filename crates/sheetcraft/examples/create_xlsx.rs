//! Example: Build a styled basket report and save it as XLSX
//!
//! Run with: cargo run --example create_xlsx

use sheetcraft::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut workbook = Workbook::new();
    workbook.properties_mut().title = Some("Basket report".into());

    let sheet = workbook.add_worksheet("Basket")?;

    // Headers first, then style the whole row
    for (col, header) in ["Item", "Count", "Unit price", "Total"].iter().enumerate() {
        sheet.set_value((1, col as u16 + 1), *header)?;
    }
    sheet.set_row_facet(1, FontStyle::new().with_bold(true).with_color(Color::WHITE))?;
    sheet.set_row_facet(1, FillStyle::solid(Color::rgb(68, 114, 196)))?;
    sheet.set_row_facet(
        1,
        Alignment::new().with_horizontal(HorizontalAlignment::Center),
    )?;

    // Column defaults seed every cell written below
    sheet.set_column_facet(3, NumberFormat::from_code("\"$\"#,##0.00"))?;
    sheet.set_column_facet(4, NumberFormat::from_code("\"$\"#,##0.00"))?;
    sheet.set_column_width(1, 16.0)?;

    let items = [("Apples", 6, 0.45), ("Pears", 4, 0.6), ("Plums", 10, 0.25)];
    for (i, (name, count, price)) in items.iter().enumerate() {
        let row = i as u32 + 2;
        sheet.set_value((row, 1), *name)?;
        sheet.set_value((row, 2), *count)?;
        sheet.set_value((row, 3), *price)?;
        sheet.set_value(
            (row, 4),
            CellValue::formula_with_result(
                format!("B{row}*C{row}"),
                CellValue::Number(*count as f64 * price),
            ),
        )?;
    }

    let total_row = items.len() as u32 + 2;
    sheet.set_value((total_row, 1), "Total")?;
    sheet.set_formula((total_row, 4), &format!("SUM(D2:D{})", total_row - 1))?;
    sheet.set_row_facet(
        total_row,
        BorderStyle::new().with_top(BorderLineStyle::Double, Color::BLACK),
    )?;

    sheet.set_freeze_panes(1, 0)?;

    workbook.save("basket.xlsx")?;
    println!("Created basket.xlsx");

    let reopened = Workbook::open("basket.xlsx")?;
    let sheet = reopened.worksheet(0).ok_or("no sheets")?;
    println!(
        "B1 inherits the header style: bold = {}",
        sheet
            .effective_style("B1")?
            .font
            .map(|f| f.bold)
            .unwrap_or(false)
    );

    Ok(())
}
