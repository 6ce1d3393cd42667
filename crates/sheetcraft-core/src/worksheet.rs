//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{Cell, CellAddress, CellRange, CellValue, CellView, IntoAddress, IntoRange};
use crate::column::Column;
use crate::error::{Error, Result};
use crate::resolve::{self, Broadcast, StylePrecedence};
use crate::row::Row;
use crate::style::{FacetValue, Style};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Storage is sparse: rows exist once something is written to them, cells
/// once a value or style is written to them. Read-only queries never create
/// either.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    rows: BTreeMap<u32, Row>,
    columns: BTreeMap<u16, Column>,
    merges: Vec<CellRange>,
    freeze_panes: Option<FreezePanes>,
    visible: bool,
    precedence: StylePrecedence,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
            columns: BTreeMap::new(),
            merges: Vec::new(),
            freeze_panes: None,
            visible: true,
            precedence: StylePrecedence::default(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Check if the sheet is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set sheet visibility
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Which default wins when a row and a column set the same facet
    pub fn style_precedence(&self) -> StylePrecedence {
        self.precedence
    }

    /// Change the row/column precedence for this sheet
    pub fn set_style_precedence(&mut self, precedence: StylePrecedence) {
        self.precedence = precedence;
    }

    // === Reads ===

    /// Row, if it exists
    pub fn find_row(&self, row: u32) -> Option<&Row> {
        self.rows.get(&row)
    }

    /// Column definition, if it exists
    pub fn find_column(&self, col: u16) -> Option<&Column> {
        self.columns.get(&col)
    }

    /// Materialized cell at an address, without following merges
    pub fn find_cell<A: IntoAddress>(&self, address: A) -> Result<Option<&Cell>> {
        let addr = address.into_address()?;
        Ok(self.cell_at(addr))
    }

    fn cell_at(&self, addr: CellAddress) -> Option<&Cell> {
        self.rows.get(&addr.row)?.cells.get(&addr.col)
    }

    /// Value and effective style of an address
    ///
    /// Works for any address; a merged-away address reports its master.
    pub fn cell<A: IntoAddress>(&self, address: A) -> Result<CellView> {
        let addr = address.into_address()?;
        let target = self.redirect(addr);
        let cell = self.cell_at(target);
        Ok(CellView {
            address: addr,
            value: cell.map(|c| c.value().clone()).unwrap_or_default(),
            style: self.resolve_at(target),
            materialized: self.cell_at(addr).is_some(),
        })
    }

    /// Value of an address
    pub fn value<A: IntoAddress>(&self, address: A) -> Result<CellValue> {
        let addr = self.redirect(address.into_address()?);
        Ok(self
            .cell_at(addr)
            .map(|c| c.value().clone())
            .unwrap_or_default())
    }

    /// Effective style of an address
    pub fn effective_style<A: IntoAddress>(&self, address: A) -> Result<Style> {
        let addr = self.redirect(address.into_address()?);
        Ok(self.resolve_at(addr))
    }

    fn resolve_at(&self, addr: CellAddress) -> Style {
        let row = self.rows.get(&addr.row);
        resolve::effective_style(
            row.and_then(|r| r.cells.get(&addr.col)),
            row.and_then(Row::default_style),
            self.columns.get(&addr.col).and_then(Column::default_style),
            self.precedence,
        )
    }

    fn layered_default(&self, addr: CellAddress) -> Option<Style> {
        resolve::layered_default(
            self.rows.get(&addr.row).and_then(Row::default_style),
            self.columns.get(&addr.col).and_then(Column::default_style),
            self.precedence,
        )
    }

    /// Rows in ascending order
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Column definitions in ascending order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// All materialized cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.values().flat_map(Row::cells)
    }

    /// Number of materialized cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(Row::cell_count).sum()
    }

    /// Check if the sheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Smallest range covering every materialized cell
    pub fn used_range(&self) -> Option<CellRange> {
        let mut cells = self.cells().map(Cell::address);
        let first = cells.next()?;
        let (mut min_col, mut max_col, mut max_row) = (first.col, first.col, first.row);
        for addr in cells {
            min_col = min_col.min(addr.col);
            max_col = max_col.max(addr.col);
            max_row = max_row.max(addr.row);
        }
        Some(CellRange::new(
            CellAddress::new(first.row, min_col),
            CellAddress::new(max_row, max_col),
        ))
    }

    // === Cell writes ===

    /// Cell at an address, creating it if needed
    ///
    /// A new cell starts with the row/column defaults resolved at this moment
    /// as its explicit style. Merged-away addresses yield the merge master.
    pub fn materialize<A: IntoAddress>(&mut self, address: A) -> Result<&mut Cell> {
        let addr = self.redirect(address.into_address()?);
        Ok(self.materialize_at(addr))
    }

    fn materialize_at(&mut self, addr: CellAddress) -> &mut Cell {
        let snapshot = match self.cell_at(addr) {
            Some(_) => None,
            None => self.layered_default(addr),
        };
        self.rows
            .entry(addr.row)
            .or_insert_with(|| Row::new(addr.row))
            .cells
            .entry(addr.col)
            .or_insert_with(|| {
                let mut cell = Cell::new(addr);
                cell.set_style(snapshot);
                cell
            })
    }

    /// Set a cell value by address
    ///
    /// # Example
    ///
    /// ```rust
    /// use sheetcraft_core::Worksheet;
    ///
    /// let mut sheet = Worksheet::new("Sheet1");
    /// sheet.set_value("A1", "Hello").unwrap();
    /// sheet.set_value((1, 2), 42.0).unwrap();
    /// assert_eq!(sheet.value("B1").unwrap().as_number(), Some(42.0));
    /// ```
    pub fn set_value<A: IntoAddress, V: Into<CellValue>>(
        &mut self,
        address: A,
        value: V,
    ) -> Result<()> {
        self.materialize(address)?.set_value(value.into());
        Ok(())
    }

    /// Set a formula; a missing leading `=` is added
    pub fn set_formula<A: IntoAddress>(&mut self, address: A, formula: &str) -> Result<()> {
        self.set_value(address, CellValue::formula(formula))
    }

    /// Replace a cell's explicit style as a whole
    pub fn set_style<A: IntoAddress>(&mut self, address: A, style: Style) -> Result<()> {
        self.materialize(address)?.set_style(Some(style));
        Ok(())
    }

    /// Set one style facet on a cell
    ///
    /// The other facets keep what the cell currently shows, including facets
    /// it only inherits.
    pub fn set_cell_facet<A: IntoAddress, V: Into<FacetValue>>(
        &mut self,
        address: A,
        value: V,
    ) -> Result<()> {
        let addr = self.redirect(address.into_address()?);
        let mut style = self.resolve_at(addr);
        style.set(value.into());
        self.materialize_at(addr).set_style(Some(style));
        Ok(())
    }

    /// Remove a cell; returns whether one existed
    pub fn clear_cell<A: IntoAddress>(&mut self, address: A) -> Result<bool> {
        let addr = self.redirect(address.into_address()?);
        Ok(self
            .rows
            .get_mut(&addr.row)
            .and_then(|r| r.cells.remove(&addr.col))
            .is_some())
    }

    /// Insert a fully built cell, replacing any cell at its address
    ///
    /// No defaults are applied; for loaders that restore stored state.
    pub fn insert_cell(&mut self, mut cell: Cell) -> Result<()> {
        let addr = cell.address().into_address()?;
        cell.normalize_style();
        cell.set_master(self.merge_master(addr).filter(|m| *m != addr));
        self.rows
            .entry(addr.row)
            .or_insert_with(|| Row::new(addr.row))
            .cells
            .insert(addr.col, cell);
        Ok(())
    }

    // === Row and column defaults ===

    /// Set one facet of a row's default style
    ///
    /// Every cell already in the row gets the facet overwritten; cells
    /// created later pick it up from the default.
    pub fn set_row_facet<V: Into<FacetValue>>(&mut self, row: u32, value: V) -> Result<()> {
        let value = value.into();
        let row = self.row_entry(row)?;
        row.default_style
            .get_or_insert_with(Style::new)
            .set(value.clone());

        let mut broadcast = Broadcast::new(value);
        for cell in row.cells.values_mut() {
            broadcast.apply(cell);
        }
        Ok(())
    }

    /// Set every facet present in `style` on a row default
    pub fn set_row_style(&mut self, row: u32, style: &Style) -> Result<()> {
        check_row(row)?;
        for value in facet_values(style) {
            self.set_row_facet(row, value)?;
        }
        Ok(())
    }

    /// Set one facet of a column's default style
    ///
    /// Every existing cell in the column gets the facet overwritten. No rows
    /// are created.
    pub fn set_column_facet<V: Into<FacetValue>>(&mut self, col: u16, value: V) -> Result<()> {
        let value = value.into();
        self.column_entry(col)?
            .default_style
            .get_or_insert_with(Style::new)
            .set(value.clone());

        let mut broadcast = Broadcast::new(value);
        for row in self.rows.values_mut() {
            if let Some(cell) = row.cells.get_mut(&col) {
                broadcast.apply(cell);
            }
        }
        Ok(())
    }

    /// Set every facet present in `style` on a column default
    pub fn set_column_style(&mut self, col: u16, style: &Style) -> Result<()> {
        check_col(col)?;
        for value in facet_values(style) {
            self.set_column_facet(col, value)?;
        }
        Ok(())
    }

    /// Replace a row's default style without touching its cells
    pub fn restore_row_style(&mut self, row: u32, style: Option<Style>) -> Result<()> {
        self.row_entry(row)?.default_style = style.filter(|s| !s.is_empty());
        Ok(())
    }

    /// Replace a column's default style without touching any cells
    pub fn restore_column_style(&mut self, col: u16, style: Option<Style>) -> Result<()> {
        self.column_entry(col)?.default_style = style.filter(|s| !s.is_empty());
        Ok(())
    }

    /// Row metadata, creating the row if needed
    pub fn row_mut(&mut self, row: u32) -> Result<&mut Row> {
        self.row_entry(row)
    }

    /// Column metadata, creating the definition if needed
    pub fn column_mut(&mut self, col: u16) -> Result<&mut Column> {
        self.column_entry(col)
    }

    /// Set a row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        self.row_entry(row)?.height = Some(height);
        Ok(())
    }

    /// Set a column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        self.column_entry(col)?.width = Some(width);
        Ok(())
    }

    fn row_entry(&mut self, row: u32) -> Result<&mut Row> {
        check_row(row)?;
        Ok(self.rows.entry(row).or_insert_with(|| Row::new(row)))
    }

    fn column_entry(&mut self, col: u16) -> Result<&mut Column> {
        check_col(col)?;
        Ok(self.columns.entry(col).or_insert_with(|| Column::new(col)))
    }

    // === Merged Cells ===

    /// Merged regions in the order they were added
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merges
    }

    /// Master (top-left) address of the merge covering `addr`
    pub fn merge_master(&self, addr: CellAddress) -> Option<CellAddress> {
        self.merges
            .iter()
            .find(|range| range.contains(&addr))
            .map(|range| range.start)
    }

    fn redirect(&self, addr: CellAddress) -> CellAddress {
        self.merge_master(addr).unwrap_or(addr)
    }

    /// Merge a range into its top-left cell
    ///
    /// Cells already present elsewhere in the range lose their value and
    /// style and defer to the master from now on.
    pub fn merge_cells<R: IntoRange>(&mut self, range: R) -> Result<()> {
        let range = range.into_range()?;
        if range.is_single() {
            return Err(Error::InvalidRange(format!(
                "cannot merge single cell {}",
                range
            )));
        }
        if self.merges.iter().any(|existing| existing.overlaps(&range)) {
            return Err(Error::MergedCellConflict(range.to_string()));
        }

        let master = range.start;
        for row in self.rows.range_mut(range.start.row..=range.end.row) {
            for (_, cell) in row.1.cells.range_mut(range.start.col..=range.end.col) {
                if cell.address() != master {
                    cell.set_value(CellValue::Empty);
                    cell.set_style(None);
                    cell.set_master(Some(master));
                }
            }
        }
        self.merges.push(range);
        Ok(())
    }

    /// Remove a merge; returns whether it existed
    ///
    /// Merged-away cells that hold nothing are dropped.
    pub fn unmerge_cells<R: IntoRange>(&mut self, range: R) -> Result<bool> {
        let range = range.into_range()?;
        let Some(pos) = self.merges.iter().position(|m| *m == range) else {
            return Ok(false);
        };
        self.merges.remove(pos);

        for (_, row) in self.rows.range_mut(range.start.row..=range.end.row) {
            row.cells.retain(|_, cell| {
                if !range.contains(&cell.address()) || cell.master().is_none() {
                    return true;
                }
                cell.set_master(None);
                !cell.is_blank()
            });
        }
        Ok(true)
    }

    // === Freeze Panes ===

    /// Get freeze pane settings
    pub fn freeze_panes(&self) -> Option<&FreezePanes> {
        self.freeze_panes.as_ref()
    }

    /// Freeze the first `rows` rows and `cols` columns; `(0, 0)` unfreezes
    pub fn set_freeze_panes(&mut self, rows: u32, cols: u16) -> Result<()> {
        if rows >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(rows, MAX_ROWS));
        }
        if cols >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(cols as u32, MAX_COLS));
        }
        self.freeze_panes = (rows > 0 || cols > 0).then_some(FreezePanes { rows, cols });
        Ok(())
    }
}

fn check_row(row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }
    Ok(())
}

fn check_col(col: u16) -> Result<()> {
    if col == 0 || col > MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col as u32, MAX_COLS));
    }
    Ok(())
}

fn facet_values(style: &Style) -> impl Iterator<Item = FacetValue> + '_ {
    crate::style::Facet::ALL
        .into_iter()
        .filter_map(|facet| style.get(facet))
}

/// Frozen rows/columns at the top-left of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    /// Number of frozen rows
    pub rows: u32,
    /// Number of frozen columns
    pub cols: u16,
}

impl FreezePanes {
    /// First cell of the scrollable area
    pub fn top_left_cell(&self) -> CellAddress {
        CellAddress::new(self.rows + 1, self.cols + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Alignment, Color, FillStyle, FontStyle, HorizontalAlignment};
    use pretty_assertions::assert_eq;

    fn font(name: &str) -> FontStyle {
        FontStyle::new().with_name(name)
    }

    #[test]
    fn test_set_and_get_values() {
        let mut ws = Worksheet::new("Test");
        ws.set_value("A1", 42).unwrap();
        ws.set_value("B1", "Hello").unwrap();
        ws.set_formula("C1", "A1*2").unwrap();

        assert_eq!(ws.value("A1").unwrap(), CellValue::Number(42.0));
        assert_eq!(ws.value("B1").unwrap().as_string(), Some("Hello"));
        assert_eq!(ws.value("C1").unwrap().formula_text(), Some("=A1*2"));
        assert_eq!(ws.value("D1").unwrap(), CellValue::Empty);
        assert!(ws.set_value("A0", 1).is_err());
    }

    #[test]
    fn test_reads_do_not_materialize() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_facet(3, font("Arial")).unwrap();

        let view = ws.cell("B3").unwrap();
        assert!(!view.materialized);
        assert_eq!(view.style.font, Some(font("Arial")));
        assert!(ws.find_cell("B3").unwrap().is_none());
        assert_eq!(ws.find_row(3).unwrap().cell_count(), 0);
        assert!(ws.find_row(4).is_none());
    }

    #[test]
    fn test_new_cell_snapshots_defaults() {
        let mut ws = Worksheet::new("Test");
        ws.set_column_facet(2, Alignment::new().with_wrap(true))
            .unwrap();
        ws.set_row_facet(1, font("Arial")).unwrap();
        ws.set_value("B1", 1).unwrap();

        let style = ws.find_cell("B1").unwrap().unwrap().style().unwrap().clone();
        assert_eq!(style.font, Some(font("Arial")));
        assert_eq!(style.alignment, Some(Alignment::new().with_wrap(true)));
    }

    #[test]
    fn test_row_broadcast_overwrites_existing_cells() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_facet("A1", font("F1")).unwrap();
        ws.set_cell_facet("A1", FillStyle::solid(Color::RED)).unwrap();
        ws.set_row_facet(1, font("F2")).unwrap();

        let style = ws.effective_style("A1").unwrap();
        assert_eq!(style.font, Some(font("F2")));
        assert_eq!(style.fill, Some(FillStyle::solid(Color::RED)));
        assert_eq!(ws.effective_style("Z1").unwrap().font, Some(font("F2")));
    }

    #[test]
    fn test_column_broadcast_does_not_create_rows() {
        let mut ws = Worksheet::new("Test");
        ws.set_value("C5", "x").unwrap();
        ws.set_column_facet(3, font("Col")).unwrap();

        assert_eq!(ws.effective_style("C5").unwrap().font, Some(font("Col")));
        assert!(ws.find_row(2).is_none());
        assert_eq!(ws.rows().count(), 1);
        assert_eq!(ws.find_column(3).unwrap().letter(), "C");
    }

    #[test]
    fn test_explicit_facet_survives_other_facet_broadcast() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_facet(1, font("F2")).unwrap();
        ws.set_value("A1", 1).unwrap();
        ws.set_cell_facet("A1", font("G")).unwrap();
        ws.set_row_facet(1, Alignment::new().with_horizontal(HorizontalAlignment::Center))
            .unwrap();

        let style = ws.effective_style("A1").unwrap();
        assert_eq!(style.font, Some(font("G")));
        assert!(style.alignment.is_some());
    }

    #[test]
    fn test_precedence_policy() {
        let mut ws = Worksheet::new("Test");
        ws.set_row_facet(2, font("Row")).unwrap();
        ws.set_column_facet(2, font("Col")).unwrap();
        assert_eq!(ws.effective_style("B2").unwrap().font, Some(font("Row")));

        ws.set_style_precedence(StylePrecedence::ColumnFirst);
        assert_eq!(ws.effective_style("B2").unwrap().font, Some(font("Col")));
    }

    #[test]
    fn test_merge_redirects_to_master() {
        let mut ws = Worksheet::new("Test");
        ws.set_value("B1", "gone").unwrap();
        ws.set_value("A1", "kept").unwrap();
        ws.merge_cells("A1:B2").unwrap();

        let slave = ws.find_cell("B1").unwrap().unwrap();
        assert_eq!(slave.master(), Some(CellAddress::new(1, 1)));
        assert!(slave.value().is_empty());
        assert_eq!(ws.value("B2").unwrap().as_string(), Some("kept"));

        ws.set_value("B2", "via slave").unwrap();
        assert_eq!(ws.value("A1").unwrap().as_string(), Some("via slave"));
        assert!(ws.find_cell("B2").unwrap().is_none());

        assert!(matches!(
            ws.merge_cells("B2:C3"),
            Err(Error::MergedCellConflict(_))
        ));
        assert!(matches!(ws.merge_cells("E5"), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_broadcast_skips_merged_away_cells() {
        let mut ws = Worksheet::new("Test");
        ws.set_value("A1", 1).unwrap();
        ws.set_value("B1", 2).unwrap();
        ws.merge_cells("A1:B1").unwrap();
        ws.set_row_facet(1, font("Row")).unwrap();

        assert!(ws.find_cell("B1").unwrap().unwrap().style().is_none());
        assert_eq!(ws.effective_style("B1").unwrap().font, Some(font("Row")));
    }

    #[test]
    fn test_unmerge_drops_blank_slaves() {
        let mut ws = Worksheet::new("Test");
        ws.set_value("A1", 1).unwrap();
        ws.set_value("A2", 2).unwrap();
        ws.merge_cells("A1:A2").unwrap();
        assert!(ws.unmerge_cells("A1:A2").unwrap());
        assert!(!ws.unmerge_cells("A1:A2").unwrap());

        assert!(ws.find_cell("A2").unwrap().is_none());
        assert_eq!(ws.value("A1").unwrap(), CellValue::Number(1.0));
    }

    #[test]
    fn test_used_range_and_freeze() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.used_range().is_none());
        ws.set_value("C2", 1).unwrap();
        ws.set_value("B7", 1).unwrap();
        assert_eq!(ws.used_range().unwrap().to_string(), "B2:C7");

        ws.set_freeze_panes(1, 0).unwrap();
        assert_eq!(
            ws.freeze_panes().unwrap().top_left_cell(),
            CellAddress::new(2, 1)
        );
        ws.set_freeze_panes(0, 0).unwrap();
        assert!(ws.freeze_panes().is_none());
    }
}
