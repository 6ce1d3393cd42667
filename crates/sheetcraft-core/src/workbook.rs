//! Workbook type - the main document structure

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::resolve::StylePrecedence;
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A workbook (spreadsheet document)
///
/// Holds worksheets in display order plus document metadata. Styles are not
/// pooled here: every save interns the styles it finds into its own
/// [`StyleTable`](crate::style::StyleTable).
#[derive(Debug, Clone)]
pub struct Workbook {
    worksheets: Vec<Worksheet>,
    settings: WorkbookSettings,
    properties: DocumentProperties,
    active_sheet: usize,
}

impl Workbook {
    /// Create a workbook with no worksheets, stamped with the current time
    pub fn new() -> Self {
        let mut wb = Self::empty();
        wb.properties.created = Some(Utc::now());
        wb
    }

    /// Create a workbook with no worksheets and no metadata
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            settings: WorkbookSettings::default(),
            properties: DocumentProperties::default(),
            active_sheet: 0,
        }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by index
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name() == name)
    }

    /// Get the index of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets in display order
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    /// Append a worksheet
    ///
    /// # Example
    /// ```
    /// use sheetcraft_core::Workbook;
    ///
    /// let mut wb = Workbook::new();
    /// let sheet = wb.add_worksheet("basket").unwrap();
    /// sheet.set_value("A1", 5).unwrap();
    /// assert!(wb.add_worksheet("Basket").is_err());
    /// ```
    pub fn add_worksheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.validate_sheet_name(name)?;
        let mut worksheet = Worksheet::new(name);
        worksheet.set_style_precedence(self.settings.style_precedence);
        self.worksheets.push(worksheet);
        let index = self.worksheets.len() - 1;
        Ok(&mut self.worksheets[index])
    }

    /// Append a worksheet with the next free `SheetN` name
    pub fn add_default_worksheet(&mut self) -> Result<&mut Worksheet> {
        let name = self.generate_sheet_name();
        self.add_worksheet(&name)
    }

    /// Append an already built worksheet
    pub fn add_existing_worksheet(&mut self, worksheet: Worksheet) -> Result<usize> {
        self.validate_sheet_name(worksheet.name())?;
        let index = self.worksheets.len();
        self.worksheets.push(worksheet);
        Ok(index)
    }

    /// Remove a worksheet by index
    pub fn remove_worksheet(&mut self, index: usize) -> Result<Worksheet> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }

        let worksheet = self.worksheets.remove(index);
        if self.active_sheet >= self.worksheets.len() {
            self.active_sheet = self.worksheets.len().saturating_sub(1);
        }

        Ok(worksheet)
    }

    /// Move a worksheet to a new position
    pub fn move_worksheet(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.worksheets.len();
        if from >= len {
            return Err(Error::SheetOutOfBounds(from, len));
        }
        if to >= len {
            return Err(Error::SheetOutOfBounds(to, len));
        }

        let worksheet = self.worksheets.remove(from);
        self.worksheets.insert(to, worksheet);

        if self.active_sheet == from {
            self.active_sheet = to;
        } else if from < self.active_sheet && to >= self.active_sheet {
            self.active_sheet -= 1;
        } else if from > self.active_sheet && to <= self.active_sheet {
            self.active_sheet += 1;
        }

        Ok(())
    }

    /// Rename a worksheet
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.validate_sheet_name_excluding(new_name, Some(index))?;
        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    /// Get the active sheet index
    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    /// Set the active sheet index
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.active_sheet = index;
        Ok(())
    }

    /// Get workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    /// Set the row/column precedence for every current and future sheet
    pub fn set_style_precedence(&mut self, precedence: StylePrecedence) {
        self.settings.style_precedence = precedence;
        for ws in &mut self.worksheets {
            ws.set_style_precedence(precedence);
        }
    }

    /// Document metadata
    pub fn properties(&self) -> &DocumentProperties {
        &self.properties
    }

    /// Mutable document metadata
    pub fn properties_mut(&mut self) -> &mut DocumentProperties {
        &mut self.properties
    }

    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        self.validate_sheet_name_excluding(name, None)
    }

    fn validate_sheet_name_excluding(
        &self,
        name: &str,
        exclude_index: Option<usize>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }
        if name.starts_with('\'') || name.ends_with('\'') {
            return Err(Error::InvalidSheetName(
                "Sheet name cannot begin or end with an apostrophe".into(),
            ));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        let name_lower = name.to_lowercase();
        let clash = self
            .worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude_index && ws.name().to_lowercase() == name_lower);
        if clash {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }

    fn generate_sheet_name(&self) -> String {
        (self.worksheets.len() + 1..)
            .map(|n| format!("Sheet{}", n))
            .find(|name| self.validate_sheet_name(name).is_ok())
            .unwrap_or_else(|| "Sheet".to_string())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Workbook-level settings
#[derive(Debug, Clone, Default)]
pub struct WorkbookSettings {
    /// Row/column precedence given to newly added sheets
    pub style_precedence: StylePrecedence,
}

/// Document metadata (the core properties part of a package)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workbook() {
        let wb = Workbook::new();
        assert_eq!(wb.sheet_count(), 0);
        assert!(wb.properties().created.is_some());
        assert!(Workbook::empty().properties().created.is_none());
    }

    #[test]
    fn test_add_worksheets() {
        let mut wb = Workbook::new();
        wb.add_worksheet("Data").unwrap();
        assert_eq!(wb.add_default_worksheet().unwrap().name(), "Sheet2");
        assert_eq!(wb.sheet_index("Sheet2"), Some(1));
    }

    #[test]
    fn test_duplicate_name() {
        let mut wb = Workbook::new();
        wb.add_worksheet("Sheet1").unwrap();
        assert!(matches!(
            wb.add_worksheet("SHEET1"),
            Err(Error::DuplicateSheetName(_))
        ));
        wb.add_worksheet("Other").unwrap();
        assert!(wb.rename_worksheet(1, "sheet1").is_err());
        wb.rename_worksheet(0, "SHEET1").unwrap();
    }

    #[test]
    fn test_invalid_sheet_name() {
        let mut wb = Workbook::new();
        for bad in ["", "Sheet/1", "Sheet:1", "Sheet[1]", "'quoted'"] {
            assert!(
                matches!(wb.add_worksheet(bad), Err(Error::InvalidSheetName(_))),
                "{:?} should be rejected",
                bad
            );
        }
        let long_name = "A".repeat(MAX_SHEET_NAME_LEN + 1);
        assert!(wb.add_worksheet(&long_name).is_err());
    }

    #[test]
    fn test_move_worksheet() {
        let mut wb = Workbook::new();
        for name in ["A", "B", "C"] {
            wb.add_worksheet(name).unwrap();
        }
        wb.move_worksheet(2, 0).unwrap();
        let names: Vec<_> = wb.worksheets().map(|ws| ws.name()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_precedence_reaches_sheets() {
        let mut wb = Workbook::new();
        wb.add_worksheet("Before").unwrap();
        wb.set_style_precedence(StylePrecedence::ColumnFirst);
        wb.add_worksheet("After").unwrap();
        assert!(wb
            .worksheets()
            .all(|ws| ws.style_precedence() == StylePrecedence::ColumnFirst));
    }
}
