//! Style interning
//!
//! A [`StyleTable`] maps styles to the cross-referenced id lists of the
//! persisted format: number formats, fonts, fills and borders each get their
//! own list, and every distinct [`Style`] becomes one composite record
//! ([`XfRecord`]) pointing into them. Ids are handed out in first-seen order
//! and never reused, so asking twice for the same value always yields the
//! same id.
//!
//! A table lives for one save or one load. Saving builds a fresh table from
//! the workbook; loading builds one from the persisted lists with
//! [`StyleTable::from_records`], which checks every cross-reference before
//! any cell is rebuilt.

use super::{
    Alignment, BorderStyle, FillStyle, FontStyle, NumberFormat, PatternType, Protection, Style,
    FIRST_CUSTOM_NUM_FMT_ID,
};
use crate::error::{Error, Result, StyleRefKind};
use ahash::AHashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Composite style record as persisted
///
/// The `apply_*` flags record which of the id-referenced facets the style
/// actually sets; alignment and protection are inline and present when
/// `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XfRecord {
    pub num_fmt_id: u32,
    pub font_id: u32,
    pub fill_id: u32,
    pub border_id: u32,
    pub alignment: Option<Alignment>,
    pub protection: Option<Protection>,
    pub apply_number_format: bool,
    pub apply_font: bool,
    pub apply_fill: bool,
    pub apply_border: bool,
}

/// Append-only interner for one facet list
#[derive(Debug, Clone)]
struct FacetTable<T> {
    items: Vec<T>,
    index: AHashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> FacetTable<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            index: AHashMap::new(),
        }
    }

    /// Load a persisted list verbatim; duplicates keep their first id
    fn from_items(items: Vec<T>) -> Self {
        let mut index = AHashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            index.entry(item.clone()).or_insert(i as u32);
        }
        Self { items, index }
    }

    fn intern(&mut self, value: &T) -> (u32, bool) {
        if let Some(&id) = self.index.get(value) {
            return (id, false);
        }
        let id = self.items.len() as u32;
        self.items.push(value.clone());
        self.index.insert(value.clone(), id);
        (id, true)
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Bidirectional style <-> id mapping for one persistence pass
#[derive(Debug, Clone)]
pub struct StyleTable {
    custom_formats: Vec<(u32, NumberFormat)>,
    format_ids: AHashMap<NumberFormat, u32>,
    next_format_id: u32,
    fonts: FacetTable<FontStyle>,
    fills: FacetTable<FillStyle>,
    borders: FacetTable<BorderStyle>,
    xfs: FacetTable<XfRecord>,
    styles: Vec<Arc<Style>>,
    style_ids: AHashMap<Style, u32>,
}

impl StyleTable {
    /// A table holding only the reserved entries
    ///
    /// Font 0 is the default font, fills 0 and 1 are "none" and "gray125",
    /// border 0 has no edges and composite 0 is the empty style.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.fonts.intern(&FontStyle::default());
        table.fills.intern(&FillStyle::None);
        table.fills.intern(&FillStyle::Pattern {
            pattern: PatternType::Gray125,
            foreground: Default::default(),
            background: Default::default(),
        });
        table.borders.intern(&BorderStyle::default());
        table.intern(&Style::default());
        table
    }

    fn empty() -> Self {
        Self {
            custom_formats: Vec::new(),
            format_ids: AHashMap::new(),
            next_format_id: FIRST_CUSTOM_NUM_FMT_ID,
            fonts: FacetTable::new(),
            fills: FacetTable::new(),
            borders: FacetTable::new(),
            xfs: FacetTable::new(),
            styles: Vec::new(),
            style_ids: AHashMap::new(),
        }
    }

    /// Id for a number format
    ///
    /// Built-ins, recognized by id or by code, keep their reserved id. Other
    /// codes get ids from 164 upward.
    pub fn intern_num_fmt(&mut self, format: &NumberFormat) -> u32 {
        if let Some(id) = format.builtin_id() {
            return id;
        }
        if let Some(&id) = self.format_ids.get(format) {
            return id;
        }
        let id = self.next_format_id;
        self.next_format_id = id.saturating_add(1);
        self.custom_formats.push((id, format.clone()));
        self.format_ids.insert(format.clone(), id);
        id
    }

    /// Id for a font
    pub fn intern_font(&mut self, font: &FontStyle) -> u32 {
        self.fonts.intern(font).0
    }

    /// Id for a fill
    pub fn intern_fill(&mut self, fill: &FillStyle) -> u32 {
        self.fills.intern(fill).0
    }

    /// Id for a border
    pub fn intern_border(&mut self, border: &BorderStyle) -> u32 {
        self.borders.intern(border).0
    }

    /// Composite id for a whole style
    ///
    /// Equal styles always get the same id; different styles never share one.
    pub fn intern(&mut self, style: &Style) -> u32 {
        if let Some(&id) = self.style_ids.get(style) {
            return id;
        }

        let mut record = XfRecord {
            alignment: style.alignment.clone(),
            protection: style.protection,
            ..XfRecord::default()
        };
        if let Some(format) = &style.number_format {
            record.num_fmt_id = self.intern_num_fmt(format);
            record.apply_number_format = true;
        }
        if let Some(font) = &style.font {
            record.font_id = self.intern_font(font);
            record.apply_font = true;
        }
        if let Some(fill) = &style.fill {
            record.fill_id = self.intern_fill(fill);
            record.apply_fill = true;
        }
        if let Some(border) = &style.border {
            record.border_id = self.intern_border(border);
            record.apply_border = true;
        }

        let (id, inserted) = self.xfs.intern(&record);
        if inserted {
            self.styles.push(Arc::new(style.clone()));
        }
        self.style_ids.insert(style.clone(), id);
        id
    }

    /// Rebuild a table from persisted lists
    ///
    /// Fails with [`Error::UnknownStyleReference`] if any composite record
    /// points at a missing number format, font, fill or border, and with
    /// [`Error::NumberFormatIdOutOfRange`] for a format id of `u32::MAX`.
    pub fn from_records(
        num_fmts: Vec<(u32, String)>,
        fonts: Vec<FontStyle>,
        fills: Vec<FillStyle>,
        borders: Vec<BorderStyle>,
        xfs: Vec<XfRecord>,
    ) -> Result<Self> {
        let mut table = Self::empty();
        for (id, code) in num_fmts {
            let format = NumberFormat::from_code(code);
            table.format_ids.entry(format.clone()).or_insert(id);
            table.custom_formats.push((id, format));
            let next = id
                .checked_add(1)
                .ok_or(Error::NumberFormatIdOutOfRange(id))?;
            table.next_format_id = table.next_format_id.max(next);
        }
        table.fonts = FacetTable::from_items(fonts);
        table.fills = FacetTable::from_items(fills);
        table.borders = FacetTable::from_items(borders);

        for xf in &xfs {
            let style = table.resolve_record(xf)?;
            table.style_ids.entry(style.clone()).or_insert(table.styles.len() as u32);
            table.styles.push(Arc::new(style));
        }
        table.xfs = FacetTable::from_items(xfs);
        Ok(table)
    }

    // Id 0 of an unapplied facet is a placeholder and need not exist.
    fn resolve_record(&self, xf: &XfRecord) -> Result<Style> {
        fn lookup<T>(
            applied: bool,
            id: u32,
            kind: StyleRefKind,
            get: impl FnOnce(u32) -> Option<T>,
        ) -> Result<Option<T>> {
            if !applied && id == 0 {
                return Ok(None);
            }
            let value = get(id).ok_or(Error::unknown_style(kind, id))?;
            Ok(applied.then_some(value))
        }

        Ok(Style {
            number_format: lookup(
                xf.apply_number_format,
                xf.num_fmt_id,
                StyleRefKind::NumFmt,
                |id| self.num_fmt(id),
            )?,
            font: lookup(xf.apply_font, xf.font_id, StyleRefKind::Font, |id| {
                self.font(id).cloned()
            })?,
            fill: lookup(xf.apply_fill, xf.fill_id, StyleRefKind::Fill, |id| {
                self.fill(id).cloned()
            })?,
            border: lookup(xf.apply_border, xf.border_id, StyleRefKind::Border, |id| {
                self.border(id).cloned()
            })?,
            alignment: xf.alignment.clone(),
            protection: xf.protection,
        })
    }

    /// Style for a composite id
    pub fn style(&self, id: u32) -> Option<&Arc<Style>> {
        self.styles.get(id as usize)
    }

    /// Style for a composite id, or the reference error a loader reports
    pub fn require_style(&self, id: u32) -> Result<&Arc<Style>> {
        self.style(id)
            .ok_or(Error::unknown_style(StyleRefKind::CellStyle, id))
    }

    /// Number format for an id; reserved ids resolve without an entry
    pub fn num_fmt(&self, id: u32) -> Option<NumberFormat> {
        if let Some((_, format)) = self.custom_formats.iter().find(|(i, _)| *i == id) {
            return Some(format.clone());
        }
        (id < FIRST_CUSTOM_NUM_FMT_ID).then_some(NumberFormat::BuiltIn(id))
    }

    pub fn font(&self, id: u32) -> Option<&FontStyle> {
        self.fonts.get(id)
    }

    pub fn fill(&self, id: u32) -> Option<&FillStyle> {
        self.fills.get(id)
    }

    pub fn border(&self, id: u32) -> Option<&BorderStyle> {
        self.borders.get(id)
    }

    /// Composite record for an id
    pub fn record(&self, id: u32) -> Option<&XfRecord> {
        self.xfs.get(id)
    }

    /// Custom number formats in id order
    pub fn custom_num_fmts(&self) -> impl Iterator<Item = (u32, String)> + '_ {
        self.custom_formats
            .iter()
            .filter(|(id, _)| *id >= FIRST_CUSTOM_NUM_FMT_ID)
            .map(|(id, format)| (*id, format.code().into_owned()))
    }

    pub fn fonts(&self) -> &[FontStyle] {
        &self.fonts.items
    }

    pub fn fills(&self) -> &[FillStyle] {
        &self.fills.items
    }

    pub fn borders(&self) -> &[BorderStyle] {
        &self.borders.items
    }

    /// Composite records in id order
    pub fn records(&self) -> &[XfRecord] {
        &self.xfs.items
    }

    /// Number of composite styles
    pub fn len(&self) -> usize {
        self.xfs.len()
    }

    /// True for a table built from an empty persisted list
    pub fn is_empty(&self) -> bool {
        self.xfs.len() == 0
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, HorizontalAlignment};

    #[test]
    fn test_reserved_entries() {
        let table = StyleTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.fonts().len(), 1);
        assert_eq!(table.fills().len(), 2);
        assert_eq!(table.borders().len(), 1);
        assert!(table.style(0).unwrap().is_empty());
    }

    #[test]
    fn test_equal_styles_share_id() {
        let mut table = StyleTable::new();
        let a = table.intern(&Style::new().bold(true).fill_color(Color::RED));
        let b = table.intern(&Style::new().fill_color(Color::RED).bold(true));
        let c = table.intern(&Style::new().italic(true));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.intern(&Style::new()), 0);
    }

    #[test]
    fn test_facets_shared_across_composites() {
        let mut table = StyleTable::new();
        let font = FontStyle::new().with_bold(true);
        let a = table.intern(&Style::new().with(font.clone()));
        let b = table.intern(
            &Style::new()
                .with(font)
                .horizontal_alignment(HorizontalAlignment::Center),
        );
        assert_ne!(a, b);
        assert_eq!(table.record(a).unwrap().font_id, table.record(b).unwrap().font_id);
        assert_eq!(table.fonts().len(), 2);
    }

    #[test]
    fn test_num_fmt_ids() {
        let mut table = StyleTable::new();
        assert_eq!(table.intern_num_fmt(&NumberFormat::from_code("0.00")), 2);
        assert_eq!(table.intern_num_fmt(&NumberFormat::Custom("0.00".into())), 2);
        assert_eq!(table.intern_num_fmt(&NumberFormat::from_code("0.000")), 164);
        assert_eq!(table.intern_num_fmt(&NumberFormat::from_code("#,##0.0")), 165);
        assert_eq!(table.intern_num_fmt(&NumberFormat::from_code("0.000")), 164);
        assert_eq!(
            table.custom_num_fmts().collect::<Vec<_>>(),
            vec![(164, "0.000".to_string()), (165, "#,##0.0".to_string())]
        );
    }

    #[test]
    fn test_default_font_is_not_unset_font() {
        let mut table = StyleTable::new();
        let id = table.intern(&Style::new().with(FontStyle::default()));
        assert_ne!(id, 0);
        assert_eq!(table.record(id).unwrap().font_id, 0);
        assert!(table.record(id).unwrap().apply_font);
    }

    #[test]
    fn test_from_records_round_trip() {
        let mut saved = StyleTable::new();
        let style = Style::new()
            .number_format("0.0%")
            .font_color(Color::BLUE)
            .fill_color(Color::YELLOW)
            .wrap_text(true)
            .with(Protection::unlocked());
        let id = saved.intern(&style);

        let loaded = StyleTable::from_records(
            saved.custom_num_fmts().collect(),
            saved.fonts().to_vec(),
            saved.fills().to_vec(),
            saved.borders().to_vec(),
            saved.records().to_vec(),
        )
        .unwrap();
        assert_eq!(**loaded.style(id).unwrap(), style);
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let xf = XfRecord {
            font_id: 3,
            apply_font: true,
            ..XfRecord::default()
        };
        let err = StyleTable::from_records(
            vec![],
            vec![FontStyle::default()],
            vec![FillStyle::None],
            vec![BorderStyle::default()],
            vec![xf],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownStyleReference {
                kind: StyleRefKind::Font,
                id: 3
            }
        ));

        let xf = XfRecord {
            num_fmt_id: 170,
            apply_number_format: true,
            ..XfRecord::default()
        };
        let err = StyleTable::from_records(
            vec![(164, "0.0".into())],
            vec![FontStyle::default()],
            vec![FillStyle::None],
            vec![BorderStyle::default()],
            vec![xf],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownStyleReference {
                kind: StyleRefKind::NumFmt,
                id: 170
            }
        ));
    }

    #[test]
    fn test_extreme_num_fmt_ids() {
        let err = StyleTable::from_records(
            vec![(u32::MAX, "0.000".into())],
            vec![FontStyle::default()],
            vec![FillStyle::None],
            vec![BorderStyle::default()],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, Error::NumberFormatIdOutOfRange(u32::MAX)));

        let mut table = StyleTable::from_records(
            vec![(u32::MAX - 1, "0.000".into())],
            vec![FontStyle::default()],
            vec![FillStyle::None],
            vec![BorderStyle::default()],
            vec![],
        )
        .unwrap();
        assert_eq!(table.num_fmt(u32::MAX - 1), Some(NumberFormat::from_code("0.000")));
        assert_eq!(table.intern_num_fmt(&NumberFormat::from_code("0.0000")), u32::MAX);
    }
}
