//! Cell styling types
//!
//! A [`Style`] is a value made of six independent facets, each optional:
//! number format, font, fill, border, alignment and protection. An unset
//! facet means "nothing specified here", which lets row and column defaults
//! fill it in (see [`crate::resolve`]).
//!
//! [`StyleTable`] interns styles into the compact id lists used on disk.

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod table;

pub use alignment::{Alignment, HorizontalAlignment, ReadingOrder, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle, DiagonalDirection};
pub use color::Color;
pub use fill::{FillStyle, GradientStop, GradientType, PatternType};
pub use font::{FontStyle, FontVerticalAlign, Underline};
pub use number_format::{NumberFormat, FIRST_CUSTOM_NUM_FMT_ID};
pub use table::{StyleTable, XfRecord};

/// Complete cell style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub number_format: Option<NumberFormat>,
    pub font: Option<FontStyle>,
    pub fill: Option<FillStyle>,
    pub border: Option<BorderStyle>,
    pub alignment: Option<Alignment>,
    pub protection: Option<Protection>,
}

/// Names one of the six style facets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    NumberFormat,
    Font,
    Fill,
    Border,
    Alignment,
    Protection,
}

impl Facet {
    /// Every facet, in persisted order
    pub const ALL: [Facet; 6] = [
        Facet::NumberFormat,
        Facet::Font,
        Facet::Fill,
        Facet::Border,
        Facet::Alignment,
        Facet::Protection,
    ];
}

/// A value for one facet
///
/// Row and column style writes take one of these so a single call replaces
/// exactly one facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetValue {
    NumberFormat(NumberFormat),
    Font(FontStyle),
    Fill(FillStyle),
    Border(BorderStyle),
    Alignment(Alignment),
    Protection(Protection),
}

impl FacetValue {
    /// Which facet this value belongs to
    pub fn facet(&self) -> Facet {
        match self {
            FacetValue::NumberFormat(_) => Facet::NumberFormat,
            FacetValue::Font(_) => Facet::Font,
            FacetValue::Fill(_) => Facet::Fill,
            FacetValue::Border(_) => Facet::Border,
            FacetValue::Alignment(_) => Facet::Alignment,
            FacetValue::Protection(_) => Facet::Protection,
        }
    }
}

macro_rules! facet_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for FacetValue {
            fn from(v: $ty) -> Self {
                FacetValue::$variant(v)
            }
        })*
    };
}

facet_from! {
    NumberFormat => NumberFormat,
    FontStyle => Font,
    FillStyle => Fill,
    BorderStyle => Border,
    Alignment => Alignment,
    Protection => Protection,
}

impl Style {
    /// A style with no facets set
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no facet is set
    pub fn is_empty(&self) -> bool {
        self.number_format.is_none()
            && self.font.is_none()
            && self.fill.is_none()
            && self.border.is_none()
            && self.alignment.is_none()
            && self.protection.is_none()
    }

    /// Whether `facet` is set
    pub fn has(&self, facet: Facet) -> bool {
        match facet {
            Facet::NumberFormat => self.number_format.is_some(),
            Facet::Font => self.font.is_some(),
            Facet::Fill => self.fill.is_some(),
            Facet::Border => self.border.is_some(),
            Facet::Alignment => self.alignment.is_some(),
            Facet::Protection => self.protection.is_some(),
        }
    }

    /// Replace one facet
    pub fn set(&mut self, value: FacetValue) {
        match value {
            FacetValue::NumberFormat(v) => self.number_format = Some(v),
            FacetValue::Font(v) => self.font = Some(v),
            FacetValue::Fill(v) => self.fill = Some(v),
            FacetValue::Border(v) => self.border = Some(v),
            FacetValue::Alignment(v) => self.alignment = Some(v),
            FacetValue::Protection(v) => self.protection = Some(v),
        }
    }

    /// Builder form of [`Style::set`]
    pub fn with<V: Into<FacetValue>>(mut self, value: V) -> Self {
        self.set(value.into());
        self
    }

    /// Unset one facet
    pub fn clear(&mut self, facet: Facet) {
        match facet {
            Facet::NumberFormat => self.number_format = None,
            Facet::Font => self.font = None,
            Facet::Fill => self.fill = None,
            Facet::Border => self.border = None,
            Facet::Alignment => self.alignment = None,
            Facet::Protection => self.protection = None,
        }
    }

    /// The value of one facet, if set
    pub fn get(&self, facet: Facet) -> Option<FacetValue> {
        match facet {
            Facet::NumberFormat => self.number_format.clone().map(FacetValue::NumberFormat),
            Facet::Font => self.font.clone().map(FacetValue::Font),
            Facet::Fill => self.fill.clone().map(FacetValue::Fill),
            Facet::Border => self.border.clone().map(FacetValue::Border),
            Facet::Alignment => self.alignment.clone().map(FacetValue::Alignment),
            Facet::Protection => self.protection.map(FacetValue::Protection),
        }
    }

    /// Per facet, keep `self`'s value and take `other`'s where `self` is unset
    pub fn or(mut self, other: &Style) -> Style {
        if self.number_format.is_none() {
            self.number_format = other.number_format.clone();
        }
        if self.font.is_none() {
            self.font = other.font.clone();
        }
        if self.fill.is_none() {
            self.fill = other.fill.clone();
        }
        if self.border.is_none() {
            self.border = other.border.clone();
        }
        if self.alignment.is_none() {
            self.alignment = other.alignment.clone();
        }
        if self.protection.is_none() {
            self.protection = other.protection;
        }
        self
    }

    /// Font with bold set, starting from the current or default font
    pub fn bold(mut self, bold: bool) -> Self {
        self.font_mut().bold = bold;
        self
    }

    /// Font with italic set
    pub fn italic(mut self, italic: bool) -> Self {
        self.font_mut().italic = italic;
        self
    }

    /// Font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_mut().size = size;
        self
    }

    /// Font family
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font_mut().name = name.into();
        self
    }

    /// Font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font_mut().color = color;
        self
    }

    /// Solid background fill
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = Some(FillStyle::Solid { color });
        self
    }

    /// Number format from a code string
    pub fn number_format<S: AsRef<str> + Into<String>>(mut self, code: S) -> Self {
        self.number_format = Some(NumberFormat::from_code(code));
        self
    }

    /// Horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment_mut().horizontal = align;
        self
    }

    /// Vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment_mut().vertical = align;
        self
    }

    /// Wrap text
    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.alignment_mut().wrap_text = wrap;
        self
    }

    /// Mutable font, set to the default font first if unset
    pub fn font_mut(&mut self) -> &mut FontStyle {
        self.font.get_or_insert_with(FontStyle::default)
    }

    /// Mutable alignment, set to the default alignment first if unset
    pub fn alignment_mut(&mut self) -> &mut Alignment {
        self.alignment.get_or_insert_with(Alignment::default)
    }

    /// Mutable border, set to no borders first if unset
    pub fn border_mut(&mut self) -> &mut BorderStyle {
        self.border.get_or_insert_with(BorderStyle::default)
    }
}

/// Cell protection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Protection {
    /// Locked when the sheet is protected
    pub locked: bool,
    /// Formula hidden when the sheet is protected
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

impl Protection {
    /// Locked, not hidden
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlocked, not hidden
    pub fn unlocked() -> Self {
        Self {
            locked: false,
            hidden: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_style() {
        assert!(Style::new().is_empty());
        assert!(!Style::new().bold(true).is_empty());
    }

    #[test]
    fn test_set_replaces_single_facet() {
        let mut style = Style::new()
            .with(FontStyle::new().with_bold(true))
            .with(Alignment::new().with_wrap(true));
        style.set(FontStyle::new().with_italic(true).into());

        assert!(style.font.as_ref().unwrap().italic);
        assert!(!style.font.as_ref().unwrap().bold);
        assert!(style.alignment.as_ref().unwrap().wrap_text);
    }

    #[test]
    fn test_or_is_per_facet() {
        let row = Style::new()
            .with(FontStyle::new().with_size(20.0))
            .with(FillStyle::solid(Color::RED));
        let col = Style::new()
            .with(FontStyle::new().with_size(8.0))
            .with(Alignment::new().with_horizontal(HorizontalAlignment::Center));

        let merged = row.clone().or(&col);
        assert_eq!(merged.font, row.font);
        assert_eq!(merged.fill, row.fill);
        assert_eq!(merged.alignment, col.alignment);
        assert_eq!(merged.border, None);
    }

    #[test]
    fn test_equality_is_deep() {
        let a = Style::new().bold(true).number_format("0.00");
        let b = Style::new()
            .with(FontStyle::new().with_bold(true))
            .with(NumberFormat::BuiltIn(2));
        assert_eq!(a, b);
        assert_ne!(a, b.clone().italic(true));
    }

    #[test]
    fn test_get_and_clear() {
        let mut style = Style::new().fill_color(Color::BLUE);
        assert_eq!(
            style.get(Facet::Fill),
            Some(FacetValue::Fill(FillStyle::solid(Color::BLUE)))
        );
        style.clear(Facet::Fill);
        assert!(style.is_empty());
        assert_eq!(style.get(Facet::Fill), None);
    }
}
