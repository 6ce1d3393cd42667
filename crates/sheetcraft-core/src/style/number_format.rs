//! Number format facet

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// First id available to custom format codes; lower ids are reserved.
pub const FIRST_CUSTOM_NUM_FMT_ID: u32 = 164;

/// Number format for cell display
///
/// A custom code spelled exactly like a built-in format is the same value as
/// that built-in: `Custom("0.00") == BuiltIn(2)`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// Reserved format id
    BuiltIn(u32),

    /// Format code string
    Custom(String),
}

/// Built-in format table (id, code)
const BUILTIN_FORMATS: &[(u32, &str)] = &[
    (0, "General"),
    (1, "0"),
    (2, "0.00"),
    (3, "#,##0"),
    (4, "#,##0.00"),
    (9, "0%"),
    (10, "0.00%"),
    (11, "0.00E+00"),
    (12, "# ?/?"),
    (13, "# ??/??"),
    (14, "mm-dd-yy"),
    (15, "d-mmm-yy"),
    (16, "d-mmm"),
    (17, "mmm-yy"),
    (18, "h:mm AM/PM"),
    (19, "h:mm:ss AM/PM"),
    (20, "h:mm"),
    (21, "h:mm:ss"),
    (22, "m/d/yy h:mm"),
    (37, "#,##0 ;(#,##0)"),
    (38, "#,##0 ;[Red](#,##0)"),
    (39, "#,##0.00;(#,##0.00)"),
    (40, "#,##0.00;[Red](#,##0.00)"),
    (45, "mm:ss"),
    (46, "[h]:mm:ss"),
    (47, "mmss.0"),
    (48, "##0.0E+0"),
    (49, "@"),
];

#[derive(PartialEq, Eq, Hash)]
enum FormatKey<'a> {
    Id(u32),
    Code(&'a str),
}

impl NumberFormat {
    pub const GENERAL: Self = NumberFormat::BuiltIn(0);

    pub const ID_GENERAL: u32 = 0;
    pub const ID_NUMBER_INT: u32 = 1;
    pub const ID_NUMBER_DEC2: u32 = 2;
    pub const ID_NUMBER_SEP: u32 = 3;
    pub const ID_NUMBER_SEP_DEC2: u32 = 4;
    pub const ID_PERCENT_INT: u32 = 9;
    pub const ID_PERCENT_DEC2: u32 = 10;
    pub const ID_SCIENTIFIC: u32 = 11;
    pub const ID_DATE_SHORT: u32 = 14;
    pub const ID_TIME_24H: u32 = 20;
    pub const ID_DATETIME: u32 = 22;
    pub const ID_TEXT: u32 = 49;

    /// Format from a code string, recognizing built-in codes
    pub fn from_code<S: AsRef<str> + Into<String>>(code: S) -> Self {
        match Self::builtin_id_for(code.as_ref()) {
            Some(id) => NumberFormat::BuiltIn(id),
            None => NumberFormat::Custom(code.into()),
        }
    }

    /// Built-in format by id
    pub fn from_id(id: u32) -> Self {
        NumberFormat::BuiltIn(id)
    }

    /// The format code
    ///
    /// Reserved ids without a known code (e.g. locale-specific 27-36) read as
    /// `General`.
    pub fn code(&self) -> Cow<'_, str> {
        match self {
            NumberFormat::BuiltIn(id) => {
                Cow::Borrowed(Self::builtin_code(*id).unwrap_or("General"))
            }
            NumberFormat::Custom(s) => Cow::Borrowed(s),
        }
    }

    /// The reserved id if this format is a built-in, by id or by code
    pub fn builtin_id(&self) -> Option<u32> {
        match self {
            NumberFormat::BuiltIn(id) => Some(*id),
            NumberFormat::Custom(s) => Self::builtin_id_for(s),
        }
    }

    /// Code string for a built-in id
    pub fn builtin_code(id: u32) -> Option<&'static str> {
        BUILTIN_FORMATS
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, code)| *code)
    }

    /// Reserved id for a built-in code string
    pub fn builtin_id_for(code: &str) -> Option<u32> {
        BUILTIN_FORMATS
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(id, _)| *id)
    }

    /// Check if this is a date/time format
    pub fn is_date_format(&self) -> bool {
        match self.builtin_id() {
            Some(id) => matches!(id, 14..=22 | 45..=47),
            None => {
                let mut in_quotes = false;
                let mut in_brackets = false;
                for c in self.code().chars() {
                    match c {
                        '"' => in_quotes = !in_quotes,
                        '[' if !in_quotes => in_brackets = true,
                        ']' if !in_quotes => in_brackets = false,
                        'y' | 'Y' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' | 'm' | 'M'
                            if !in_quotes && !in_brackets =>
                        {
                            return true
                        }
                        _ => {}
                    }
                }
                false
            }
        }
    }

    fn key(&self) -> FormatKey<'_> {
        match self.builtin_id() {
            Some(id) => FormatKey::Id(id),
            None => match self {
                NumberFormat::Custom(s) => FormatKey::Code(s),
                NumberFormat::BuiltIn(id) => FormatKey::Id(*id),
            },
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::GENERAL
    }
}

impl PartialEq for NumberFormat {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NumberFormat {}

impl Hash for NumberFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<&str> for NumberFormat {
    fn from(code: &str) -> Self {
        NumberFormat::from_code(code)
    }
}

impl From<String> for NumberFormat {
    fn from(code: String) -> Self {
        NumberFormat::from_code(code)
    }
}
