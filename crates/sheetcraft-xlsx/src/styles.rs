//! XLSX styles (styles.xml) read/write helpers

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::document::StyleLists;
use crate::error::{XlsxError, XlsxResult};
use crate::xml::{attr, attr_bool, attr_parse, bool_attr, escape_xml, parse_bool, XML_HEADER};
use sheetcraft_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, DiagonalDirection, FillStyle,
    FontStyle, FontVerticalAlign, GradientStop, GradientType, HorizontalAlignment, PatternType,
    Protection, ReadingOrder, Underline, VerticalAlignment, XfRecord,
};

// === Writing ===

/// Render the lists of a style table as `styles.xml`
pub(crate) fn write_styles_xml(styles: &StyleLists) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(
        "\n<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
    );

    if !styles.num_fmts.is_empty() {
        xml.push_str(&format!("\n  <numFmts count=\"{}\">", styles.num_fmts.len()));
        for (id, code) in &styles.num_fmts {
            xml.push_str(&format!(
                "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                id,
                escape_xml(code)
            ));
        }
        xml.push_str("\n  </numFmts>");
    }

    xml.push_str(&format!("\n  <fonts count=\"{}\">", styles.fonts.len()));
    for font in &styles.fonts {
        xml.push_str("\n    <font>");
        xml.push_str(&write_font_props(font, "name"));
        xml.push_str("</font>");
    }
    xml.push_str("\n  </fonts>");

    xml.push_str(&format!("\n  <fills count=\"{}\">", styles.fills.len()));
    for fill in &styles.fills {
        xml.push_str("\n    ");
        xml.push_str(&write_fill(fill));
    }
    xml.push_str("\n  </fills>");

    xml.push_str(&format!("\n  <borders count=\"{}\">", styles.borders.len()));
    for border in &styles.borders {
        xml.push_str("\n    ");
        xml.push_str(&write_border(border));
    }
    xml.push_str("\n  </borders>");

    xml.push_str(
        r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
    );

    xml.push_str(&format!("\n  <cellXfs count=\"{}\">", styles.cell_xfs.len()));
    for record in &styles.cell_xfs {
        xml.push_str("\n    ");
        xml.push_str(&write_xf(record));
    }
    xml.push_str("\n  </cellXfs>");

    xml.push_str(
        r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
    );
    xml
}

/// `<tag .../>` for a color; automatic colors are written as `auto="1"`
fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{tag} auto=\"1\"/>"),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!("<{tag} rgb=\"{}\"/>", color.to_argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!("<{tag} indexed=\"{}\"/>", i),
        Color::Theme { index, tint: 0 } => format!("<{tag} theme=\"{}\"/>", index),
        Color::Theme { index, tint } => format!(
            "<{tag} theme=\"{}\" tint=\"{}\"/>",
            index,
            f64::from(*tint) / 100.0
        ),
    }
}

/// Inner elements of a `<font>` or a rich-text `<rPr>`
///
/// The two differ only in the tag carrying the face name (`name` / `rFont`).
pub(crate) fn write_font_props(font: &FontStyle, name_tag: &str) -> String {
    let mut s = String::new();
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        Underline::Double => s.push_str("<u val=\"double\"/>"),
        Underline::SingleAccounting => s.push_str("<u val=\"singleAccounting\"/>"),
        Underline::DoubleAccounting => s.push_str("<u val=\"doubleAccounting\"/>"),
    }
    match font.vertical_align {
        FontVerticalAlign::Baseline => {}
        FontVerticalAlign::Superscript => s.push_str("<vertAlign val=\"superscript\"/>"),
        FontVerticalAlign::Subscript => s.push_str("<vertAlign val=\"subscript\"/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!(
        "<{name_tag} val=\"{}\"/>",
        escape_xml(&font.name)
    ));
    s
}

fn pattern_type_to_str(p: PatternType) -> &'static str {
    match p {
        PatternType::None => "none",
        PatternType::Solid => "solid",
        PatternType::MediumGray => "mediumGray",
        PatternType::DarkGray => "darkGray",
        PatternType::LightGray => "lightGray",
        PatternType::DarkHorizontal => "darkHorizontal",
        PatternType::DarkVertical => "darkVertical",
        PatternType::DarkDown => "darkDown",
        PatternType::DarkUp => "darkUp",
        PatternType::DarkGrid => "darkGrid",
        PatternType::DarkTrellis => "darkTrellis",
        PatternType::LightHorizontal => "lightHorizontal",
        PatternType::LightVertical => "lightVertical",
        PatternType::LightDown => "lightDown",
        PatternType::LightUp => "lightUp",
        PatternType::LightGrid => "lightGrid",
        PatternType::LightTrellis => "lightTrellis",
        PatternType::Gray125 => "gray125",
        PatternType::Gray0625 => "gray0625",
    }
}

fn write_pattern_fill(pattern: PatternType, foreground: &Color, background: &Color) -> String {
    let mut colors = String::new();
    if !foreground.is_auto() {
        colors.push_str(&write_color("fgColor", foreground));
    }
    if !background.is_auto() {
        colors.push_str(&write_color("bgColor", background));
    }
    let kind = pattern_type_to_str(pattern);
    if colors.is_empty() {
        format!("<fill><patternFill patternType=\"{kind}\"/></fill>")
    } else {
        format!("<fill><patternFill patternType=\"{kind}\">{colors}</patternFill></fill>")
    }
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => write_pattern_fill(PatternType::None, &Color::Auto, &Color::Auto),
        FillStyle::Solid { color } => write_pattern_fill(PatternType::Solid, color, &Color::Auto),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => write_pattern_fill(*pattern, foreground, background),
        FillStyle::Gradient {
            gradient_type,
            angle,
            stops,
        } => {
            let mut s = String::from("<fill><gradientFill");
            if *gradient_type == GradientType::Path {
                s.push_str(" type=\"path\"");
            }
            if *angle != 0.0 {
                s.push_str(&format!(" degree=\"{}\"", angle));
            }
            s.push('>');
            for stop in stops {
                s.push_str(&format!(
                    "<stop position=\"{}\">{}</stop>",
                    stop.position,
                    write_color("color", &stop.color)
                ));
            }
            s.push_str("</gradientFill></fill>");
            s
        }
    }
}

fn border_style_to_str(s: BorderLineStyle) -> &'static str {
    match s {
        BorderLineStyle::None => "none",
        BorderLineStyle::Thin => "thin",
        BorderLineStyle::Medium => "medium",
        BorderLineStyle::Thick => "thick",
        BorderLineStyle::Dashed => "dashed",
        BorderLineStyle::Dotted => "dotted",
        BorderLineStyle::Double => "double",
        BorderLineStyle::Hair => "hair",
        BorderLineStyle::MediumDashed => "mediumDashed",
        BorderLineStyle::DashDot => "dashDot",
        BorderLineStyle::MediumDashDot => "mediumDashDot",
        BorderLineStyle::DashDotDot => "dashDotDot",
        BorderLineStyle::MediumDashDotDot => "mediumDashDotDot",
        BorderLineStyle::SlantDashDot => "slantDashDot",
    }
}

fn write_border_edge(tag: &str, edge: Option<&BorderEdge>) -> String {
    match edge {
        None => format!("<{tag}/>"),
        Some(e) => format!(
            "<{tag} style=\"{}\">{}</{tag}>",
            border_style_to_str(e.style),
            write_color("color", &e.color)
        ),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border");
    let (up, down) = border.diagonal_direction.flags();
    if up {
        s.push_str(" diagonalUp=\"1\"");
    }
    if down {
        s.push_str(" diagonalDown=\"1\"");
    }
    s.push('>');
    s.push_str(&write_border_edge("left", border.left.as_ref()));
    s.push_str(&write_border_edge("right", border.right.as_ref()));
    s.push_str(&write_border_edge("top", border.top.as_ref()));
    s.push_str(&write_border_edge("bottom", border.bottom.as_ref()));
    s.push_str(&write_border_edge("diagonal", border.diagonal.as_ref()));
    s.push_str("</border>");
    s
}

fn horiz_to_str(h: HorizontalAlignment) -> &'static str {
    match h {
        HorizontalAlignment::General => "general",
        HorizontalAlignment::Left => "left",
        HorizontalAlignment::Center => "center",
        HorizontalAlignment::Right => "right",
        HorizontalAlignment::Fill => "fill",
        HorizontalAlignment::Justify => "justify",
        HorizontalAlignment::CenterContinuous => "centerContinuous",
        HorizontalAlignment::Distributed => "distributed",
    }
}

fn vert_to_str(v: VerticalAlignment) -> &'static str {
    match v {
        VerticalAlignment::Top => "top",
        VerticalAlignment::Center => "center",
        VerticalAlignment::Bottom => "bottom",
        VerticalAlignment::Justify => "justify",
        VerticalAlignment::Distributed => "distributed",
    }
}

/// Non-default attributes only; an all-default alignment is `<alignment/>`
fn write_alignment(al: &Alignment) -> String {
    let default = Alignment::default();
    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", horiz_to_str(al.horizontal)));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", vert_to_str(al.vertical)));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    if al.reading_order != ReadingOrder::ContextDependent {
        s.push_str(&format!(" readingOrder=\"{}\"", al.reading_order.code()));
    }
    s.push_str("/>");
    s
}

fn write_xf(record: &XfRecord) -> String {
    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"",
        record.num_fmt_id, record.font_id, record.fill_id, record.border_id
    );
    s.push_str(&format!(
        " applyNumberFormat=\"{}\" applyFont=\"{}\" applyFill=\"{}\" applyBorder=\"{}\" applyAlignment=\"{}\" applyProtection=\"{}\"",
        bool_attr(record.apply_number_format),
        bool_attr(record.apply_font),
        bool_attr(record.apply_fill),
        bool_attr(record.apply_border),
        bool_attr(record.alignment.is_some()),
        bool_attr(record.protection.is_some()),
    ));

    if record.alignment.is_none() && record.protection.is_none() {
        s.push_str("/>");
        return s;
    }

    s.push('>');
    if let Some(alignment) = &record.alignment {
        s.push_str(&write_alignment(alignment));
    }
    if let Some(p) = &record.protection {
        s.push_str(&format!(
            "<protection locked=\"{}\" hidden=\"{}\"/>",
            bool_attr(p.locked),
            bool_attr(p.hidden)
        ));
    }
    s.push_str("</xf>");
    s
}

// === Reading ===

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
    /// cellStyleXfs, dxfs and anything else whose children look alike
    Other,
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

#[derive(Debug, Default)]
struct FillBuilder {
    pattern: Option<PatternType>,
    foreground: Color,
    background: Color,
    gradient: Option<(GradientType, f64, Vec<GradientStop>)>,
    stop: Option<GradientStop>,
}

impl FillBuilder {
    fn finish(self) -> FillStyle {
        if let Some((gradient_type, angle, stops)) = self.gradient {
            return FillStyle::Gradient {
                gradient_type,
                angle,
                stops,
            };
        }
        match self.pattern.unwrap_or(PatternType::None) {
            PatternType::None => FillStyle::None,
            PatternType::Solid if self.background.is_auto() => FillStyle::Solid {
                color: self.foreground,
            },
            pattern => FillStyle::Pattern {
                pattern,
                foreground: self.foreground,
                background: self.background,
            },
        }
    }
}

#[derive(Debug, Default)]
struct XfBuilder {
    record: XfRecord,
    apply_number_format: Option<bool>,
    apply_font: Option<bool>,
    apply_fill: Option<bool>,
    apply_border: Option<bool>,
    apply_alignment: Option<bool>,
    apply_protection: Option<bool>,
    alignment: Option<Alignment>,
    protection: Option<Protection>,
}

impl XfBuilder {
    fn open(e: &BytesStart<'_>) -> Self {
        let record = XfRecord {
            num_fmt_id: attr_parse(e, b"numFmtId").unwrap_or(0),
            font_id: attr_parse(e, b"fontId").unwrap_or(0),
            fill_id: attr_parse(e, b"fillId").unwrap_or(0),
            border_id: attr_parse(e, b"borderId").unwrap_or(0),
            ..XfRecord::default()
        };
        Self {
            record,
            apply_number_format: attr_bool(e, b"applyNumberFormat"),
            apply_font: attr_bool(e, b"applyFont"),
            apply_fill: attr_bool(e, b"applyFill"),
            apply_border: attr_bool(e, b"applyBorder"),
            apply_alignment: attr_bool(e, b"applyAlignment"),
            apply_protection: attr_bool(e, b"applyProtection"),
            alignment: None,
            protection: None,
        }
    }

    // Without an explicit flag a facet counts as set when its id is
    // non-zero, or for the inline facets when the child element exists.
    fn finish(self) -> XfRecord {
        let mut record = self.record;
        record.apply_number_format = self.apply_number_format.unwrap_or(record.num_fmt_id != 0);
        record.apply_font = self.apply_font.unwrap_or(record.font_id != 0);
        record.apply_fill = self.apply_fill.unwrap_or(record.fill_id != 0);
        record.apply_border = self.apply_border.unwrap_or(record.border_id != 0);
        record.alignment = match self.apply_alignment {
            Some(false) => None,
            Some(true) => Some(self.alignment.unwrap_or_default()),
            None => self.alignment,
        };
        record.protection = match self.apply_protection {
            Some(false) => None,
            Some(true) => Some(self.protection.unwrap_or_default()),
            None => self.protection,
        };
        record
    }
}

#[derive(Debug)]
struct StylesReader {
    lists: StyleLists,
    depth: usize,
    section: Section,
    font: Option<FontStyle>,
    fill: Option<FillBuilder>,
    border: Option<BorderStyle>,
    edge: Option<Edge>,
    xf: Option<XfBuilder>,
}

impl StylesReader {
    fn new() -> Self {
        Self {
            lists: StyleLists::default(),
            depth: 0,
            section: Section::None,
            font: None,
            fill: None,
            border: None,
            edge: None,
            xf: None,
        }
    }

    // Sections are the children of the root element.
    fn open(&mut self, e: &BytesStart<'_>) {
        self.depth += 1;
        let local = e.local_name();
        let name = local.as_ref();
        if self.depth == 2 {
            self.section = match name {
                b"numFmts" => Section::NumFmts,
                b"fonts" => Section::Fonts,
                b"fills" => Section::Fills,
                b"borders" => Section::Borders,
                b"cellXfs" => Section::CellXfs,
                _ => Section::Other,
            };
            return;
        }

        match (self.section, name) {
            (Section::NumFmts, b"numFmt") => {
                if let (Some(id), Some(code)) =
                    (attr_parse::<u32>(e, b"numFmtId"), attr(e, b"formatCode"))
                {
                    self.lists.num_fmts.push((id, code));
                }
            }

            (Section::Fonts, b"font") => self.font = Some(FontStyle::default()),
            (Section::Fonts, _) => {
                if let Some(font) = self.font.as_mut() {
                    apply_font_element(font, name, e);
                }
            }

            (Section::Fills, b"fill") => self.fill = Some(FillBuilder::default()),
            (Section::Fills, _) => {
                if let Some(fill) = self.fill.as_mut() {
                    open_fill_element(fill, name, e);
                }
            }

            (Section::Borders, b"border") => {
                let up = attr_bool(e, b"diagonalUp").unwrap_or(false);
                let down = attr_bool(e, b"diagonalDown").unwrap_or(false);
                self.border = Some(BorderStyle {
                    diagonal_direction: DiagonalDirection::from_flags(up, down),
                    ..BorderStyle::default()
                });
            }
            (Section::Borders, b"left" | b"start") => self.open_edge(Edge::Left, e),
            (Section::Borders, b"right" | b"end") => self.open_edge(Edge::Right, e),
            (Section::Borders, b"top") => self.open_edge(Edge::Top, e),
            (Section::Borders, b"bottom") => self.open_edge(Edge::Bottom, e),
            (Section::Borders, b"diagonal") => self.open_edge(Edge::Diagonal, e),
            (Section::Borders, b"color") => {
                if let (Some(border), Some(edge)) = (self.border.as_mut(), self.edge) {
                    if let Some(slot) = edge_slot(border, edge).as_mut() {
                        slot.color = parse_color(e);
                    }
                }
            }

            (Section::CellXfs, b"xf") => self.xf = Some(XfBuilder::open(e)),
            (Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = Some(parse_alignment(e));
                }
            }
            (Section::CellXfs, b"protection") => {
                if let Some(xf) = self.xf.as_mut() {
                    let default = Protection::default();
                    xf.protection = Some(Protection {
                        locked: attr_bool(e, b"locked").unwrap_or(default.locked),
                        hidden: attr_bool(e, b"hidden").unwrap_or(default.hidden),
                    });
                }
            }

            _ => {}
        }
    }

    fn open_edge(&mut self, edge: Edge, e: &BytesStart<'_>) {
        self.edge = Some(edge);
        let Some(border) = self.border.as_mut() else {
            return;
        };
        if let Some(style) = attr(e, b"style").and_then(|v| str_to_border_style(&v)) {
            *edge_slot(border, edge) = Some(BorderEdge {
                style,
                color: Color::Auto,
            });
        }
    }

    fn close(&mut self, name: &[u8]) {
        match (self.section, name) {
            (Section::Fonts, b"font") => {
                if let Some(font) = self.font.take() {
                    self.lists.fonts.push(font);
                }
            }
            (Section::Fills, b"fill") => {
                if let Some(fill) = self.fill.take() {
                    self.lists.fills.push(fill.finish());
                }
            }
            (Section::Fills, b"stop") => {
                if let Some(fill) = self.fill.as_mut() {
                    if let (Some(stop), Some((_, _, stops))) =
                        (fill.stop.take(), fill.gradient.as_mut())
                    {
                        stops.push(stop);
                    }
                }
            }
            (Section::Borders, b"border") => {
                if let Some(border) = self.border.take() {
                    self.lists.borders.push(border);
                }
                self.edge = None;
            }
            (Section::Borders, b"left" | b"start" | b"right" | b"end" | b"top" | b"bottom")
            | (Section::Borders, b"diagonal") => self.edge = None,
            (Section::CellXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.lists.cell_xfs.push(xf.finish());
                }
            }
            _ => {}
        }

        if self.depth == 2 {
            self.section = Section::None;
        }
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Read `styles.xml` into its persisted lists
///
/// Cross-references are not checked here; that happens when the lists are
/// turned into a [`StyleTable`](sheetcraft_core::StyleTable).
pub(crate) fn read_styles_xml<R: BufRead>(reader: R, part: &str) -> XlsxResult<StyleLists> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut state = StylesReader::new();
    let mut buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.open(&e),
            Ok(Event::Empty(e)) => {
                state.open(&e);
                state.close(e.local_name().as_ref());
            }
            Ok(Event::End(e)) => state.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(part)(e)),
            _ => {}
        }
        buf.clear();
    }

    log::trace!(
        "{}: {} number formats, {} fonts, {} fills, {} borders, {} cell formats",
        part,
        state.lists.num_fmts.len(),
        state.lists.fonts.len(),
        state.lists.fills.len(),
        state.lists.borders.len(),
        state.lists.cell_xfs.len()
    );
    Ok(state.lists)
}

/// Apply one child element of `<font>` or `<rPr>`
pub(crate) fn apply_font_element(font: &mut FontStyle, name: &[u8], e: &BytesStart<'_>) {
    let flag = || attr(e, b"val").map_or(true, |v| parse_bool(&v));
    match name {
        b"b" => font.bold = flag(),
        b"i" => font.italic = flag(),
        b"strike" => font.strikethrough = flag(),
        b"u" => font.underline = str_to_underline(attr(e, b"val").as_deref()),
        b"vertAlign" => {
            font.vertical_align = match attr(e, b"val").as_deref() {
                Some("superscript") => FontVerticalAlign::Superscript,
                Some("subscript") => FontVerticalAlign::Subscript,
                _ => FontVerticalAlign::Baseline,
            }
        }
        b"sz" => {
            if let Some(size) = attr_parse(e, b"val") {
                font.size = size;
            }
        }
        b"name" | b"rFont" => {
            if let Some(v) = attr(e, b"val") {
                font.name = v;
            }
        }
        b"color" => font.color = parse_color(e),
        _ => {}
    }
}

fn open_fill_element(fill: &mut FillBuilder, name: &[u8], e: &BytesStart<'_>) {
    match name {
        b"patternFill" => {
            fill.pattern = attr(e, b"patternType").and_then(|v| str_to_pattern_type(&v));
        }
        b"fgColor" => fill.foreground = parse_color(e),
        b"bgColor" => fill.background = parse_color(e),
        b"gradientFill" => {
            let gradient_type = match attr(e, b"type").as_deref() {
                Some("path") => GradientType::Path,
                _ => GradientType::Linear,
            };
            fill.gradient = Some((gradient_type, attr_parse(e, b"degree").unwrap_or(0.0), vec![]));
        }
        b"stop" => {
            fill.stop = Some(GradientStop::new(
                attr_parse(e, b"position").unwrap_or(0.0),
                Color::Auto,
            ));
        }
        b"color" => {
            if let Some(stop) = fill.stop.as_mut() {
                stop.color = parse_color(e);
            }
        }
        _ => {}
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> Alignment {
    let mut align = Alignment::default();
    if let Some(h) = attr(e, b"horizontal").and_then(|v| str_to_horizontal(&v)) {
        align.horizontal = h;
    }
    if let Some(v) = attr(e, b"vertical").and_then(|v| str_to_vertical(&v)) {
        align.vertical = v;
    }
    align.wrap_text = attr_bool(e, b"wrapText").unwrap_or(false);
    align.shrink_to_fit = attr_bool(e, b"shrinkToFit").unwrap_or(false);
    align.indent = attr_parse(e, b"indent").unwrap_or(0);
    align.rotation = attr_parse(e, b"textRotation").unwrap_or(0);
    align.reading_order = ReadingOrder::from_code(attr_parse(e, b"readingOrder").unwrap_or(0));
    align
}

/// Color from `rgb`/`theme`/`indexed`/`auto` attributes, in that priority
pub(crate) fn parse_color(e: &BytesStart<'_>) -> Color {
    if let Some(color) = attr(e, b"rgb").and_then(|v| Color::from_hex(&v)) {
        return color;
    }
    if let Some(index) = attr_parse::<u8>(e, b"theme") {
        let tint = attr_parse::<f64>(e, b"tint")
            .map(|t| (t * 100.0).round().clamp(-100.0, 100.0) as i8)
            .unwrap_or(0);
        return Color::Theme { index, tint };
    }
    if let Some(i) = attr_parse::<u8>(e, b"indexed") {
        return Color::Indexed(i);
    }
    Color::Auto
}

fn edge_slot(border: &mut BorderStyle, edge: Edge) -> &mut Option<BorderEdge> {
    match edge {
        Edge::Left => &mut border.left,
        Edge::Right => &mut border.right,
        Edge::Top => &mut border.top,
        Edge::Bottom => &mut border.bottom,
        Edge::Diagonal => &mut border.diagonal,
    }
}

fn str_to_pattern_type(s: &str) -> Option<PatternType> {
    Some(match s {
        "none" => PatternType::None,
        "solid" => PatternType::Solid,
        "mediumGray" => PatternType::MediumGray,
        "darkGray" => PatternType::DarkGray,
        "lightGray" => PatternType::LightGray,
        "darkHorizontal" => PatternType::DarkHorizontal,
        "darkVertical" => PatternType::DarkVertical,
        "darkDown" => PatternType::DarkDown,
        "darkUp" => PatternType::DarkUp,
        "darkGrid" => PatternType::DarkGrid,
        "darkTrellis" => PatternType::DarkTrellis,
        "lightHorizontal" => PatternType::LightHorizontal,
        "lightVertical" => PatternType::LightVertical,
        "lightDown" => PatternType::LightDown,
        "lightUp" => PatternType::LightUp,
        "lightGrid" => PatternType::LightGrid,
        "lightTrellis" => PatternType::LightTrellis,
        "gray125" => PatternType::Gray125,
        "gray0625" => PatternType::Gray0625,
        _ => return None,
    })
}

fn str_to_border_style(s: &str) -> Option<BorderLineStyle> {
    Some(match s {
        "none" => BorderLineStyle::None,
        "thin" => BorderLineStyle::Thin,
        "medium" => BorderLineStyle::Medium,
        "thick" => BorderLineStyle::Thick,
        "dashed" => BorderLineStyle::Dashed,
        "dotted" => BorderLineStyle::Dotted,
        "double" => BorderLineStyle::Double,
        "hair" => BorderLineStyle::Hair,
        "mediumDashed" => BorderLineStyle::MediumDashed,
        "dashDot" => BorderLineStyle::DashDot,
        "mediumDashDot" => BorderLineStyle::MediumDashDot,
        "dashDotDot" => BorderLineStyle::DashDotDot,
        "mediumDashDotDot" => BorderLineStyle::MediumDashDotDot,
        "slantDashDot" => BorderLineStyle::SlantDashDot,
        _ => return None,
    })
}

fn str_to_horizontal(s: &str) -> Option<HorizontalAlignment> {
    Some(match s {
        "general" => HorizontalAlignment::General,
        "left" => HorizontalAlignment::Left,
        "center" => HorizontalAlignment::Center,
        "right" => HorizontalAlignment::Right,
        "fill" => HorizontalAlignment::Fill,
        "justify" => HorizontalAlignment::Justify,
        "centerContinuous" => HorizontalAlignment::CenterContinuous,
        "distributed" => HorizontalAlignment::Distributed,
        _ => return None,
    })
}

fn str_to_vertical(s: &str) -> Option<VerticalAlignment> {
    Some(match s {
        "top" => VerticalAlignment::Top,
        "center" => VerticalAlignment::Center,
        "bottom" => VerticalAlignment::Bottom,
        "justify" => VerticalAlignment::Justify,
        "distributed" => VerticalAlignment::Distributed,
        _ => return None,
    })
}

fn str_to_underline(s: Option<&str>) -> Underline {
    match s {
        Some("none") => Underline::None,
        Some("double") => Underline::Double,
        Some("singleAccounting") => Underline::SingleAccounting,
        Some("doubleAccounting") => Underline::DoubleAccounting,
        _ => Underline::Single,
    }
}
