//! Shared string table (sharedStrings.xml)

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::document::SharedStringItem;
use crate::error::{XlsxError, XlsxResult};
use crate::styles::{apply_font_element, write_font_props};
use crate::xml::{decode_excel_escapes, encode_excel_escapes, XML_HEADER};
use sheetcraft_core::{FontStyle, RichText, RichTextRun};

/// Deduplicating builder for the shared string list
#[derive(Debug, Default)]
pub(crate) struct SharedStrings {
    items: Vec<SharedStringItem>,
    index: HashMap<SharedStringItem, u32>,
}

impl SharedStrings {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn intern(&mut self, item: SharedStringItem) -> u32 {
        if let Some(&id) = self.index.get(&item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.items.push(item.clone());
        self.index.insert(item, id);
        id
    }

    pub(crate) fn into_items(self) -> Vec<SharedStringItem> {
        self.items
    }
}

fn write_text(s: &mut String, text: &str) {
    s.push_str("<t xml:space=\"preserve\">");
    s.push_str(&encode_excel_escapes(text));
    s.push_str("</t>");
}

/// Render `sharedStrings.xml`
pub(crate) fn write_shared_strings_xml(items: &[SharedStringItem], references: usize) -> String {
    let mut xml = String::from(XML_HEADER);
    xml.push_str(&format!(
        "\n<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{}\" uniqueCount=\"{}\">",
        references.max(items.len()),
        items.len()
    ));

    for item in items {
        xml.push_str("\n  <si>");
        match item {
            SharedStringItem::Plain(text) => write_text(&mut xml, text),
            // A lone empty run keeps an empty rich value apart from ""
            SharedStringItem::Rich(rich) if rich.is_empty() => {
                xml.push_str("<r>");
                write_text(&mut xml, "");
                xml.push_str("</r>");
            }
            SharedStringItem::Rich(rich) => {
                for run in rich.runs() {
                    xml.push_str("<r>");
                    if let Some(font) = &run.font {
                        xml.push_str("<rPr>");
                        xml.push_str(&write_font_props(font, "rFont"));
                        xml.push_str("</rPr>");
                    }
                    write_text(&mut xml, &run.text);
                    xml.push_str("</r>");
                }
            }
        }
        xml.push_str("</si>");
    }

    xml.push_str("\n</sst>");
    xml
}

/// Read `sharedStrings.xml`
///
/// An `<si>` holding only a `<t>` is plain text; one with `<r>` runs is rich
/// text, even if every run is empty. Phonetic hints (`<rPh>`) are skipped.
pub(crate) fn read_shared_strings_xml<R: BufRead>(
    reader: R,
    part: &str,
) -> XlsxResult<Vec<SharedStringItem>> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut items = Vec::new();

    let mut plain = String::new();
    let mut runs: Vec<RichTextRun> = Vec::new();
    let mut run: Option<RichTextRun> = None;
    let mut run_font: Option<FontStyle> = None;
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    plain.clear();
                    runs.clear();
                }
                b"rPh" => in_phonetic = true,
                b"r" if in_si && !in_phonetic => run = Some(RichTextRun::new("")),
                b"rPr" if run.is_some() => run_font = Some(FontStyle::default()),
                b"t" if in_si && !in_phonetic => in_t = true,
                name => {
                    if let Some(font) = run_font.as_mut() {
                        apply_font_element(font, name, &e);
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if let Some(font) = run_font.as_mut() {
                    apply_font_element(font, e.local_name().as_ref(), &e);
                }
            }
            Ok(Event::Text(e)) if in_t => {
                let text = e
                    .unescape()
                    .map_err(XlsxError::xml(part))?;
                let text = decode_excel_escapes(&text);
                match run.as_mut() {
                    Some(r) => r.text.push_str(&text),
                    None => plain.push_str(&text),
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_t = false,
                b"rPh" => in_phonetic = false,
                b"rPr" => {
                    if let Some(r) = run.as_mut() {
                        r.font = run_font.take();
                    }
                }
                b"r" => {
                    if let Some(r) = run.take() {
                        runs.push(r);
                    }
                }
                b"si" => {
                    let item = if runs.is_empty() {
                        SharedStringItem::Plain(std::mem::take(&mut plain))
                    } else {
                        SharedStringItem::Rich(RichText::from_runs(std::mem::take(&mut runs)))
                    };
                    items.push(item);
                    in_si = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::xml(part)(e)),
            _ => {}
        }
        buf.clear();
    }

    log::trace!("{}: {} strings", part, items.len());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheetcraft_core::{Color, FontVerticalAlign};

    #[test]
    fn test_intern_dedups() {
        let mut strings = SharedStrings::new();
        let a = strings.intern(SharedStringItem::Plain("apple".into()));
        let b = strings.intern(SharedStringItem::Plain("pear".into()));
        let again = strings.intern(SharedStringItem::Plain("apple".into()));
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(strings.into_items().len(), 2);
    }

    #[test]
    fn test_plain_and_rich_are_distinct_entries() {
        let mut strings = SharedStrings::new();
        let plain = strings.intern(SharedStringItem::Plain("Hi".into()));
        let rich = strings.intern(SharedStringItem::Rich(
            RichText::new().push("H", None).push("i", None),
        ));
        assert_ne!(plain, rich);
    }

    #[test]
    fn test_rich_text_through_markup() {
        let bold_red = FontStyle::new().with_bold(true).with_color(Color::RED);
        let items = vec![
            SharedStringItem::Plain("  padded  ".into()),
            SharedStringItem::Rich(
                RichText::new()
                    .push("x", None)
                    .push("2", Some(FontStyle::new().with_vertical_align(FontVerticalAlign::Superscript)))
                    .push(" & more", Some(bold_red)),
            ),
            SharedStringItem::Plain("line\nbreak _x0041_".into()),
        ];

        let xml = write_shared_strings_xml(&items, 3);
        let read_back = read_shared_strings_xml(xml.as_bytes(), "xl/sharedStrings.xml").unwrap();
        assert_eq!(read_back, items);
        assert_eq!(read_back[1].plain_text(), "x2 & more");
    }

    #[test]
    fn test_empty_rich_text_stays_rich() {
        let items = vec![
            SharedStringItem::Rich(RichText::new()),
            SharedStringItem::Plain(String::new()),
        ];

        let xml = write_shared_strings_xml(&items, 2);
        assert!(xml.contains("<si><r><t xml:space=\"preserve\"></t></r></si>"));
        let read_back = read_shared_strings_xml(xml.as_bytes(), "xl/sharedStrings.xml").unwrap();
        assert_eq!(read_back, items);
    }

    #[test]
    fn test_self_closed_empty_run_is_rich() {
        let xml = r#"<sst><si><r><rPr><b/></rPr><t/></r></si><si><t/></si></sst>"#;
        let items = read_shared_strings_xml(xml.as_bytes(), "xl/sharedStrings.xml").unwrap();
        assert_eq!(
            items,
            vec![
                SharedStringItem::Rich(RichText::new()),
                SharedStringItem::Plain(String::new()),
            ]
        );
    }

    #[test]
    fn test_phonetic_runs_skipped() {
        let xml = r#"<sst><si><t>漢字</t><rPh sb="0" eb="2"><t>かんじ</t></rPh></si></sst>"#;
        let items = read_shared_strings_xml(xml.as_bytes(), "xl/sharedStrings.xml").unwrap();
        assert_eq!(items, vec![SharedStringItem::Plain("漢字".into())]);
    }
}
