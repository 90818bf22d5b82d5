//! Minimal Office Open XML spreadsheet writer.
//!
//! Produces a `.xlsx` package (zip of XML parts) with one worksheet per
//! [`Sheet`]. Every cell is written as an inline string so IMEIs and
//! formatted dates are never reinterpreted as numbers.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, Result};

/// SpreadsheetML main namespace.
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Office document relationships namespace.
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const WORKSHEET_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

const STYLES_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

/// Longest sheet name the format accepts.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Named grid of string cells. Rows may differ in width; empty rows are kept
/// as spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Ordered collection of sheets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Serialize the workbook into `.xlsx` bytes.
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        for sheet in &self.sheets {
            validate_sheet_name(&sheet.name)?;
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(&self.content_types()?)?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;
        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(&self.workbook_xml()?)?;
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(&self.workbook_rels()?)?;
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;
        for (index, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
            zip.write_all(&worksheet_xml(sheet)?)?;
        }

        let bytes = zip.finish()?.into_inner();
        debug!(sheets = self.sheets.len(), bytes = bytes.len(), "workbook packaged");
        Ok(bytes)
    }

    fn content_types(&self) -> Result<Vec<u8>> {
        let mut xml = xml_writer()?;
        let mut root = BytesStart::new("Types");
        root.push_attribute((
            "xmlns",
            "http://schemas.openxmlformats.org/package/2006/content-types",
        ));
        xml.write_event(Event::Start(root))?;

        let mut rels = BytesStart::new("Default");
        rels.push_attribute(("Extension", "rels"));
        rels.push_attribute((
            "ContentType",
            "application/vnd.openxmlformats-package.relationships+xml",
        ));
        xml.write_event(Event::Empty(rels))?;

        let mut plain = BytesStart::new("Default");
        plain.push_attribute(("Extension", "xml"));
        plain.push_attribute(("ContentType", "application/xml"));
        xml.write_event(Event::Empty(plain))?;

        write_override(
            &mut xml,
            "/xl/workbook.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        )?;
        write_override(
            &mut xml,
            "/xl/styles.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
        )?;
        for index in 1..=self.sheets.len() {
            write_override(
                &mut xml,
                &format!("/xl/worksheets/sheet{index}.xml"),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
            )?;
        }

        xml.write_event(Event::End(BytesEnd::new("Types")))?;
        Ok(xml.into_inner())
    }

    fn workbook_xml(&self) -> Result<Vec<u8>> {
        let mut xml = xml_writer()?;
        let mut root = BytesStart::new("workbook");
        root.push_attribute(("xmlns", MAIN_NS));
        root.push_attribute(("xmlns:r", REL_NS));
        xml.write_event(Event::Start(root))?;
        xml.write_event(Event::Start(BytesStart::new("sheets")))?;
        for (index, sheet) in self.sheets.iter().enumerate() {
            let sheet_id = (index + 1).to_string();
            let rel_id = format!("rId{}", index + 1);
            let mut element = BytesStart::new("sheet");
            element.push_attribute(("name", sheet.name.as_str()));
            element.push_attribute(("sheetId", sheet_id.as_str()));
            element.push_attribute(("r:id", rel_id.as_str()));
            xml.write_event(Event::Empty(element))?;
        }
        xml.write_event(Event::End(BytesEnd::new("sheets")))?;
        xml.write_event(Event::End(BytesEnd::new("workbook")))?;
        Ok(xml.into_inner())
    }

    fn workbook_rels(&self) -> Result<Vec<u8>> {
        let mut xml = xml_writer()?;
        let mut root = BytesStart::new("Relationships");
        root.push_attribute(("xmlns", PACKAGE_REL_NS));
        xml.write_event(Event::Start(root))?;
        for index in 1..=self.sheets.len() {
            write_relationship(
                &mut xml,
                &format!("rId{index}"),
                WORKSHEET_REL_TYPE,
                &format!("worksheets/sheet{index}.xml"),
            )?;
        }
        // Styles take the id after the last worksheet.
        write_relationship(
            &mut xml,
            &format!("rId{}", self.sheets.len() + 1),
            STYLES_REL_TYPE,
            "styles.xml",
        )?;
        xml.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(xml.into_inner())
    }
}

fn xml_writer() -> Result<Writer<Vec<u8>>> {
    let mut xml = Writer::new(Vec::new());
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(xml)
}

fn write_override(xml: &mut Writer<Vec<u8>>, part: &str, content_type: &str) -> Result<()> {
    let mut element = BytesStart::new("Override");
    element.push_attribute(("PartName", part));
    element.push_attribute(("ContentType", content_type));
    xml.write_event(Event::Empty(element))?;
    Ok(())
}

fn write_relationship(
    xml: &mut Writer<Vec<u8>>,
    id: &str,
    rel_type: &str,
    target: &str,
) -> Result<()> {
    let mut element = BytesStart::new("Relationship");
    element.push_attribute(("Id", id));
    element.push_attribute(("Type", rel_type));
    element.push_attribute(("Target", target));
    xml.write_event(Event::Empty(element))?;
    Ok(())
}

fn worksheet_xml(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut xml = xml_writer()?;
    let mut root = BytesStart::new("worksheet");
    root.push_attribute(("xmlns", MAIN_NS));
    xml.write_event(Event::Start(root))?;
    xml.write_event(Event::Start(BytesStart::new("sheetData")))?;

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        let row_number = row_idx + 1;
        let row_ref = row_number.to_string();
        let mut row_start = BytesStart::new("row");
        row_start.push_attribute(("r", row_ref.as_str()));
        xml.write_event(Event::Start(row_start))?;

        for (col_idx, value) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_number}", column_name(col_idx));
            let mut cell = BytesStart::new("c");
            cell.push_attribute(("r", cell_ref.as_str()));
            cell.push_attribute(("t", "inlineStr"));
            xml.write_event(Event::Start(cell))?;
            xml.write_event(Event::Start(BytesStart::new("is")))?;
            let mut text = BytesStart::new("t");
            if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
                text.push_attribute(("xml:space", "preserve"));
            }
            xml.write_event(Event::Start(text))?;
            xml.write_event(Event::Text(BytesText::new(value)))?;
            xml.write_event(Event::End(BytesEnd::new("t")))?;
            xml.write_event(Event::End(BytesEnd::new("is")))?;
            xml.write_event(Event::End(BytesEnd::new("c")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("row")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("sheetData")))?;
    xml.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(xml.into_inner())
}

/// Spreadsheet column letters for a zero-based index (`0 -> A`, `26 -> AA`).
pub fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.chars().count() > MAX_SHEET_NAME_CHARS
        || name.contains(['[', ']', ':', '*', '?', '/', '\\'])
        || name.starts_with('\'')
        || name.ends_with('\'');
    if invalid {
        return Err(ExportError::SheetName(name.to_string()));
    }
    Ok(())
}
