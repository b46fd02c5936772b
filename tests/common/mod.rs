#![allow(dead_code)]

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Cursor, Read};

pub const SAMPLE_CSV: &str = "Name,Gender\nAlice,F\nBob,M\n,\n";

pub fn read_entry(xlsx: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    Some(content)
}

fn attribute(event: &BytesStart<'_>, key: &str) -> Option<String> {
    event
        .try_get_attribute(key)
        .unwrap()
        .map(|attr| String::from_utf8(attr.value.to_vec()).unwrap())
}

fn column_index(cell_ref: &str) -> usize {
    cell_ref
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .fold(0, |acc, c| acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1))
        - 1
}

fn shared_strings(xlsx: &[u8]) -> Vec<String> {
    let Some(xml) = read_entry(xlsx, "xl/sharedStrings.xml") else {
        return Vec::new();
    };
    let mut reader = Reader::from_str(&xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"si" => current.clear(),
            Event::End(e) if e.name().as_ref() == b"si" => strings.push(current.clone()),
            Event::Start(e) if e.name().as_ref() == b"t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"t" => in_text = false,
            Event::Text(t) if in_text => current.push_str(&t.xml_content().unwrap()),
            Event::Eof => break,
            _ => {}
        }
    }
    strings
}

/// Decodes the first worksheet into rows of cell text, padded to equal width.
pub fn read_first_sheet(xlsx: &[u8]) -> Vec<Vec<String>> {
    let strings = shared_strings(xlsx);
    let xml = read_entry(xlsx, "xl/worksheets/sheet1.xml").unwrap();
    let mut reader = Reader::from_str(&xml);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<(usize, Option<String>)> = None;
    let mut value = String::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"row" => row = Vec::new(),
            Event::End(e) if e.name().as_ref() == b"row" => rows.push(std::mem::take(&mut row)),
            Event::Start(e) if e.name().as_ref() == b"c" => {
                let col = column_index(&attribute(&e, "r").unwrap());
                cell = Some((col, attribute(&e, "t")));
                value.clear();
            }
            Event::Text(t) if cell.is_some() => value.push_str(&t.xml_content().unwrap()),
            Event::End(e) if e.name().as_ref() == b"c" => {
                let (col, kind) = cell.take().unwrap();
                let text = match kind.as_deref() {
                    Some("s") => strings[value.parse::<usize>().unwrap()].clone(),
                    _ => value.clone(),
                };
                if row.len() <= col {
                    row.resize(col + 1, String::new());
                }
                row[col] = text;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
