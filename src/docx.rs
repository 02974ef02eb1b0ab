//! Plain-text extraction from `.docx` documents
//!
//! A `.docx` file is a zip archive whose main part, `word/document.xml`,
//! holds the body as a sequence of `w:p` paragraphs. Only paragraphs that are
//! direct children of `w:body` count; paragraphs nested inside tables,
//! text boxes or other containers are skipped. Paragraph text comes from
//! runs (`w:r`) directly under the paragraph or under one of its
//! `w:hyperlink` children; runs wrapped in tracked changes, content controls
//! or drawings do not contribute.

use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{Error, Result};

const DOCUMENT_PART: &str = "word/document.xml";

/// Read the body paragraphs of a `.docx` file, in document order
///
/// # Errors
///
/// Returns `Error::Document` if the file is missing, is not a zip archive,
/// has no main document part, or contains malformed XML
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Document(format!("failed to open {}: {e}", path.display())))?;
    paragraphs_from_archive(file)
}

/// Read body paragraphs from any seekable `.docx` byte source
///
/// # Errors
///
/// Same as [`read_paragraphs`]
pub fn paragraphs_from_archive<R: Read + Seek>(source: R) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(source)
        .map_err(|e| Error::Document(format!("not a docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| Error::Document(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| Error::Document(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    paragraphs_from_xml(&xml)
}

/// Extract body paragraph texts from a `word/document.xml` payload
///
/// # Errors
///
/// Returns `Error::Document` on malformed XML
pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    // Element path from the root, by local name
    let mut path: Vec<Vec<u8>> = Vec::new();
    // Open body paragraph: its depth in `path` and the text so far
    let mut paragraph: Option<(usize, String)> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"p" if paragraph.is_none() && is_body_child(&path) => {
                        paragraph = Some((path.len(), String::new()));
                    }
                    b"t" => {
                        in_text = paragraph
                            .as_ref()
                            .is_some_and(|(depth, _)| in_run(&path, *depth));
                    }
                    _ => {}
                }
                path.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if let Some((depth, text)) = paragraph.as_mut() {
                    match name.as_ref() {
                        b"tab" if in_run(&path, *depth) => text.push('\t'),
                        b"br" | b"cr" if in_run(&path, *depth) => text.push('\n'),
                        _ => {}
                    }
                } else if name.as_ref() == b"p" && is_body_child(&path) {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(e)) if in_text => {
                let chunk = e
                    .unescape()
                    .map_err(|e| Error::Document(format!("bad text run: {e}")))?;
                if let Some((_, text)) = paragraph.as_mut() {
                    text.push_str(&chunk);
                }
            }
            Ok(Event::CData(e)) if in_text => {
                if let Some((_, text)) = paragraph.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(e)) => {
                path.pop();
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if is_body_child(&path) => {
                        if let Some((_, text)) = paragraph.take() {
                            paragraphs.push(text);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Document(format!(
                    "malformed document xml at {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    Ok(paragraphs)
}

/// Whether an element opened at `path` would be a direct child of `w:body`
fn is_body_child(path: &[Vec<u8>]) -> bool {
    path.last().is_some_and(|parent| parent.as_slice() == b"body")
}

/// Whether the innermost open element is a run belonging to the paragraph at `depth`
fn in_run(path: &[Vec<u8>], depth: usize) -> bool {
    match path.get(depth + 1..) {
        Some([run]) => run.as_slice() == b"r",
        Some([link, run]) => link.as_slice() == b"hyperlink" && run.as_slice() == b"r",
        _ => false,
    }
}
