//! PDF outline (bookmark) entries for report sections, written with `lopdf`.
//!
//! `genpdf` has no outline support, so the rendered bytes are reopened and a
//! flat `/Outlines` tree is attached to the catalog: one entry per section,
//! titled with the section heading and pointing at its first page.

use std::collections::BTreeMap;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};
use thiserror::Error;

use crate::model::Section;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    #[error("Failed to process PDF bytes: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A section recorded a page the document does not have.
    #[error("Section '{title}' starts on page {page}, which the document does not contain")]
    MissingPage { title: String, page: usize },
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

/// Encodes `text` as a PDF text string.
///
/// ASCII stays a literal string; anything else is written as UTF-16BE with a
/// byte order mark so viewers show accented titles correctly.
pub fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Adds one outline entry per section that has a recorded start page.
///
/// `section_pages` is parallel to `sections`. Sections without a page are
/// skipped; when none has one the input is returned unchanged.
pub fn apply_section_bookmarks(
    pdf_bytes: &[u8],
    sections: &[Section],
    section_pages: &[Option<usize>],
) -> Result<Vec<u8>, BookmarkError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let targets = resolve_targets(&document.get_pages(), sections, section_pages)?;
    if targets.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let root_id = document.new_object_id();
    let entry_ids: Vec<ObjectId> = targets.iter().map(|_| document.new_object_id()).collect();

    for (index, target) in targets.iter().enumerate() {
        let mut entry = dictionary! {
            "Title" => pdf_text_string(target.section.title()),
            "Parent" => root_id,
            "Dest" => vec![Object::Reference(target.page_id), "Fit".into()],
        };
        if let Some(name) = target.section.identifier() {
            entry.set("NM", Object::string_literal(name));
        }
        if let Some(previous) = index.checked_sub(1) {
            entry.set("Prev", entry_ids[previous]);
        }
        if let Some(next) = entry_ids.get(index + 1) {
            entry.set("Next", *next);
        }
        document.objects.insert(entry_ids[index], Object::Dictionary(entry));
    }

    let root = dictionary! {
        "Type" => "Outlines",
        "Count" => entry_ids.len() as i64,
        "First" => entry_ids[0],
        "Last" => entry_ids[entry_ids.len() - 1],
    };
    document.objects.insert(root_id, Object::Dictionary(root));

    let catalog = catalog_mut(&mut document)?;
    catalog.set("Outlines", root_id);
    catalog.set("PageMode", "UseOutlines");

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct Target<'a> {
    section: &'a Section,
    page_id: ObjectId,
}

fn resolve_targets<'a>(
    pages: &BTreeMap<u32, ObjectId>,
    sections: &'a [Section],
    section_pages: &[Option<usize>],
) -> Result<Vec<Target<'a>>, BookmarkError> {
    sections
        .iter()
        .zip(section_pages)
        .filter_map(|(section, page)| page.map(|page| (section, page)))
        .map(|(section, page)| {
            u32::try_from(page)
                .ok()
                .and_then(|number| pages.get(&number).copied())
                .map(|page_id| Target { section, page_id })
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: section.title().to_string(),
                    page,
                })
        })
        .collect()
}

fn catalog_mut(document: &mut Document) -> Result<&mut Dictionary, BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)
}
