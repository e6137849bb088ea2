//! Data structures describing the logical content of a report.
//!
//! The types in this module mirror the building blocks rendered through
//! `genpdf` without referencing its elements directly, so a report can be
//! assembled and inspected (for example in tests) without loading fonts.

use crate::richtext::Span;

/// Horizontal alignment of a paragraph.
///
/// The variants map directly to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
}

/// Rich text paragraph carrying inline styling information and alignment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans using left alignment.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Returns the unstyled text of the paragraph.
    pub fn text(&self) -> String {
        crate::richtext::plain_text(&self.spans)
    }
}

/// Two-column table of labelled values, such as the applicant summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTable {
    rows: Vec<(String, String)>,
    label_weight: usize,
    value_weight: usize,
}

impl FieldTable {
    /// Creates an empty table whose columns are split `label_weight : value_weight`.
    pub fn new(label_weight: usize, value_weight: usize) -> Self {
        Self {
            rows: Vec::new(),
            label_weight,
            value_weight,
        }
    }

    /// Appends a labelled row and returns the updated table.
    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    /// Returns the `(label, value)` rows.
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    /// Returns the value of the first row labelled `label`.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the relative column widths.
    pub fn column_weights(&self) -> Vec<usize> {
        vec![self.label_weight, self.value_weight]
    }
}

/// Table with a header row followed by data rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    column_weights: Vec<usize>,
}

impl DataTable {
    /// Creates a table with the given header labels and relative column widths.
    ///
    /// Missing weights default to `1`; extra weights are ignored.
    pub fn new<I, S>(header: I, column_weights: &[usize]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        let column_weights = (0..header.len())
            .map(|index| column_weights.get(index).copied().unwrap_or(1).max(1))
            .collect();
        Self {
            header,
            rows: Vec::new(),
            column_weights,
        }
    }

    /// Appends a data row, padding or truncating it to the header width.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    /// Returns the header labels.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Returns the data rows, excluding the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the relative column widths.
    pub fn column_weights(&self) -> &[usize] {
        &self.column_weights
    }
}

/// Individual content blocks that make up a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Labelled values.
    Fields(FieldTable),
    /// Header plus data rows.
    Table(DataTable),
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(spans: impl Into<Vec<Span>>) -> Self {
        Self::Paragraph(RichParagraph::new(spans))
    }

    /// An italic one-line notice, used in place of empty tables.
    pub fn notice(text: impl Into<String>) -> Self {
        Self::paragraph(vec![Span::new(text).italic()])
    }
}

/// Logical representation of a report section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    identifier: Option<String>,
    title: String,
    heading: bool,
    blocks: Vec<Block>,
}

impl Section {
    /// Creates a new section with the provided title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            identifier: None,
            title: title.into(),
            heading: true,
            blocks: Vec::new(),
        }
    }

    /// Returns the section identifier used for bookmarks and lookups.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Returns the title of the section.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the title is printed above the blocks.
    ///
    /// The title still names the section's bookmark when it is not printed.
    pub fn shows_heading(&self) -> bool {
        self.heading
    }

    /// Returns the blocks contained in the section.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the identifier and returns the updated section.
    pub fn with_identifier(mut self, identifier: impl Into<Option<String>>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Suppresses the printed title and returns the updated section.
    pub fn without_heading(mut self) -> Self {
        self.heading = false;
        self
    }

    /// Appends a block and returns the updated section.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
}

/// A complete report: a centred title followed by sections in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    title: String,
    sections: Vec<Section>,
}

impl Report {
    /// Creates an empty report with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Returns the report title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the sections in rendering order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Appends a section and returns the updated report.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Appends a section in place.
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Looks a section up by identifier.
    pub fn section(&self, identifier: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.identifier() == Some(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, DataTable, FieldTable, Report, Section};

    #[test]
    fn data_rows_are_normalised_to_header_width() {
        let mut table = DataTable::new(["Fecha", "Estado", "Detalle"], &[2, 2]);
        table.push_row(["2024-01-01", "RADICADA"]);
        table.push_row(["a", "b", "c", "d"]);

        assert_eq!(table.column_weights(), &[2, 2, 1]);
        assert_eq!(table.rows()[0], vec!["2024-01-01", "RADICADA", ""]);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn field_lookup_by_label() {
        let table = FieldTable::new(2, 4)
            .with_row("Email:", "a@b.co")
            .with_row("Ciudad:", "Florencia");

        assert_eq!(table.value("Ciudad:"), Some("Florencia"));
        assert_eq!(table.value("Nit:"), None);
        assert_eq!(table.column_weights(), vec![2, 4]);
    }

    #[test]
    fn sections_are_found_by_identifier() {
        let report = Report::new("Informe")
            .with_section(Section::new("Uno").with_identifier(Some("uno".to_string())))
            .with_section(Section::new("Dos").with_block(Block::notice("vacío")));

        assert_eq!(report.section("uno").map(Section::title), Some("Uno"));
        assert!(report.section("dos").is_none());
        assert_eq!(report.sections().len(), 2);
    }

    #[test]
    fn headings_are_printed_unless_suppressed() {
        let section = Section::new("DOCUMENTOS ADJUNTOS");
        assert!(section.shows_heading());

        let section = section.without_heading();
        assert!(!section.shows_heading());
        assert_eq!(section.title(), "DOCUMENTOS ADJUNTOS");
    }
}
