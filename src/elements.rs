//! Conversion of the report model into `genpdf` elements.
//!
//! Besides the plain conversions this module provides [`PageMarked`], a
//! wrapper that records on which page its inner element first produced
//! output. The page number comes from a [`PageCounter`] shared with the page
//! decorator in [`crate::builder`].

use std::cell::Cell;
use std::rc::Rc;

use genpdf::elements::{Break, FrameCellDecorator, LinearLayout, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Mm, RenderResult};

use crate::model::{Block, DataTable, FieldTable, HorizontalAlignment, RichParagraph, Section};
use crate::richtext::Span;

/// Font size of section headings.
pub const HEADING_FONT_SIZE: u8 = 13;
/// Font size of table cells.
pub const TABLE_FONT_SIZE: u8 = 10;
/// Font size of table headers.
pub const TABLE_HEADER_FONT_SIZE: u8 = 9;

const HEADING_COLOR: Color = Color::Rgb(0, 0, 139);
const CELL_PADDING_MM: i32 = 1;

/// Number of the page currently being rendered, starting at 1.
pub type PageCounter = Rc<Cell<usize>>;

/// Page on which a marked element first rendered, if it has.
pub type PageSlot = Rc<Cell<Option<usize>>>;

/// Wraps an element and records the page of its first visible output.
pub struct PageMarked<E> {
    inner: E,
    counter: PageCounter,
    slot: PageSlot,
}

impl<E: Element> PageMarked<E> {
    /// Wraps `inner`, reading page numbers from `counter` and storing the first into `slot`.
    pub fn new(inner: E, counter: PageCounter, slot: PageSlot) -> Self {
        Self {
            inner,
            counter,
            slot,
        }
    }
}

impl<E: Element> Element for PageMarked<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.inner.render(context, area, style)?;
        // An element pushed to the next page renders nothing on this one.
        if self.slot.get().is_none() && result.size.height > Mm::from(0) {
            self.slot.set(Some(self.counter.get()));
        }
        Ok(result)
    }
}

fn alignment(alignment: HorizontalAlignment) -> Alignment {
    match alignment {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
    }
}

/// Converts a rich paragraph into a `genpdf` paragraph.
pub fn paragraph_element(paragraph: &RichParagraph) -> Paragraph {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span.to_styled_string());
    }
    element.aligned(alignment(paragraph.alignment()))
}

fn cell(text: &str, style: Style) -> impl Element {
    Paragraph::new(text.to_owned())
        .styled(style)
        .padded(CELL_PADDING_MM)
}

/// Builds a framed two-column table with bold labels.
pub fn field_table_element(table: &FieldTable) -> Result<TableLayout, Error> {
    let mut layout = TableLayout::new(table.column_weights());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let value_style = Style::new().with_font_size(TABLE_FONT_SIZE);
    let label_style = value_style.bold();
    for (label, value) in table.rows() {
        layout
            .row()
            .element(cell(label, label_style))
            .element(cell(value, value_style))
            .push()?;
    }
    Ok(layout)
}

/// Builds a framed table with a bold header row.
pub fn data_table_element(table: &DataTable) -> Result<TableLayout, Error> {
    let mut layout = TableLayout::new(table.column_weights().to_vec());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let header_style = Style::new().bold().with_font_size(TABLE_HEADER_FONT_SIZE);
    let mut header = layout.row();
    for label in table.header() {
        header.push_element(cell(label, header_style));
    }
    header.push()?;

    let cell_style = Style::new().with_font_size(TABLE_FONT_SIZE);
    for values in table.rows() {
        let mut row = layout.row();
        for value in values {
            row.push_element(cell(value, cell_style));
        }
        row.push()?;
    }
    Ok(layout)
}

/// Builds the heading paragraph for a section title.
pub fn heading_element(title: &str) -> Paragraph {
    Paragraph::new(
        Span::new(title)
            .bold()
            .sized(HEADING_FONT_SIZE)
            .colored(HEADING_COLOR),
    )
}

/// Converts a section into a vertical layout: heading, blocks, trailing spacer.
///
/// Sections that hide their heading start directly with their first block.
/// The whole layout is wrapped in [`PageMarked`] so the page where the
/// section first shows up ends up in `slot`.
pub fn section_element(
    section: &Section,
    counter: PageCounter,
    slot: PageSlot,
) -> Result<PageMarked<LinearLayout>, Error> {
    let mut layout = LinearLayout::vertical();
    if section.shows_heading() {
        layout.push(heading_element(section.title()).padded(genpdf::Margins::trbl(2, 0, 2, 0)));
    }

    for block in section.blocks() {
        match block {
            Block::Paragraph(paragraph) => layout.push(paragraph_element(paragraph)),
            Block::Fields(table) => layout.push(field_table_element(table)?),
            Block::Table(table) => layout.push(data_table_element(table)?),
        }
    }

    layout.push(Break::new(1));
    Ok(PageMarked::new(layout, counter, slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_maps_one_to_one() {
        assert!(matches!(alignment(HorizontalAlignment::Left), Alignment::Left));
        assert!(matches!(alignment(HorizontalAlignment::Center), Alignment::Center));
    }

    #[test]
    fn tables_accept_every_row() {
        let fields = FieldTable::new(2, 4)
            .with_row("Email:", "a@b.co")
            .with_row("Ciudad:", "Florencia");
        assert!(field_table_element(&fields).is_ok());

        let mut data = DataTable::new(["Fecha", "Estado", "Detalle"], &[2, 2, 3]);
        data.push_row(["2024-03-01 08:15:00", "RADICADA", "Creada"]);
        assert!(data_table_element(&data).is_ok());
    }
}
