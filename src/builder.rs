//! Document construction helpers for the solicitud_pdf crate.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::elements::Break;
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{self, Color};
use genpdf::{self, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};
use log::debug;

use crate::elements::{self, PageCounter, PageSlot};
use crate::fonts;
use crate::model::{HorizontalAlignment, Report, RichParagraph};
use crate::richtext::Span;

/// Font size of body text.
pub const BODY_FONT_SIZE: u8 = 10;
/// Font size of the report title.
pub const TITLE_FONT_SIZE: u8 = 18;

const TITLE_COLOR: Color = Color::Rgb(0, 0, 139);
const FOOTER_HEIGHT_MM: i32 = 8;

/// Builder for `genpdf::Document` instances pre-configured with the crate defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
    page_counter: Option<PageCounter>,
}

type ElementFactory = dyn Fn(usize) -> Box<dyn Element>;

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Shares the decorator's page counter with elements that need the current page.
    pub fn with_page_counter(mut self, counter: PageCounter) -> Self {
        self.page_counter = Some(counter);
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = fonts::default_font_family()?;
        let mut document = genpdf::Document::new(font_family);
        document.set_font_size(BODY_FONT_SIZE);

        if let Some(title) = self.title {
            document.set_title(title);
        }

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }

        let counter = self.page_counter.unwrap_or_default();
        let decorator = ConfiguredPageDecorator::new(counter, self.margins, self.footer);
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<ElementFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    page: PageCounter,
    margins: Option<Margins>,
    footer: Option<FooterSpec>,
}

impl ConfiguredPageDecorator {
    fn new(page: PageCounter, margins: Option<Margins>, footer: Option<FooterSpec>) -> Self {
        Self {
            page,
            margins,
            footer,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.page.get() + 1;
        self.page.set(page);

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

/// Output of [`render_report`].
pub struct RenderedReport {
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// For every section of the report, the page it starts on.
    pub section_pages: Vec<Option<usize>>,
}

fn page_footer(page: usize) -> impl Element {
    let text = RichParagraph::new(vec![Span::new(format!("Página {page}")).sized(8)])
        .with_alignment(HorizontalAlignment::Center);
    elements::paragraph_element(&text)
}

fn title_paragraph(title: &str) -> RichParagraph {
    RichParagraph::new(vec![Span::new(title)
        .bold()
        .sized(TITLE_FONT_SIZE)
        .colored(TITLE_COLOR)])
    .with_alignment(HorizontalAlignment::Center)
}

/// Renders `report` to an A4 PDF held in memory.
pub fn render_report(report: &Report) -> Result<RenderedReport, Error> {
    let counter: PageCounter = Rc::new(Cell::new(0));
    let mut document = DocumentBuilder::new()
        .with_title(report.title())
        .with_paper_size(PaperSize::A4)
        .with_margins(Margins::trbl(25, 25, 6, 25))
        .with_footer(FOOTER_HEIGHT_MM, page_footer)
        .with_page_counter(Rc::clone(&counter))
        .build()?;

    document.push(elements::paragraph_element(&title_paragraph(report.title())));
    document.push(Break::new(2));

    let slots: Vec<PageSlot> = report
        .sections()
        .iter()
        .map(|_| PageSlot::default())
        .collect();
    for (section, slot) in report.sections().iter().zip(&slots) {
        document.push(elements::section_element(
            section,
            Rc::clone(&counter),
            Rc::clone(slot),
        )?);
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    debug!(
        "Rendered '{}' into {} pages ({} bytes)",
        report.title(),
        counter.get(),
        bytes.len()
    );

    Ok(RenderedReport {
        bytes,
        section_pages: slots.iter().map(|slot| slot.get()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_centred_and_bold() {
        let title = title_paragraph("SOLICITUD DE CRÉDITO");

        assert_eq!(title.alignment(), HorizontalAlignment::Center);
        assert_eq!(title.text(), "SOLICITUD DE CRÉDITO");
        assert!(title.spans().iter().all(|span| span.is_bold()));
        assert_eq!(title.spans()[0].font_size(), Some(TITLE_FONT_SIZE));
    }
}
