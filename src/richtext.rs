//! Utilities for working with styled text fragments.
//!
//! A [`Span`] is a piece of text plus the inline styling the report uses
//! (bold, italic, color and an optional size override). Spans are kept
//! independent from [`genpdf::elements`] so the report model can be built and
//! inspected without a font family loaded.

use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
    font_size: Option<u8>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Returns the font size override, if any.
    pub fn font_size(&self) -> Option<u8> {
        self.font_size
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Overrides the font size of the span.
    pub fn sized(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if let Some(font_size) = self.font_size {
            style.set_font_size(font_size);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span to a [`StyledString`].
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

/// Concatenates the plain text of `spans`.
pub fn plain_text<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(Span::text).collect()
}

#[cfg(test)]
mod tests {
    use super::{plain_text, Span};
    use genpdf::style::Color;

    #[test]
    fn builder_methods_accumulate() {
        let span = Span::new("Título")
            .bold()
            .italic()
            .sized(18)
            .colored(Color::Rgb(0, 0, 139));

        assert!(span.is_bold());
        assert!(span.is_italic());
        assert_eq!(span.font_size(), Some(18));
        assert_eq!(span.color(), Some(Color::Rgb(0, 0, 139)));
        assert_eq!(span.to_styled_string().s, "Título");
    }

    #[test]
    fn plain_text_joins_spans() {
        let spans = vec![Span::new("Monto: ").bold(), Span::new("$1.00")];
        assert_eq!(plain_text(&spans), "Monto: $1.00");
    }
}
