//! Fixed-geometry document model and invoice layout.
//!
//! A [`Document`] is a page size plus an ordered list of absolutely
//! positioned draw operations in PDF user space (origin at the bottom-left,
//! y growing upwards). The [`pdf`](crate::pdf) module serializes it.

mod layout;
pub mod metrics;

pub use layout::{InvoiceRenderer, CHARGES};

/// One centimeter in points.
pub const CM: f32 = 72.0 / 2.54;

/// ISO A4 page width in points.
pub const A4_WIDTH: f32 = 595.2756;

/// ISO A4 page height in points.
pub const A4_HEIGHT: f32 = 841.8898;

/// Base-14 fonts used by the layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript name of the face.
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Width of `text` set in this font at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        metrics::text_width(text, *self == Font::HelveticaBold, size)
    }
}

/// A single draw operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline starts at (x, y).
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    /// A stroked line segment.
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// A stroked rectangle, optionally filled with a gray level (0 = black).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<f32>,
    },
}

/// A laid-out single-page document. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    title: String,
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl Document {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// The text op whose content equals `text`, if any.
    pub fn find_text(&self, text: &str) -> Option<&DrawOp> {
        self.ops
            .iter()
            .find(|op| matches!(op, DrawOp::Text { text: t, .. } if t == text))
    }
}

/// Accumulates draw operations with a current font, like a PDF canvas.
#[derive(Debug)]
pub(crate) struct Canvas {
    width: f32,
    height: f32,
    font: Font,
    size: f32,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub(crate) fn a4() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            font: Font::Helvetica,
            size: 12.0,
            ops: Vec::with_capacity(64),
        }
    }

    pub(crate) fn width(&self) -> f32 {
        self.width
    }

    pub(crate) fn height(&self) -> f32 {
        self.height
    }

    pub(crate) fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.size = size;
    }

    /// Width of `text` in the current font.
    pub(crate) fn string_width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.size)
    }

    pub(crate) fn draw_string(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            font: self.font,
            size: self.size,
            text: text.into(),
        });
    }

    pub(crate) fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    pub(crate) fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: None,
        });
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: Some(gray),
        });
    }

    pub(crate) fn finish(self, title: impl Into<String>) -> Document {
        Document {
            title: title.into(),
            width: self.width,
            height: self.height,
            ops: self.ops,
        }
    }
}
