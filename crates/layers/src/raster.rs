//! Vertex-only rasterization of a [`ProjectedGeometry`].
//!
//! Only ring vertices are plotted; edges are not interpolated and polygons
//! are not filled, so outlines come out dotted.

use crate::symbology::GlyphStyle;
use crate::vector::ProjectedGeometry;

/// Text shown instead of a grid when there is nothing to paint.
pub const EMPTY_CANVAS: &str = "No geometry yet";

/// A `width` x `height` character grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiCanvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub fn blank(width: usize, height: usize, style: GlyphStyle) -> Self {
        Self {
            width,
            height,
            cells: vec![style.blank; width * height],
        }
    }

    /// Set one cell. Out-of-range coordinates are skipped.
    pub fn plot(&mut self, x: usize, y: usize, glyph: char) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[y * self.width + x] = glyph;
        true
    }

    pub fn lines(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

pub fn rasterize(geometry: &ProjectedGeometry, style: GlyphStyle) -> AsciiCanvas {
    let mut canvas = AsciiCanvas::blank(geometry.width, geometry.height, style);
    for polygon in &geometry.polygons {
        for p in polygon.rings.iter().flatten() {
            canvas.plot(p.x, p.y, style.mark);
        }
    }
    canvas
}

/// Rasterize with the default glyphs and serialize rows top to bottom.
pub fn render_text(geometry: &ProjectedGeometry) -> String {
    if geometry.is_empty() {
        return EMPTY_CANVAS.to_string();
    }
    rasterize(geometry, GlyphStyle::default()).to_text()
}
