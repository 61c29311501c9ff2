/// Glyphs used when painting a projected layer onto a character grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GlyphStyle {
    pub mark: char,
    pub blank: char,
}

impl GlyphStyle {
    pub const fn new(mark: char, blank: char) -> Self {
        Self { mark, blank }
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            mark: '*',
            blank: ' ',
        }
    }
}
