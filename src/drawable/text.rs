use std::{collections::BTreeSet, sync::Arc};

use crate::{
    drawable::shapes::{ShapeStyle, Styled},
    foundation::core::{Affine, Point},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::StableHasher,
    ops::op::Op,
    ops::sequence::OpSequence,
};

/// Outline of one glyph in font units (y axis pointing up).
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub outline: OpSequence,
    pub advance: f64,
}

/// Font collaborator turning characters into stroke outlines.
///
/// Implementations typically wrap a font file parser; the engine only needs outlines and
/// advances.
pub trait GlyphOutliner: Send + Sync {
    /// Family name, used in error messages and the text identity.
    fn family(&self) -> &str;

    fn units_per_em(&self) -> f64;

    /// Outline for `ch`, or `None` when the font has no glyph for it.
    fn glyph(&self, ch: char) -> Option<Glyph>;

    /// Advance of a word space in font units.
    fn space_advance(&self) -> f64 {
        self.units_per_em() * 0.25
    }
}

/// Single line of text laid out left to right from a baseline origin.
#[derive(Clone)]
pub struct Text {
    pub text: String,
    /// Baseline start.
    pub origin: Point,
    /// Em size in canvas units.
    pub size: f64,
    pub outliner: Arc<dyn GlyphOutliner>,
    pub style: ShapeStyle,
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.text)
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("family", &self.outliner.family())
            .field("style", &self.style)
            .finish()
    }
}

impl Styled for Text {
    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

impl Text {
    pub fn new(
        text: impl Into<String>,
        origin: impl Into<Point>,
        size: f64,
        outliner: Arc<dyn GlyphOutliner>,
    ) -> Self {
        Self {
            text: text.into(),
            origin: origin.into(),
            size,
            outliner,
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_str(&self.text);
        h.write_point(self.origin);
        h.write_f64(self.size);
        h.write_str(self.outliner.family());
        h.write_f64(self.outliner.units_per_em());
        h.write_f64(self.outliner.space_advance());
        // Glyphs actually used, so fonts sharing a family name stay distinct.
        let used: BTreeSet<char> = self.text.chars().filter(|c| !c.is_whitespace()).collect();
        for ch in used {
            match self.outliner.glyph(ch) {
                Some(g) => {
                    h.write_u8(1);
                    h.write_f64(g.advance);
                    h.write_bytes(&serde_json::to_vec(&g.outline).unwrap_or_default());
                }
                None => h.write_u8(0),
            }
        }
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self) -> HandanimResult<OpSequence> {
        let upem = self.outliner.units_per_em();
        if upem.is_nan() || upem <= 0.0 {
            return Err(HandanimError::validation(format!(
                "font '{}' reports non-positive units per em",
                self.outliner.family()
            )));
        }
        let scale = self.size / upem;
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        let mut x = self.origin.x;
        for ch in self.text.chars() {
            if ch.is_whitespace() {
                x += self.outliner.space_advance() * scale;
                continue;
            }
            let glyph = self.outliner.glyph(ch).ok_or_else(|| {
                HandanimError::validation(format!(
                    "font '{}' has no glyph for {ch:?}",
                    self.outliner.family()
                ))
            })?;
            let place = Affine::new([scale, 0.0, 0.0, -scale, x, self.origin.y]);
            out.extend(&glyph.outline.without_pens().transform(place));
            x += glyph.advance * scale;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/text.rs"]
mod tests;
