use std::fmt;

use crate::foundation::{
    core::HexColor,
    error::ColorLensResult,
    math::fmt_number,
};

/// Alpha passthrough row shared by every matrix this crate produces.
pub const ALPHA_ROW: [f64; 5] = [0.0, 0.0, 0.0, 1.0, 0.0];

/// A 4x5 row-major linear color transform, as consumed by SVG `feColorMatrix type="matrix"`.
///
/// Rows are R, G, B, A; columns are the source R, G, B, A channels plus a constant offset.
/// The alpha row is always [`ALPHA_ROW`]; color rows are not required to sum to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 5]; 4],
}

impl ColorMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::from_rgb_rows([
        [1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
    ]);

    /// Build a matrix from its three color rows; the alpha row is fixed to [`ALPHA_ROW`].
    pub const fn from_rgb_rows(rgb: [[f64; 5]; 3]) -> Self {
        Self {
            rows: [rgb[0], rgb[1], rgb[2], ALPHA_ROW],
        }
    }

    /// Linear remap sending the source red, green and blue channels to the full
    /// `background`, `text` and `highlight` colors respectively.
    ///
    /// Row `k` is `[background_k, text_k, highlight_k, 0, 0]`, so primary-color targets
    /// degenerate to the identity.
    pub fn custom_mapping(background: HexColor, text: HexColor, highlight: HexColor) -> Self {
        let bg = background.to_unit_rgb();
        let tx = text.to_unit_rgb();
        let hl = highlight.to_unit_rgb();
        let row = |k: usize| [bg[k], tx[k], hl[k], 0.0, 0.0];
        Self::from_rgb_rows([row(0), row(1), row(2)])
    }

    /// Same as [`ColorMatrix::custom_mapping`] but from raw boundary strings.
    ///
    /// Fails with [`crate::ColorLensError::InvalidColorFormat`] on the first malformed color.
    pub fn build(background: &str, text: &str, highlight: &str) -> ColorLensResult<Self> {
        Ok(Self::custom_mapping(
            HexColor::parse(background)?,
            HexColor::parse(text)?,
            HexColor::parse(highlight)?,
        ))
    }

    /// Borrow the four rows.
    pub fn rows(&self) -> &[[f64; 5]; 4] {
        &self.rows
    }

    /// Row-major copy of all 20 coefficients.
    pub fn to_array(&self) -> [f64; 20] {
        let mut out = [0.0; 20];
        for (i, row) in self.rows.iter().enumerate() {
            out[i * 5..i * 5 + 5].copy_from_slice(row);
        }
        out
    }

    /// Apply the matrix to a straight-alpha RGBA pixel with channels in `[0, 1]`.
    ///
    /// Results are clamped to `[0, 1]`, matching how user agents evaluate `feColorMatrix`.
    pub fn apply(&self, rgba: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for (o, row) in out.iter_mut().zip(self.rows.iter()) {
            let v = row[0] * rgba[0] + row[1] * rgba[1] + row[2] * rgba[2] + row[3] * rgba[3]
                + row[4];
            *o = v.clamp(0.0, 1.0);
        }
        out
    }

    /// Space-separated coefficients for the `values` attribute of `feColorMatrix`.
    pub fn to_values_attr(&self) -> String {
        self.to_array()
            .iter()
            .map(|v| fmt_number(*v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, row) in ["R", "G", "B", "A"].iter().zip(self.rows.iter()) {
            let cells = row.iter().map(|v| fmt_number(*v)).collect::<Vec<_>>();
            writeln!(f, "{label}: [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/matrix.rs"]
mod tests;
