//! Measurement oracles shipped with the layout engine.
//!
//! - [`FixedAdvanceMetrics`]: every glyph has the same advance. Deterministic,
//!   font-free, and what the test suite measures with.
//! - [`FontMetrics`]: real advances read from TrueType/OpenType data via
//!   `ttf-parser`, registered per [`FontSpec`] with a fallback face.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use verso_traits::{FontError, Measurement, MeasurementOracle};
use verso_types::FontSpec;

const SOFT_HYPHEN: char = '\u{00AD}';

fn is_zero_width(c: char) -> bool {
    matches!(c, SOFT_HYPHEN | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// Every visible glyph advances `advance_em * size`; lines are `line_height_em * size` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub advance_em: f32,
    pub line_height_em: f32,
}

impl FixedAdvanceMetrics {
    pub fn new(advance_em: f32, line_height_em: f32) -> Self {
        Self {
            advance_em,
            line_height_em,
        }
    }
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self::new(0.5, 1.2)
    }
}

impl MeasurementOracle for FixedAdvanceMetrics {
    fn measure(&self, text: &str, _font: &FontSpec, size: f32) -> Measurement {
        let advance = self.advance_em * size;
        Measurement {
            advances: text
                .chars()
                .map(|c| if is_zero_width(c) { 0.0 } else { advance })
                .collect(),
            line_height: self.line_height_em * size,
        }
    }

    fn width(&self, text: &str, _font: &FontSpec, size: f32) -> f32 {
        let visible = text.chars().filter(|c| !is_zero_width(*c)).count();
        visible as f32 * self.advance_em * size
    }

    fn line_height(&self, _font: &FontSpec, size: f32) -> f32 {
        self.line_height_em * size
    }
}

/// Metrics extracted once from a parsed face, plus the raw data for advances.
struct FaceMetrics {
    data: Arc<Vec<u8>>,
    units_per_em: f32,
    line_height_units: f32,
}

impl std::fmt::Debug for FaceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceMetrics")
            .field("data_len", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl FaceMetrics {
    fn parse(data: Vec<u8>) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| FontError::InvalidData(e.to_string()))?;
        let units_per_em = face.units_per_em() as f32;
        let line_height_units =
            face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32;
        Ok(Self {
            data: Arc::new(data),
            units_per_em,
            line_height_units,
        })
    }

    fn measure(&self, text: &str, size: f32) -> Measurement {
        let scale = size / self.units_per_em;
        let line_height = self.line_height_units * scale;
        // Parsing the header is cheap and avoids a self-referential face.
        let Ok(face) = ttf_parser::Face::parse(&self.data, 0) else {
            return Measurement {
                advances: text.chars().map(|_| size * 0.5).collect(),
                line_height,
            };
        };
        let missing = self.units_per_em * 0.5;
        let advances = text
            .chars()
            .map(|c| {
                if is_zero_width(c) {
                    return 0.0;
                }
                let units = face
                    .glyph_index(c)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(f32::from)
                    .unwrap_or(missing);
                units * scale
            })
            .collect();
        Measurement {
            advances,
            line_height,
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FaceKey {
    family: String,
    weight: u16,
    italic: bool,
}

impl FaceKey {
    fn new(spec: &FontSpec) -> Self {
        Self {
            family: spec.family.to_lowercase(),
            weight: spec.weight.numeric_value(),
            italic: spec.style == verso_types::FontStyle::Italic,
        }
    }
}

/// The same-family face closest to `key`: nearest weight, then matching
/// slant. Equal distances go to the lighter, upright face so the choice never
/// depends on registry order.
fn nearest_face<'k>(
    candidates: impl Iterator<Item = &'k FaceKey>,
    key: &FaceKey,
) -> Option<&'k FaceKey> {
    candidates
        .filter(|candidate| candidate.family == key.family)
        .min_by_key(|candidate| {
            (
                candidate.weight.abs_diff(key.weight),
                candidate.italic != key.italic,
                candidate.weight,
                candidate.italic,
            )
        })
}

/// Oracle backed by real font files.
///
/// Lookup order for a [`FontSpec`]: the exact face, then the nearest face of
/// the same family, then the fallback face.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    faces: Arc<RwLock<HashMap<FaceKey, Arc<FaceMetrics>>>>,
    fallback: Arc<FaceMetrics>,
}

impl FontMetrics {
    pub fn new(fallback: Vec<u8>) -> Result<Self, FontError> {
        let fallback = FaceMetrics::parse(fallback)?;
        Ok(Self {
            faces: Arc::new(RwLock::new(HashMap::new())),
            fallback: Arc::new(fallback),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FontError> {
        Self::new(read_font(path.as_ref())?)
    }

    /// Registers `data` as the face answering for `spec`.
    pub fn register(&self, spec: &FontSpec, data: Vec<u8>) -> Result<(), FontError> {
        let face = FaceMetrics::parse(data)?;
        log::debug!(
            "Registering face for '{}' weight {} ({:?})",
            spec.family,
            spec.weight.numeric_value(),
            spec.style
        );
        let mut faces = self
            .faces
            .write()
            .map_err(|_| FontError::InvalidData("font registry lock poisoned".to_string()))?;
        faces.insert(FaceKey::new(spec), Arc::new(face));
        Ok(())
    }

    pub fn register_file<P: AsRef<Path>>(&self, spec: &FontSpec, path: P) -> Result<(), FontError> {
        self.register(spec, read_font(path.as_ref())?)
    }

    fn resolve(&self, spec: &FontSpec) -> Arc<FaceMetrics> {
        let Ok(faces) = self.faces.read() else {
            return self.fallback.clone();
        };
        let key = FaceKey::new(spec);
        if let Some(face) = faces.get(&key) {
            return face.clone();
        }
        nearest_face(faces.keys(), &key)
            .and_then(|candidate| faces.get(candidate))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>, FontError> {
    std::fs::read(path).map_err(|e| FontError::LoadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl MeasurementOracle for FontMetrics {
    fn measure(&self, text: &str, font: &FontSpec, size: f32) -> Measurement {
        self.resolve(font).measure(text, size)
    }

    fn line_height(&self, font: &FontSpec, size: f32) -> f32 {
        let face = self.resolve(font);
        face.line_height_units * size / face.units_per_em
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verso_types::{FontStyle, FontWeight};

    fn spec() -> FontSpec {
        FontSpec::new("Test", FontWeight::Regular, FontStyle::Normal)
    }

    #[test]
    fn test_fixed_advance_measures_chars() {
        let metrics = FixedAdvanceMetrics::new(0.5, 1.2);
        let m = metrics.measure("abc", &spec(), 10.0);
        assert_eq!(m.advances, vec![5.0, 5.0, 5.0]);
        assert_eq!(m.width(), 15.0);
        assert_eq!(metrics.width("abc", &spec(), 10.0), 15.0);
        assert!((metrics.line_height(&spec(), 10.0) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_soft_hyphen_has_no_advance() {
        let metrics = FixedAdvanceMetrics::default();
        assert_eq!(metrics.width("be\u{AD}gin", &spec(), 10.0), 25.0);
    }

    fn key(family: &str, weight: u16, italic: bool) -> FaceKey {
        FaceKey {
            family: family.to_string(),
            weight,
            italic,
        }
    }

    #[test]
    fn test_nearest_face_ignores_registry_order() {
        let bold = key("palatino", 700, false);
        let italic = key("palatino", 400, true);
        let other = key("times", 400, false);
        let wanted = key("palatino", 400, false);

        let forward = [bold.clone(), italic.clone(), other.clone()];
        let backward = [other, italic.clone(), bold.clone()];
        assert_eq!(nearest_face(forward.iter(), &wanted), Some(&italic));
        assert_eq!(nearest_face(backward.iter(), &wanted), Some(&italic));

        let wanted_bold_italic = key("palatino", 700, true);
        assert_eq!(nearest_face(forward.iter(), &wanted_bold_italic), Some(&bold));
        assert_eq!(nearest_face(backward.iter(), &wanted_bold_italic), Some(&bold));
    }

    #[test]
    fn test_nearest_face_prefers_weight_then_slant_then_lighter() {
        let light = key("gentium", 300, false);
        let semibold = key("gentium", 600, false);
        let regular_italic = key("gentium", 450, true);
        let wanted = key("gentium", 450, false);

        let faces = [semibold.clone(), light.clone()];
        assert_eq!(nearest_face(faces.iter(), &wanted), Some(&light));
        let faces = [regular_italic.clone(), semibold, light];
        assert_eq!(nearest_face(faces.iter(), &wanted), Some(&regular_italic));
        assert_eq!(nearest_face(faces.iter(), &key("lato", 400, false)), None);
    }

    #[test]
    fn test_font_metrics_rejects_garbage() {
        let err = FontMetrics::new(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontError::InvalidData(_)));
    }

    #[test]
    fn test_font_metrics_reports_missing_file() {
        let err = FontMetrics::from_file("/definitely/not/here.ttf").unwrap_err();
        assert!(matches!(err, FontError::LoadFailed { .. }));
    }
}
