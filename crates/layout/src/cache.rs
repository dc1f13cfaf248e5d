use std::collections::HashMap;
use std::sync::RwLock;
use verso_traits::{Measurement, MeasurementOracle};
use verso_types::FontSpec;

// --- Cache Keys ---

#[derive(Hash, PartialEq, Eq, Clone, Debug)]
struct WidthKey {
    text: String,
    font: FontSpec,
    size: u32,
}

#[derive(Hash, PartialEq, Eq, Clone, Debug)]
struct LineHeightKey {
    font: FontSpec,
    size: u32,
}

/// Memoizes word widths and line heights in front of another oracle.
///
/// The same word in the same face is measured once; a wrapped oracle must be
/// pure, so the cached answer is indistinguishable from a fresh one. When the
/// width table reaches `capacity` entries it is cleared.
#[derive(Debug)]
pub struct MeasurementCache<O> {
    inner: O,
    capacity: usize,
    widths: RwLock<HashMap<WidthKey, f32>>,
    line_heights: RwLock<HashMap<LineHeightKey, f32>>,
}

impl<O: MeasurementOracle> MeasurementCache<O> {
    pub fn new(inner: O, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            widths: RwLock::new(HashMap::new()),
            line_heights: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.widths.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut c) = self.widths.write() {
            c.clear();
        }
        if let Ok(mut c) = self.line_heights.write() {
            c.clear();
        }
    }
}

impl<O: MeasurementOracle> MeasurementOracle for MeasurementCache<O> {
    fn measure(&self, text: &str, font: &FontSpec, size: f32) -> Measurement {
        self.inner.measure(text, font, size)
    }

    fn width(&self, text: &str, font: &FontSpec, size: f32) -> f32 {
        let key = WidthKey {
            text: text.to_string(),
            font: font.clone(),
            size: size.to_bits(),
        };
        if let Ok(cache) = self.widths.read() {
            if let Some(width) = cache.get(&key) {
                return *width;
            }
        }

        let width = self.inner.width(text, font, size);
        if let Ok(mut cache) = self.widths.write() {
            if cache.len() >= self.capacity {
                log::debug!("Measurement cache reached {} entries; pruning", cache.len());
                cache.clear();
            }
            cache.insert(key, width);
        }
        width
    }

    fn line_height(&self, font: &FontSpec, size: f32) -> f32 {
        let key = LineHeightKey {
            font: font.clone(),
            size: size.to_bits(),
        };
        if let Ok(cache) = self.line_heights.read() {
            if let Some(height) = cache.get(&key) {
                return *height;
            }
        }

        let height = self.inner.line_height(font, size);
        if let Ok(mut cache) = self.line_heights.write() {
            cache.insert(key, height);
        }
        height
    }
}
