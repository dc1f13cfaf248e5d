use crate::LayoutError;
use crate::hyphenation::HyphenationPolicy;
use crate::text::Role;
use serde::{Deserialize, Serialize};
use verso_traits::MeasurementOracle;
use verso_types::{FontSpec, FontStyle, FontWeight, TextStyle};

/// Number of body text columns on every page.
pub const BODY_COLUMNS: usize = 2;

/// Number of footnote columns in the grid beneath the body.
pub const FOOTNOTE_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page: PageGeometry,
    pub footnote_area: FootnoteAreaPolicy,
    pub typography: Typography,
    pub balancing: BalancingConfig,
    pub hyphenation: HyphenationPolicy,
    /// The maximum number of memoized word widths kept by the
    /// [`MeasurementCache`](crate::MeasurementCache) before it is reset.
    ///
    /// - **Higher values**: fewer oracle calls, more memory.
    /// - **Lower values**: less memory, more re-measuring.
    ///
    /// Defaults to `10000`.
    pub cache_capacity: usize,
}

/// Dimensions of the text block, in points. Margins are the renderer's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    /// Height shared by the body columns and the footnote area.
    pub content_height: f32,
    pub body_column_width: f32,
    pub footnote_column_width: f32,
}

/// Bounds on the vertical space the footnote grid may take from the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FootnoteAreaPolicy {
    /// Space reserved before any footnote is known.
    pub min_height: f32,
    /// Largest area the grid may grow to for footnotes first referenced on the page.
    pub max_height: f32,
    /// Rule and padding drawn between the body and the grid.
    pub separator_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub family: String,
    pub body_size: f32,
    pub heading_size: f32,
    pub verse_number_size: f32,
    pub footnote_size: f32,
    pub footnote_label_size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BalancingConfig {
    /// Extra overshoot, in points, a footnote column may take past its target
    /// before the next footnote moves on to the following column.
    pub slack_tolerance: f32,
    /// Split the last page's body lines evenly between the two columns.
    pub balance_final_page: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            footnote_area: FootnoteAreaPolicy::default(),
            typography: Typography::default(),
            balancing: BalancingConfig::default(),
            hyphenation: HyphenationPolicy::default(),
            cache_capacity: 10000,
        }
    }
}

impl Default for PageGeometry {
    // A US letter page scaled to 70%, with the column gap folded into the footnote width.
    fn default() -> Self {
        Self {
            content_height: 491.4,
            body_column_width: 181.44,
            footnote_column_width: 115.36,
        }
    }
}

impl Default for FootnoteAreaPolicy {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 245.7,
            separator_height: 4.2,
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: "Palatino".to_string(),
            body_size: 11.0,
            heading_size: 14.0,
            verse_number_size: 8.0,
            footnote_size: 8.0,
            footnote_label_size: 8.0,
        }
    }
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            slack_tolerance: 0.0,
            balance_final_page: true,
        }
    }
}

/// A role and emphasis resolved into a concrete face and size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub spec: FontSpec,
    pub size: f32,
}

impl Typography {
    pub fn resolve(&self, role: Role, style: TextStyle) -> ResolvedFont {
        let (weight, font_style, size) = match role {
            Role::Body => (style.weight(), style.font_style(), self.body_size),
            Role::Heading => (FontWeight::Bold, style.font_style(), self.heading_size),
            Role::VerseNumber => (FontWeight::Bold, FontStyle::Normal, self.verse_number_size),
            Role::Marker => (style.weight(), FontStyle::Italic, self.verse_number_size),
            Role::Footnote => (style.weight(), style.font_style(), self.footnote_size),
            Role::FootnoteLabel => (FontWeight::Bold, FontStyle::Normal, self.footnote_label_size),
        };
        ResolvedFont {
            spec: FontSpec::new(self.family.clone(), weight, font_style),
            size,
        }
    }

    /// Line height of plain body text, the step by which the footnote area grows.
    pub fn body_line_height(&self, oracle: &dyn MeasurementOracle) -> f32 {
        let font = self.resolve(Role::Body, TextStyle::Regular);
        oracle.line_height(&font.spec, font.size)
    }

    pub fn footnote_line_height(&self, oracle: &dyn MeasurementOracle) -> f32 {
        let font = self.resolve(Role::Footnote, TextStyle::Regular);
        oracle.line_height(&font.spec, font.size)
    }
}

impl LayoutConfig {
    /// Checks the dimensions against each other and against the oracle's line heights.
    ///
    /// Content-dependent checks (labels wider than their column, missing footnotes)
    /// happen when a [`Paginator`](crate::Paginator) is built for a chapter.
    pub fn validate(&self, oracle: &dyn MeasurementOracle) -> Result<(), LayoutError> {
        let page = &self.page;
        let area = &self.footnote_area;

        for (name, value) in [
            ("page.contentHeight", page.content_height),
            ("page.bodyColumnWidth", page.body_column_width),
            ("page.footnoteColumnWidth", page.footnote_column_width),
            ("typography.bodySize", self.typography.body_size),
            ("typography.headingSize", self.typography.heading_size),
            ("typography.verseNumberSize", self.typography.verse_number_size),
            ("typography.footnoteSize", self.typography.footnote_size),
            ("typography.footnoteLabelSize", self.typography.footnote_label_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if area.min_height < 0.0 || area.separator_height < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "footnoteArea heights must not be negative".to_string(),
            ));
        }
        if area.min_height > area.max_height {
            return Err(LayoutError::InvalidConfig(format!(
                "footnoteArea.minHeight ({}) exceeds maxHeight ({})",
                area.min_height, area.max_height
            )));
        }
        if area.max_height > page.content_height {
            return Err(LayoutError::InvalidConfig(format!(
                "footnoteArea.maxHeight ({}) exceeds page.contentHeight ({})",
                area.max_height, page.content_height
            )));
        }
        if self.balancing.slack_tolerance < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "balancing.slackTolerance must not be negative".to_string(),
            ));
        }
        if self.hyphenation.min_prefix == 0 || self.hyphenation.min_suffix == 0 {
            return Err(LayoutError::InvalidConfig(
                "hyphenation.minPrefix and minSuffix must be at least 1".to_string(),
            ));
        }

        let body_line = self.typography.body_line_height(oracle);
        let body_room = page.content_height - area.max_height;
        if body_line > body_room + crate::util::EPSILON {
            return Err(LayoutError::InvalidConfig(format!(
                "a body line ({:.2}pt) does not fit beside the largest footnote area ({:.2}pt left)",
                body_line, body_room
            )));
        }

        let footnote_line = self.typography.footnote_line_height(oracle);
        let grid_room = page.content_height - area.separator_height;
        if footnote_line > grid_room + crate::util::EPSILON {
            return Err(LayoutError::InvalidConfig(format!(
                "a footnote line ({:.2}pt) does not fit in a footnote column ({:.2}pt)",
                footnote_line, grid_room
            )));
        }

        Ok(())
    }
}
