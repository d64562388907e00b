use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// RoutingMode
// ---------------------------------------------------------------------------

/// Connector geometry drawn between adjacent columns.
///
/// The set is closed: text or legacy integer codes outside it are rejected with
/// [`LayoutError::InvalidConfiguration`] rather than defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RoutingMode {
    /// Stub out of every cell, dropping onto the top (or bottom) edge of the next cell.
    Above,
    /// Sibling stubs joined by a vertical bar with a stroke toward the next column.
    #[default]
    Centered,
    /// Vertical bar under the even sibling, branching right at the midpoint.
    Below,
}

impl RoutingMode {
    pub const ALL: [RoutingMode; 3] = [RoutingMode::Above, RoutingMode::Centered, RoutingMode::Below];

    /// Legacy integer codes: 0 = above, 1 = centered, 2 = below.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(RoutingMode::Above),
            1 => Ok(RoutingMode::Centered),
            2 => Ok(RoutingMode::Below),
            other => Err(LayoutError::invalid(format!("unexpected routing mode code {other}"))),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            RoutingMode::Above => 0,
            RoutingMode::Centered => 1,
            RoutingMode::Below => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoutingMode::Above => "above",
            RoutingMode::Centered => "centered",
            RoutingMode::Below => "below",
        }
    }

    /// Above → Centered → Below → Above.
    pub fn next(self) -> Self {
        match self {
            RoutingMode::Above => RoutingMode::Centered,
            RoutingMode::Centered => RoutingMode::Below,
            RoutingMode::Below => RoutingMode::Above,
        }
    }

    /// Whether only the even sibling of a pair emits the converging stroke.
    pub fn even_rows_only(&self) -> bool {
        !matches!(self, RoutingMode::Above)
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoutingMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(RoutingMode::Above),
            "centered" | "center" => Ok(RoutingMode::Centered),
            "below" => Ok(RoutingMode::Below),
            other => Err(LayoutError::invalid(format!("unexpected routing mode {other:?}"))),
        }
    }
}

impl TryFrom<String> for RoutingMode {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// LayoutConfig
// ---------------------------------------------------------------------------

/// Largest accepted value for any single dimension. Strides and the sums the
/// router forms from a few dimensions stay far inside `i32`.
pub const MAX_DIMENSION: i32 = 1 << 24;

/// Immutable layout parameters passed explicitly into every layout and routing call.
///
/// Construct through [`LayoutConfig::builder`]; every dimension is validated to lie
/// in `0..=MAX_DIMENSION`, so a value of this type is always usable by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutConfig")]
pub struct LayoutConfig {
    cell_width: i32,
    cell_height: i32,
    line_thickness: i32,
    horizontal_gap: i32,
    vertical_gap: i32,
    origin_pad_x: i32,
    origin_pad_y: i32,
    routing_mode: RoutingMode,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 150,
            cell_height: 75,
            line_thickness: 1,
            horizontal_gap: 50,
            vertical_gap: 40,
            origin_pad_x: 0,
            origin_pad_y: 0,
            routing_mode: RoutingMode::Centered,
        }
    }
}

impl LayoutConfig {
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::default()
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    pub fn line_thickness(&self) -> i32 {
        self.line_thickness
    }

    pub fn horizontal_gap(&self) -> i32 {
        self.horizontal_gap
    }

    pub fn vertical_gap(&self) -> i32 {
        self.vertical_gap
    }

    pub fn origin_pad_x(&self) -> i32 {
        self.origin_pad_x
    }

    pub fn origin_pad_y(&self) -> i32 {
        self.origin_pad_y
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.routing_mode
    }

    /// Horizontal distance between the origins of adjacent columns.
    pub fn column_stride(&self) -> i32 {
        self.cell_width + self.horizontal_gap
    }

    /// Vertical distance between the origins of adjacent rows on a uniform grid.
    pub fn row_stride(&self) -> i32 {
        self.cell_height + self.vertical_gap
    }

    /// Copy of this configuration with a different routing mode.
    pub fn with_routing_mode(self, routing_mode: RoutingMode) -> Self {
        Self { routing_mode, ..self }
    }

    /// Re-check the dimension invariant: every field in `0..=MAX_DIMENSION`.
    /// Always true for values built through the builder or deserialized.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("line_thickness", self.line_thickness),
            ("horizontal_gap", self.horizontal_gap),
            ("vertical_gap", self.vertical_gap),
            ("origin_pad_x", self.origin_pad_x),
            ("origin_pad_y", self.origin_pad_y),
        ];
        for (name, value) in fields {
            if value < 0 {
                return Err(LayoutError::invalid(format!("{name} must be >= 0, got {value}")));
            }
            if value > MAX_DIMENSION {
                return Err(LayoutError::invalid(format!(
                    "{name} must be <= {MAX_DIMENSION}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`LayoutConfig`]. Starts from [`LayoutConfig::default`].
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfigBuilder {
    inner: LayoutConfig,
}

impl Default for LayoutConfigBuilder {
    fn default() -> Self {
        Self { inner: LayoutConfig::default() }
    }
}

impl LayoutConfigBuilder {
    pub fn cell_size(mut self, width: i32, height: i32) -> Self {
        self.inner.cell_width = width;
        self.inner.cell_height = height;
        self
    }

    pub fn cell_width(mut self, width: i32) -> Self {
        self.inner.cell_width = width;
        self
    }

    pub fn cell_height(mut self, height: i32) -> Self {
        self.inner.cell_height = height;
        self
    }

    pub fn line_thickness(mut self, thickness: i32) -> Self {
        self.inner.line_thickness = thickness;
        self
    }

    pub fn gaps(mut self, horizontal: i32, vertical: i32) -> Self {
        self.inner.horizontal_gap = horizontal;
        self.inner.vertical_gap = vertical;
        self
    }

    pub fn horizontal_gap(mut self, gap: i32) -> Self {
        self.inner.horizontal_gap = gap;
        self
    }

    pub fn vertical_gap(mut self, gap: i32) -> Self {
        self.inner.vertical_gap = gap;
        self
    }

    pub fn origin_pad(mut self, x: i32, y: i32) -> Self {
        self.inner.origin_pad_x = x;
        self.inner.origin_pad_y = y;
        self
    }

    pub fn routing_mode(mut self, mode: RoutingMode) -> Self {
        self.inner.routing_mode = mode;
        self
    }

    pub fn build(self) -> Result<LayoutConfig> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

/// Wire form of [`LayoutConfig`]: every field optional, validated on conversion.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLayoutConfig {
    cell_width: i32,
    cell_height: i32,
    line_thickness: i32,
    horizontal_gap: i32,
    vertical_gap: i32,
    origin_pad_x: i32,
    origin_pad_y: i32,
    routing_mode: RoutingMode,
}

impl Default for RawLayoutConfig {
    fn default() -> Self {
        let d = LayoutConfig::default();
        Self {
            cell_width: d.cell_width,
            cell_height: d.cell_height,
            line_thickness: d.line_thickness,
            horizontal_gap: d.horizontal_gap,
            vertical_gap: d.vertical_gap,
            origin_pad_x: d.origin_pad_x,
            origin_pad_y: d.origin_pad_y,
            routing_mode: d.routing_mode,
        }
    }
}

impl TryFrom<RawLayoutConfig> for LayoutConfig {
    type Error = LayoutError;

    fn try_from(raw: RawLayoutConfig) -> Result<Self> {
        LayoutConfig::builder()
            .cell_size(raw.cell_width, raw.cell_height)
            .line_thickness(raw.line_thickness)
            .gaps(raw.horizontal_gap, raw.vertical_gap)
            .origin_pad(raw.origin_pad_x, raw.origin_pad_y)
            .routing_mode(raw.routing_mode)
            .build()
    }
}
