//! Field configuration and the grid layout derived from it

use galaxy_animation::Easing;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Resize debounce shared by the host bridge and the worker
pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;

/// Easing used by point jitter tweens
pub const FIELD_EASING: Easing = Easing::EaseInOutCirc;

/// Tunable parameters of the particle field.
///
/// Every key can be changed one at a time over the channel; see
/// [`crate::Property`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface width in pixels
    pub width: f32,
    /// Surface height in pixels
    pub height: f32,
    /// Grid side length; the field holds `density²` points
    pub density: u32,
    /// Maximum neighbor links per point
    pub links: u32,
    /// Base jitter duration in milliseconds
    pub speed: f32,
    /// Jitter displacement around each origin
    pub distance: f32,
    /// Neighbor search window as a percentage
    pub accuracy: f32,
    /// Pointer influence radius
    pub radius: f32,
    /// Base point draw radius
    pub sradius: f32,
    /// Draw links with a two-stop gradient instead of a flat alpha
    pub gradient: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            density: 30,
            links: 5,
            speed: 1000.0,
            distance: 30.0,
            accuracy: 10.0,
            radius: 130.0,
            sradius: 2.0,
            gradient: false,
        }
    }
}

impl FieldConfig {
    /// A field can only be laid out once width, height, links and density
    /// are all non-zero.
    pub fn is_complete(&self) -> bool {
        self.width != 0.0
            && self.height != 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.links != 0
            && self.density != 0
    }

    /// Half-side of the square around the pointer that a frame can touch
    pub fn offset_margin(&self) -> u32 {
        (self.radius + self.distance + self.sradius * 2.0).max(0.0) as u32
    }

    /// Half-width of the neighbor search window in flat-index space
    pub fn search_buffer(&self) -> usize {
        let density = self.density as f32;
        (density * (density / 100.0 * self.accuracy)).max(0.0) as usize
    }

    /// Number of points a complete layout holds
    pub fn point_count(&self) -> usize {
        (self.density as usize) * (self.density as usize)
    }
}

/// Grid geometry computed by a resize
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub density: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub offset_margin: u32,
}

impl Layout {
    /// Returns `None` for an incomplete configuration
    pub fn from_config(config: &FieldConfig) -> Option<Self> {
        if !config.is_complete() {
            return None;
        }
        let density = config.density as f32;
        Some(Self {
            density: config.density,
            cell_width: config.width / density,
            cell_height: config.height / density,
            offset_margin: config.offset_margin(),
        })
    }

    /// Side of the offscreen draw buffer
    pub fn buffer_side(&self) -> u32 {
        self.offset_margin * 2
    }

    /// Rectangle of grid cell `(col, row)` as `(x, y, width, height)`
    pub fn cell(&self, col: u32, row: u32) -> (f32, f32, f32, f32) {
        (
            col as f32 * self.cell_width,
            row as f32 * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }

    /// Cells covered by the square of side `2 × offset_margin` around
    /// `(x, y)`, clamped to the grid.
    ///
    /// Both bounds truncate and the upper one is exclusive, so a cell the
    /// square only partly overlaps past its right or bottom edge is left out.
    pub fn window(&self, x: f32, y: f32) -> GridWindow {
        let margin = self.offset_margin as f32;
        let clamp = |v: f32| (v as i64).clamp(0, self.density as i64) as u32;
        GridWindow {
            cols: clamp((x - margin) / self.cell_width)..clamp((x + margin) / self.cell_width),
            rows: clamp((y - margin) / self.cell_height)..clamp((y + margin) / self.cell_height),
            density: self.density,
        }
    }
}

/// Half-open range of grid columns and rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridWindow {
    pub cols: Range<u32>,
    pub rows: Range<u32>,
    density: u32,
}

impl GridWindow {
    /// Flat point indices inside the window, column-major like the grid
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        let density = self.density as usize;
        self.cols.clone().flat_map(move |col| {
            self.rows
                .clone()
                .map(move |row| col as usize * density + row as usize)
        })
    }

    pub fn contains(&self, index: usize) -> bool {
        if self.density == 0 {
            return false;
        }
        let density = self.density as usize;
        let col = (index / density) as u32;
        let row = (index % density) as u32;
        self.cols.contains(&col) && self.rows.contains(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty() || self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cols.len() * self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FieldConfig {
        FieldConfig {
            width: 800.0,
            height: 600.0,
            density: 5,
            links: 3,
            radius: 100.0,
            distance: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.density, 30);
        assert_eq!(config.links, 5);
        assert_eq!(config.radius, 130.0);
        assert!(!config.gradient);
        assert!(!config.is_complete());
    }

    #[test]
    fn test_offset_margin_truncates() {
        let config = FieldConfig {
            radius: 100.5,
            distance: 20.0,
            sradius: 2.25,
            ..Default::default()
        };
        assert_eq!(config.offset_margin(), 125);
    }

    #[test]
    fn test_search_buffer() {
        // 30 * (0.3 * 10)
        assert_eq!(FieldConfig::default().search_buffer(), 90);
        assert_eq!(config().search_buffer(), 2);
    }

    #[test]
    fn test_layout_requires_complete_config() {
        let mut config = config();
        config.links = 0;
        assert!(Layout::from_config(&config).is_none());

        let mut config = self::config();
        config.width = f32::INFINITY;
        assert!(!config.is_complete());
        assert!(Layout::from_config(&config).is_none());
    }

    #[test]
    fn test_window_is_clamped() {
        let layout = Layout::from_config(&config()).unwrap();
        assert_eq!(layout.offset_margin, 124);
        assert_eq!(layout.cell_width, 160.0);
        assert_eq!(layout.cell_height, 120.0);

        let window = layout.window(400.0, 300.0);
        assert_eq!(window.cols, 1..3);
        assert_eq!(window.rows, 2..3);
        assert_eq!(window.len(), 2);

        let corner = layout.window(0.0, 0.0);
        assert_eq!(corner.cols, 0..0);
        assert!(corner.is_empty());

        let far = layout.window(5000.0, 5000.0);
        assert_eq!(far.cols, 5..5);

        // The margin reaches x = 274, into column 1, which stays unlit
        let partial = layout.window(150.0, 300.0);
        assert_eq!(partial.cols, 0..1);
    }

    #[test]
    fn test_window_indices() {
        let layout = Layout::from_config(&config()).unwrap();
        let window = layout.window(400.0, 300.0);
        let indices: Vec<usize> = window.indices().collect();
        assert_eq!(indices, vec![7, 12]);
        assert!(window.contains(12));
        assert!(!window.contains(13));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"width": 320, "gradient": true}"#).unwrap();
        assert_eq!(config.width, 320.0);
        assert!(config.gradient);
        assert_eq!(config.density, 30);
    }
}
