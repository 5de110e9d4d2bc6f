//! Canvas geometry shared by the circuit model and its collaborators.
//!
//! All placed geometry is integral; hit-test queries take `f64` points since
//! they usually come straight from pointer coordinates.

use crate::error::{LfError, LfResult};

/// Grid pitch of the canvas, in canvas units.
pub const GRID_SIZE: i32 = 16;

/// Default pick radius around a pin anchor.
pub const PIN_HIT_RADIUS: f64 = 6.0;

/// Integral point on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub const fn offset(self, other: Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Squared euclidean distance to an arbitrary query point.
    pub fn distance_sq(self, px: f64, py: f64) -> f64 {
        let dx = f64::from(self.x) - px;
        let dy = f64::from(self.y) - py;
        dx * dx + dy * dy
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive containment test: points on the border count as inside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y) = (f64::from(self.x), f64::from(self.y));
        px >= x
            && px <= x + f64::from(self.width)
            && py >= y
            && py <= y + f64::from(self.height)
    }

    /// The same rectangle moved by `by`.
    pub const fn translate(self, by: Point) -> Rect {
        Rect {
            x: self.x + by.x,
            y: self.y + by.y,
            width: self.width,
            height: self.height,
        }
    }

    /// True when the rectangle has any extent at all.
    pub const fn has_area(&self) -> bool {
        self.width > 0 || self.height > 0
    }
}

/// Round half up, matching how pointer positions are snapped on the canvas.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Snap a free canvas position onto the nearest grid intersection.
pub fn snap_to_grid(x: f64, y: f64, grid: i32) -> LfResult<Point> {
    if grid <= 0 {
        return Err(LfError::InvalidArg {
            what: "grid must be positive",
        });
    }
    let g = f64::from(grid);
    let snap = |v: f64, what: &'static str| -> LfResult<i32> {
        if !v.is_finite() {
            return Err(LfError::InvalidArg { what });
        }
        let snapped = round_half_up(v / g) * g;
        if snapped < f64::from(i32::MIN) || snapped > f64::from(i32::MAX) {
            return Err(LfError::OutOfRange {
                what,
                value: snapped as i64,
                min: i64::from(i32::MIN),
                max: i64::from(i32::MAX),
            });
        }
        Ok(snapped as i32)
    };
    Ok(Point {
        x: snap(x, "x")?,
        y: snap(y, "y")?,
    })
}

/// Offset that centers a model of the given bounds on its position,
/// rounded to whole grid cells.
pub fn centering_anchor(bounds: Rect, grid: i32) -> Point {
    let g = f64::from(grid);
    let ox = round_half_up(f64::from(bounds.width) / 2.0 / g) * g;
    let oy = round_half_up(f64::from(bounds.height) / 2.0 / g) * g;
    Point {
        x: -(ox as i32),
        y: -(oy as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rect_contains_is_inclusive() {
        let r = Rect::new(0, 0, 10, 5);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(10.0, 5.0));
        assert!(r.contains(4.5, 2.5));
        assert!(!r.contains(10.1, 2.0));
        assert!(!r.contains(-0.1, 2.0));
    }

    #[test]
    fn snap_rounds_half_up() {
        assert_eq!(snap_to_grid(7.9, 8.0, 16), Ok(Point::new(0, 16)));
        assert_eq!(snap_to_grid(-8.0, -8.1, 16), Ok(Point::new(0, -16)));
        assert_eq!(snap_to_grid(40.0, 33.0, 16), Ok(Point::new(48, 32)));
    }

    #[test]
    fn snap_rejects_bad_input() {
        assert!(matches!(
            snap_to_grid(0.0, 0.0, 0),
            Err(LfError::InvalidArg { .. })
        ));
        assert!(matches!(
            snap_to_grid(f64::NAN, 0.0, 16),
            Err(LfError::InvalidArg { what: "x" })
        ));
        assert!(matches!(
            snap_to_grid(0.0, 1e12, 16),
            Err(LfError::OutOfRange { what: "y", .. })
        ));
    }

    #[test]
    fn anchor_centers_on_grid() {
        // 96x32 model: 3 cells wide, 1 cell tall on each side of the center.
        assert_eq!(
            centering_anchor(Rect::new(0, 0, 96, 32), GRID_SIZE),
            Point::new(-48, -16)
        );
        // 1.5 cells rounds up to 2.
        assert_eq!(
            centering_anchor(Rect::new(0, 0, 48, 32), GRID_SIZE),
            Point::new(-32, -16)
        );
    }

    #[test]
    fn pin_distance() {
        let p = Point::new(3, 4);
        assert_eq!(p.distance_sq(0.0, 0.0), 25.0);
    }

    proptest! {
        #[test]
        fn snapped_points_lie_on_grid(x in -10_000.0f64..10_000.0, y in -10_000.0f64..10_000.0) {
            let p = snap_to_grid(x, y, GRID_SIZE).unwrap();
            prop_assert_eq!(p.x % GRID_SIZE, 0);
            prop_assert_eq!(p.y % GRID_SIZE, 0);
            prop_assert!((f64::from(p.x) - x).abs() <= f64::from(GRID_SIZE) / 2.0);
            prop_assert!((f64::from(p.y) - y).abs() <= f64::from(GRID_SIZE) / 2.0);
        }
    }
}
