//! Screen-space sizing for the trade-area overlay.
//!
//! The overlay is drawn as a circle whose radius is given in pixels, so the
//! geographic radius has to be converted for the current viewport. The result
//! depends on zoom and must be recomputed whenever zoom changes.

use std::f64::consts::PI;

use crate::geo::Coordinates;

/// Meters per degree of longitude at the equator on a spherical Earth.
const METERS_PER_DEGREE_AT_EQUATOR: f64 = 111_319.9;

/// Web-Mercator latitude limit.
const MAX_MERCATOR_LAT: f64 = 85.051_129;

const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// The point `radius_meters` due east of `center`.
///
/// Only accurate near `center`'s latitude; ignores projection distortion.
#[must_use]
pub fn east_offset(center: Coordinates, radius_meters: f64) -> Coordinates {
    let meters_per_degree = METERS_PER_DEGREE_AT_EQUATOR * center.latitude.to_radians().cos();
    Coordinates::new(
        center.longitude + radius_meters / meters_per_degree,
        center.latitude,
    )
}

/// Horizontal pixel distance between `center` and the point `radius_meters`
/// east of it, under the viewport transform `project`.
pub fn pixel_radius<F>(center: Coordinates, radius_meters: f64, project: F) -> f64
where
    F: Fn(Coordinates) -> ScreenPoint,
{
    let origin = project(center);
    let edge = project(east_offset(center, radius_meters));
    (edge.x - origin.x).abs()
}

/// A Web-Mercator map viewport using 512-pixel tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center: Coordinates,
    zoom: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    pub const TILE_SIZE: f64 = 512.0;

    /// Zoom is clamped to `0..=22`.
    #[must_use]
    pub fn new(center: Coordinates, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn world_size(&self) -> f64 {
        Self::TILE_SIZE * self.zoom.exp2()
    }

    /// Maps a coordinate to pixels, with the viewport center at the middle of
    /// the screen.
    #[must_use]
    pub fn project(&self, point: Coordinates) -> ScreenPoint {
        let world = self.world_size();
        let (x, y) = mercator(point);
        let (cx, cy) = mercator(self.center);
        ScreenPoint {
            x: (x - cx) * world + self.width / 2.0,
            y: (y - cy) * world + self.height / 2.0,
        }
    }
}

/// Normalized Web-Mercator position in `[0, 1]`.
fn mercator(point: Coordinates) -> (f64, f64) {
    let x = (point.longitude + 180.0) / 360.0;
    let lat = point
        .latitude
        .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
        .to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// The trade-area circle for one location on one viewport.
///
/// Zoom can only change through [`TradeAreaOverlay::set_zoom`], which
/// recomputes the pixel radius, so the stored radius always matches the
/// viewport.
#[derive(Debug, Clone)]
pub struct TradeAreaOverlay {
    viewport: Viewport,
    center: Coordinates,
    radius_meters: f64,
    pixel_radius: f64,
}

impl TradeAreaOverlay {
    #[must_use]
    pub fn new(viewport: Viewport, center: Coordinates, radius_meters: f64) -> Self {
        let pixel_radius = pixel_radius(center, radius_meters, |c| viewport.project(c));
        Self {
            viewport,
            center,
            radius_meters,
            pixel_radius,
        }
    }

    /// Applies a zoom change and returns the recomputed radius.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.viewport.set_zoom(zoom);
        let viewport = &self.viewport;
        self.pixel_radius = pixel_radius(self.center, self.radius_meters, |c| viewport.project(c));
        tracing::debug!(
            zoom = self.viewport.zoom(),
            pixel_radius = self.pixel_radius,
            "trade area radius recomputed"
        );
        self.pixel_radius
    }

    #[must_use]
    pub fn pixel_radius(&self) -> f64 {
        self.pixel_radius
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn center(&self) -> Coordinates {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{miles_to_meters, TRADE_AREA_RADIUS_MILES};

    const AUSTIN: Coordinates = Coordinates::new(-97.7431, 30.2672);

    fn viewport(zoom: f64) -> Viewport {
        Viewport::new(AUSTIN, zoom, 800.0, 600.0)
    }

    #[test]
    fn east_offset_scales_with_latitude() {
        let equator = east_offset(Coordinates::new(0.0, 0.0), 111_319.9);
        assert!((equator.longitude - 1.0).abs() < 1e-9);

        let north = east_offset(Coordinates::new(0.0, 60.0), 111_319.9);
        assert!((north.longitude - 2.0).abs() < 1e-6);
        assert!((north.latitude - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pixel_radius_uses_horizontal_distance_only() {
        // A projection that moves y must not affect the result.
        let r = pixel_radius(Coordinates::new(0.0, 0.0), 111_319.9, |c| ScreenPoint {
            x: c.longitude * 10.0,
            y: c.longitude * 1_000.0,
        });
        assert!((r - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_radius_is_absolute() {
        let r = pixel_radius(Coordinates::new(0.0, 0.0), 111_319.9, |c| ScreenPoint {
            x: -c.longitude * 4.0,
            y: 0.0,
        });
        assert!((r - 4.0).abs() < 1e-9);
    }

    #[test]
    fn viewport_projects_center_to_screen_middle() {
        let p = viewport(13.0).project(AUSTIN);
        assert!((p.x - 400.0).abs() < 1e-6);
        assert!((p.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn pixel_radius_grows_with_radius_at_fixed_zoom() {
        let vp = viewport(13.0);
        let mut previous = 0.0;
        for meters in [100.0, 1_000.0, 5_000.0, 8_046.7, 20_000.0] {
            let r = pixel_radius(AUSTIN, meters, |c| vp.project(c));
            assert!(r > previous, "radius {meters} gave {r}, not > {previous}");
            previous = r;
        }
    }

    #[test]
    fn pixel_radius_grows_with_zoom_at_fixed_radius() {
        let meters = miles_to_meters(TRADE_AREA_RADIUS_MILES);
        let mut previous = 0.0;
        for zoom in [3.0, 8.0, 10.5, 13.0, 16.0] {
            let vp = viewport(zoom);
            let r = pixel_radius(AUSTIN, meters, |c| vp.project(c));
            assert!(r > previous, "zoom {zoom} gave {r}, not > {previous}");
            previous = r;
        }
    }

    #[test]
    fn overlay_recomputes_on_zoom_change() {
        let meters = miles_to_meters(TRADE_AREA_RADIUS_MILES);
        let mut overlay = TradeAreaOverlay::new(viewport(13.0), AUSTIN, meters);
        let at_13 = overlay.pixel_radius();

        let at_14 = overlay.set_zoom(14.0);
        assert!((at_14 / at_13 - 2.0).abs() < 1e-9, "one zoom level doubles scale");
        assert!((overlay.pixel_radius() - at_14).abs() < f64::EPSILON);

        let back = overlay.set_zoom(13.0);
        assert!((back - at_13).abs() < 1e-9);
    }

    #[test]
    fn viewport_clamps_zoom() {
        let mut vp = viewport(40.0);
        assert!((vp.zoom() - 22.0).abs() < f64::EPSILON);
        vp.set_zoom(-3.0);
        assert!(vp.zoom().abs() < f64::EPSILON);
    }
}
