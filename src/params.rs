//! Rendering parameters for a printed map.
//!
//! A printed map is described by its physical properties: where its center
//! is, how large the sheet is, and at which scale it is drawn. The renderer,
//! however, wants an extent in projected coordinates and a size in pixels.
//! This module translates between the two.

use std::{error, fmt};
use std::f64::consts::PI;
use std::str::FromStr;
use kurbo::{Rect, Size, TranslateScale};
use serde::Deserialize;
use crate::srs::Srs;


//------------ Constants -----------------------------------------------------

/// The length of an inch in meters.
pub const INCH: f64 = 0.0254;

/// The resolution of the output in dots per inch.
///
/// At 72 DPI a pixel is exactly one PostScript point, so the pixel size can
/// double as the page size of a vector surface.
pub const DPI: f64 = 72.;

/// The equatorial radius of the WGS84 ellipsoid in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.;

/// The edge length of a standard map tile in pixels.
pub const TILE_SIZE: f64 = 256.;

/// The standardized rendering pixel size in meters.
///
/// This is the 0.28 mm pixel that relates a ground resolution to a scale
/// denominator.
pub const STANDARD_PIXEL_SIZE: f64 = 0.00028;

/// The maximum zoom level accepted from the command line and config files.
///
/// Symbols styled for deeper zoom levels would be scaled down to nothing.
/// `mercator_scale_for_zoom` itself takes any zoom level.
pub const MAX_ZOOM: u8 = 30;


//------------ LonLat --------------------------------------------------------

/// A geographic position in degrees on the WGS84 datum.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        LonLat { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        LonLat::new(lon, lat)
    }
}

impl FromStr for LonLat {
    type Err = InvalidPair;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pair(s).map(|(lon, lat)| LonLat::new(lon, lat))
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}


//------------ PhysicalSize --------------------------------------------------

/// The size of the printed map in meters.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(from = "[f64; 2]")]
pub struct PhysicalSize {
    pub width: f64,
    pub height: f64,
}

impl PhysicalSize {
    pub const fn new(width: f64, height: f64) -> Self {
        PhysicalSize { width, height }
    }
}

impl From<[f64; 2]> for PhysicalSize {
    fn from([width, height]: [f64; 2]) -> Self {
        PhysicalSize::new(width, height)
    }
}

impl FromStr for PhysicalSize {
    type Err = InvalidPair;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pair(s).map(|(width, height)| PhysicalSize::new(width, height))
    }
}

impl fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} m", self.width, self.height)
    }
}


//------------ PixelSize -----------------------------------------------------

/// The size of the rendered map in pixels.
///
/// This is signed because nothing stops a caller from asking for a map of
/// negative physical size. Such a size is passed on as is.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PixelSize {
    pub width: i32,
    pub height: i32,
}

impl PixelSize {
    pub const fn new(width: i32, height: i32) -> Self {
        PixelSize { width, height }
    }

    /// Converts a physical size into pixels at [`DPI`].
    pub fn from_physical(size: PhysicalSize) -> Self {
        PixelSize::new(to_pixels(size.width), to_pixels(size.height))
    }

    /// Returns the size as a floating point size.
    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{} px", self.width, self.height)
    }
}

fn to_pixels(meters: f64) -> i32 {
    ((meters / INCH) * DPI).round() as i32
}


//------------ RenderParams --------------------------------------------------

/// The parameters a renderer needs to produce a printed map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// The area to render in coordinates of the map’s SRS.
    pub extent: Rect,

    /// The size of the output in pixels.
    pub pixel_size: PixelSize,
}

impl RenderParams {
    /// Computes the parameters for a map of physical `size` at `center`.
    ///
    /// The extent is the physical size blown up by the scale denominator
    /// and corrected for the Mercator distortion at the latitude of the
    /// center. It is centered on the center projected into `srs`.
    pub fn compute(
        center: LonLat,
        size: PhysicalSize,
        scale_denominator: f64,
        srs: Srs,
    ) -> Self {
        let scale = scale_denominator * mercator_scale_factor(center.lat);
        let extent = TranslateScale::scale(scale)
            * Rect::new(0., 0., size.width, size.height);
        RenderParams {
            extent: Rect::from_center_size(srs.forward(center), extent.size()),
            pixel_size: pixel_size(size),
        }
    }
}


//------------ Functions -----------------------------------------------------

/// Returns the size in pixels of a map of physical `size`.
pub fn pixel_size(size: PhysicalSize) -> PixelSize {
    PixelSize::from_physical(size)
}

/// Returns the Mercator scale factor at the given latitude in degrees.
///
/// Web Mercator inflates distances by this factor the further away from the
/// equator one gets.
pub fn mercator_scale_factor(lat: f64) -> f64 {
    1. / lat.to_radians().cos()
}

/// Returns the ground resolution at the equator for a zoom level.
///
/// The value is in meters per pixel for a standard tile pyramid. Zoom level
/// 0 covers the entire circumference with a single tile. Each further
/// level halves the resolution, computed in floating point so that every
/// `u8` is a valid level.
pub fn mercator_scale_for_zoom(zoom: u8) -> f64 {
    let circumference = EARTH_RADIUS * 2. * PI;
    circumference / (TILE_SIZE * 2f64.powi(i32::from(zoom)))
}

/// Returns the factor for scaling symbols when rendering.
///
/// Symbols are styled for the ground resolution of `zoom`. The printed map
/// has its own scale denominator, `map_scale_denominator`, so symbols need
/// to be scaled by the ratio of the two.
pub fn render_scale_factor(zoom: u8, map_scale_denominator: f64) -> f64 {
    mercator_scale_for_zoom(zoom) / STANDARD_PIXEL_SIZE
        / map_scale_denominator
}

fn parse_pair(s: &str) -> Result<(f64, f64), InvalidPair> {
    let (left, right) = s.split_once(',').ok_or(InvalidPair)?;
    Ok((
        f64::from_str(left.trim()).map_err(|_| InvalidPair)?,
        f64::from_str(right.trim()).map_err(|_| InvalidPair)?,
    ))
}


//------------ InvalidPair ---------------------------------------------------

/// A pair of numbers could not be parsed.
#[derive(Clone, Copy, Debug)]
pub struct InvalidPair;

impl fmt::Display for InvalidPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("expected two comma separated numbers")
    }
}

impl error::Error for InvalidPair { }


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    fn close(left: f64, right: f64, eps: f64) -> bool {
        (left - right).abs() < eps
    }

    #[test]
    fn scale_factor_at_equator() {
        assert_eq!(mercator_scale_factor(0.), 1.);
        assert!(close(mercator_scale_factor(60.), 2., 1e-12));
    }

    #[test]
    fn thirty_centimeters_in_pixels() {
        assert_eq!(
            pixel_size(PhysicalSize::new(0.3, 0.3)),
            PixelSize::new(850, 850)
        );
        assert_eq!(
            pixel_size(PhysicalSize::new(0.297, 0.21)),
            PixelSize::new(842, 595)
        );
        assert_eq!(
            pixel_size(PhysicalSize::new(0., -0.1)),
            PixelSize::new(0, -283)
        );
    }

    #[test]
    fn zoom_resolution() {
        let zero = mercator_scale_for_zoom(0);
        assert_eq!(zero, 2. * 6378137. * PI / 256.);
        assert!(close(zero, 156543.03, 0.01));
        assert_eq!(mercator_scale_for_zoom(17), zero / 131072.);
        assert_eq!(mercator_scale_for_zoom(1), zero / 2.);
    }

    #[test]
    fn zoom_resolution_beyond_integer_tiles() {
        let zero = mercator_scale_for_zoom(0);
        assert_eq!(mercator_scale_for_zoom(31), zero / 2f64.powi(31));
        assert_eq!(mercator_scale_for_zoom(56), zero / 2f64.powi(56));
        let deep = mercator_scale_for_zoom(64);
        assert_eq!(deep, zero / 2f64.powi(64));
        assert!(deep.is_finite() && deep > 0. && deep < 1e-14);
        let deepest = mercator_scale_for_zoom(u8::MAX);
        assert!(deepest.is_finite() && deepest > 0.);
        assert!(render_scale_factor(64, 3000.) < render_scale_factor(63, 3000.));
    }

    #[test]
    fn extent_follows_linear_scaling() {
        let center = LonLat::new(0., 0.);
        let size = PhysicalSize::new(0.2, 0.1);
        let params = RenderParams::compute(
            center, size, 5000., Srs::WebMercator
        );
        assert!(close(params.extent.width(), 1000., 1e-9));
        assert!(close(params.extent.height(), 500., 1e-9));
        assert!(close(params.extent.center().x, 0., 1e-9));
        assert!(close(params.extent.center().y, 0., 1e-9));
    }

    #[test]
    fn recentering_keeps_dimensions() {
        let size = PhysicalSize::new(0.3, 0.2);
        let at_origin = RenderParams::compute(
            LonLat::new(0., 45.), size, 1000., Srs::WebMercator
        );
        let elsewhere = RenderParams::compute(
            LonLat::new(100., 45.), size, 1000., Srs::WebMercator
        );
        assert!(close(
            at_origin.extent.width(), elsewhere.extent.width(), 1e-6
        ));
        assert!(close(
            at_origin.extent.height(), elsewhere.extent.height(), 1e-6
        ));
        assert!(elsewhere.extent.center().x > 1e6);
    }

    #[test]
    fn compute_is_idempotent() {
        let center = LonLat::new(14.4297185, 50.0797755);
        let size = PhysicalSize::new(0.3, 0.3);
        assert_eq!(
            RenderParams::compute(center, size, 3000., Srs::WebMercator),
            RenderParams::compute(center, size, 3000., Srs::WebMercator),
        );
    }

    #[test]
    fn prague_at_three_thousand() {
        let center = LonLat::new(14.4297185, 50.0797755);
        let params = RenderParams::compute(
            center, PhysicalSize::new(0.3, 0.3), 3000., Srs::WebMercator
        );
        let k = mercator_scale_factor(center.lat);
        assert!(close(k, 1.5577, 1e-4));
        assert_eq!(params.pixel_size, PixelSize::new(850, 850));
        assert!(close(params.extent.width(), 0.3 * 3000. * k, 1e-6));
        assert!(close(params.extent.width(), 1401.9, 0.1));
        assert!(close(params.extent.height(), 1401.9, 0.1));

        let projected = Srs::WebMercator.forward(center);
        let mid = params.extent.center();
        assert!(close(mid.x, projected.x, 1e-6));
        assert!(close(mid.y, projected.y, 1e-6));
    }

    #[test]
    fn scale_factor_for_render() {
        let denom = mercator_scale_for_zoom(17) / STANDARD_PIXEL_SIZE;
        assert!(close(render_scale_factor(17, denom), 1., 1e-12));
        assert!(close(render_scale_factor(17, denom * 2.), 0.5, 1e-12));
    }

    #[test]
    fn parse_pairs() {
        assert_eq!(
            LonLat::from_str("14.5, 50.1").unwrap(),
            LonLat::new(14.5, 50.1)
        );
        assert_eq!(
            PhysicalSize::from_str("0.3,0.2").unwrap(),
            PhysicalSize::new(0.3, 0.2)
        );
        assert!(LonLat::from_str("14.5").is_err());
        assert!(LonLat::from_str("14.5,north").is_err());
    }
}
