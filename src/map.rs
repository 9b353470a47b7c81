//! The map to be rendered.

use std::path::Path;
use kurbo::{Point, Rect, Size};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::params::{EARTH_RADIUS, PixelSize, STANDARD_PIXEL_SIZE};
use crate::render::render_layer;
use crate::srs::Srs;
use crate::style::{Layer, StyleError, StyleSheet};


//------------ Map -----------------------------------------------------------

/// A map ready for rendering.
///
/// The map combines the content loaded from a style sheet with the size of
/// the output in pixels and the extent currently shown. It starts out with
/// the default of a style sheet, i.e., geographic coordinates, no
/// background and no layers, and an empty extent.
#[derive(Clone, Debug)]
pub struct Map {
    /// The width of the output in pixels.
    width: i32,

    /// The height of the output in pixels.
    height: i32,

    /// The SRS of the map.
    srs: Srs,

    /// The background color.
    background: Option<Color>,

    /// The layers in drawing order.
    layers: Vec<Layer>,

    /// The currently shown extent in map coordinates.
    extent: Rect,
}

impl Map {
    /// Creates a new, empty map of the given size in pixels.
    pub fn new(width: i32, height: i32) -> Self {
        Map {
            width,
            height,
            srs: Srs::default(),
            background: None,
            layers: Vec::new(),
            extent: Rect::ZERO,
        }
    }

    /// Replaces the content of the map with that of the style sheet.
    pub fn load_style(
        &mut self, path: impl AsRef<Path>
    ) -> Result<(), StyleError> {
        let path = path.as_ref();
        self.apply_style(StyleSheet::load(path)?);
        log::debug!(
            "loaded style {} with {} layers",
            path.display(), self.layers.len()
        );
        Ok(())
    }

    /// Replaces the content of the map with an already loaded style sheet.
    pub fn apply_style(&mut self, style: StyleSheet) {
        self.srs = style.srs;
        self.background = style.background;
        self.layers = style.layers;
    }

    pub fn srs(&self) -> Srs {
        self.srs
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixel_size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the currently shown extent.
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// Changes the size of the output.
    ///
    /// Sizes that are not positive are ignored and the map keeps its old
    /// size. The extent is not adjusted.
    pub fn resize(&mut self, size: PixelSize) {
        if size.width <= 0 || size.height <= 0 {
            log::warn!("ignoring invalid map size {}", size);
            return
        }
        self.width = size.width;
        self.height = size.height;
    }

    /// Sets the shown extent.
    ///
    /// If the aspect ratio of `extent` differs from that of the output, the
    /// extent is grown around its center until they match.
    pub fn zoom_to_box(&mut self, extent: Rect) {
        self.extent = extent;
        self.fix_aspect_ratio();
    }

    fn fix_aspect_ratio(&mut self) {
        let extent = self.extent;
        if extent.height() == 0. || self.height == 0 {
            return
        }
        let map_ratio = f64::from(self.width) / f64::from(self.height);
        let extent_ratio = extent.width() / extent.height();
        if map_ratio == extent_ratio {
            return
        }
        let size = if extent_ratio > map_ratio {
            Size::new(extent.width(), extent.width() / map_ratio)
        }
        else {
            Size::new(extent.height() * map_ratio, extent.height())
        };
        self.extent = Rect::from_center_size(extent.center(), size);
    }

    /// Returns the size of a pixel in map units.
    pub fn scale(&self) -> f64 {
        if self.width > 0 {
            self.extent.width() / f64::from(self.width)
        }
        else {
            self.extent.width()
        }
    }

    /// Returns the scale denominator of the map at the current extent.
    ///
    /// This assumes a pixel of [`STANDARD_PIXEL_SIZE`]. For geographic
    /// maps, degrees are converted into meters at the equator.
    pub fn scale_denominator(&self) -> f64 {
        let denom = self.scale() / STANDARD_PIXEL_SIZE;
        if self.srs.is_geographic() {
            denom * METERS_PER_DEGREE
        }
        else {
            denom
        }
    }

    /// Renders the map onto a surface.
    ///
    /// Symbol dimensions are multiplied by `scale_factor`. The top-left
    /// corner of the map is placed at `-offset_x`, `-offset_y` on the
    /// surface.
    pub fn render(
        &self,
        surface: &cairo::Surface,
        scale_factor: f64,
        offset_x: f64,
        offset_y: f64,
    ) -> Result<(), cairo::Error> {
        let canvas = Canvas::new(
            surface,
            self.pixel_size().to_size(),
            self.extent,
            self.srs,
            scale_factor,
            Point::new(offset_x, offset_y),
        )?;

        if let Some(background) = self.background {
            background.apply(&canvas);
            canvas.paint()?;
        }
        for layer in &self.layers {
            render_layer(layer, &canvas)?;
        }
        Ok(())
    }
}


//------------ Constants -----------------------------------------------------

/// The length of one degree of longitude at the equator in meters.
const METERS_PER_DEGREE: f64 = EARTH_RADIUS * 2. * std::f64::consts::PI
    / 360.;


//============ Testing =======================================================
