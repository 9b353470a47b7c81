//! What we are drawing on.

use std::ops;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Size};
use crate::params::LonLat;
use crate::srs::Srs;


//------------ Canvas --------------------------------------------------------

/// The virtual surface to draw the map on.
///
/// The canvas provides access to its dimensions and the transformation from
/// map coordinates into canvas coordinates. Drawing is done directly via
/// deref-ing to a cairo context.
///
/// Map coordinates are those of the map’s SRS with the y axis pointing
/// north. Canvas coordinates are pixels with the origin in the top-left
/// corner and the y axis pointing down.
#[derive(Debug)]
pub struct Canvas {
    /// The Cairo context for actual rendering.
    context: cairo::Context,

    /// The size of the canvas in pixels.
    size: Size,

    /// The SRS of the map.
    srs: Srs,

    /// The transformation from map to canvas coordinates.
    transform: Affine,

    /// The factor to multiply all symbol dimensions with.
    scale_factor: f64,
}

impl Canvas {
    /// Creates a new canvas.
    ///
    /// The canvas will have a size of `size` pixels and show `extent` which
    /// is given in coordinates of `srs`. The top-left corner of the canvas
    /// is moved by `offset` pixels.
    ///
    /// An empty `extent` can’t be mapped onto the canvas and results in
    /// [`cairo::Error::InvalidMatrix`].
    pub fn new(
        surface: &cairo::Surface,
        size: Size,
        extent: Rect,
        srs: Srs,
        scale_factor: f64,
        offset: Point,
    ) -> Result<Self, cairo::Error> {
        let transform = Self::calc_transform(size, extent, offset);
        if !transform.as_coeffs().iter().all(|x| x.is_finite()) {
            return Err(cairo::Error::InvalidMatrix)
        }
        let context = cairo::Context::new(surface)?;
        context.move_to(0.,0.);
        context.line_to(size.width, 0.);
        context.line_to(size.width, size.height);
        context.line_to(0., size.height);
        context.close_path();
        context.clip();

        Ok(Canvas {
            context,
            size,
            srs,
            transform,
            scale_factor,
        })
    }

    /// Returns the transformation from map into canvas coordinates.
    pub fn calc_transform(size: Size, extent: Rect, offset: Point) -> Affine {
        let sx = size.width / extent.width();
        let sy = size.height / extent.height();
        Affine::new([
            sx, 0.,
            0., -sy,
            -extent.x0 * sx - offset.x, extent.y1 * sy - offset.y,
        ])
    }

    /// Returns a reference to the Cairo rendering context.
    pub fn context(&self) -> &cairo::Context {
        &self.context
    }

    /// Returns the canvas bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Returns the factor to scale symbol dimensions by.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Projects a geographic position into canvas coordinates.
    pub fn project(&self, pos: LonLat) -> Point {
        self.transform * self.srs.forward(pos)
    }
}


//--- Deref

impl ops::Deref for Canvas {
    type Target = cairo::Context;

    fn deref(&self) -> &Self::Target {
        self.context()
    }
}


//------------ Path ----------------------------------------------------------

/// A path bound to a canvas.
///
/// All the path’s points are in canvas coordinates.
#[derive(Clone, Debug)]
pub struct Path<'a> {
    path: BezPath,
    canvas: &'a Canvas,
}

impl<'a> Path<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Path {
            path: BezPath::new(),
            canvas
        }
    }

    pub fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    pub fn line_to(&mut self, p: Point) {
        self.path.line_to(p);
    }

    pub fn close_path(&mut self) {
        self.path.close_path();
    }

    /// Returns the bounding box of the path’s points.
    pub fn bounds(&self) -> Rect {
        let mut points = self.path.elements().iter().filter_map(|el| {
            match *el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
                _ => None
            }
        });
        let first = match points.next() {
            Some(p) => p,
            None => return Rect::ZERO,
        };
        points.fold(Rect::from_points(first, first), |rect, p| {
            rect.union_pt(p)
        })
    }

    pub fn apply(&self) {
        self.path.iter().for_each(|el| match el {
            PathEl::MoveTo(p) => self.canvas.move_to(p.x, p.y),
            PathEl::LineTo(p) => self.canvas.line_to(p.x, p.y),
            PathEl::QuadTo(..) => unreachable!(),
            PathEl::CurveTo(u, v, s) => {
                self.canvas.curve_to(u.x, u.y, v.x, v.y, s.x, s.y)
            }
            PathEl::ClosePath => self.canvas.close_path(),
        })
    }
}


//============ Testing =======================================================
