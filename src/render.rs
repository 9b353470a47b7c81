//! Drawing layers onto a canvas.

use std::f64::consts::PI;
use kurbo::{Point, Rect};
use crate::canvas::{Canvas, Path};
use crate::color::Color;
use crate::style::{Feature, Geometry, Layer};


/// The font family used for labels.
const LABEL_FONT: &str = "sans-serif";


//------------ render_layer --------------------------------------------------

/// Renders all features of a layer.
///
/// Features entirely outside the canvas are skipped.
pub fn render_layer(
    layer: &Layer, canvas: &Canvas
) -> Result<(), cairo::Error> {
    let symbols = Symbols::new(layer, canvas.scale_factor());
    let mut skipped = 0;
    for feature in &layer.features {
        if !render_feature(feature, &symbols, canvas)? {
            skipped += 1;
        }
    }
    log::debug!(
        "layer '{}': rendered {} of {} features",
        layer.name, layer.features.len() - skipped, layer.features.len()
    );
    Ok(())
}

/// Renders a single feature.
///
/// Returns whether the feature was visible.
fn render_feature(
    feature: &Feature, symbols: &Symbols, canvas: &Canvas
) -> Result<bool, cairo::Error> {
    let points: Vec<_> = feature.coords.iter().map(|pos| {
        canvas.project(*pos)
    }).collect();

    let mut path = Path::new(canvas);
    match feature.geometry {
        Geometry::Point => {
            // Points are only used for their bounds here.
            points.iter().for_each(|p| path.move_to(*p));
        }
        Geometry::Line | Geometry::Polygon => {
            let mut points = points.iter();
            if let Some(p) = points.next() {
                path.move_to(*p)
            }
            points.for_each(|p| path.line_to(*p));
            if feature.geometry == Geometry::Polygon {
                path.close_path()
            }
        }
    }

    let bounds = path.bounds().inflate(symbols.margin(), symbols.margin());
    if bounds.intersect(canvas.bounds()).area() <= 0. {
        return Ok(false)
    }

    match feature.geometry {
        Geometry::Point => {
            for p in &points {
                canvas.new_path();
                canvas.arc(p.x, p.y, symbols.radius, 0., 2. * PI);
                symbols.point_fill().apply(canvas);
                canvas.fill_preserve()?;
                if let Some(stroke) = symbols.stroke {
                    symbols.apply_stroke(canvas, stroke);
                    canvas.stroke()?;
                }
                canvas.new_path();
            }
        }
        Geometry::Line => {
            canvas.new_path();
            path.apply();
            symbols.apply_stroke(
                canvas, symbols.stroke.unwrap_or(Color::BLACK)
            );
            canvas.stroke()?;
        }
        Geometry::Polygon => {
            canvas.new_path();
            path.apply();
            if let Some(fill) = symbols.fill {
                fill.apply(canvas);
                canvas.fill_preserve()?;
            }
            if let Some(stroke) = symbols.stroke {
                symbols.apply_stroke(canvas, stroke);
                canvas.stroke_preserve()?;
            }
            canvas.new_path();
        }
    }

    if let Some(label) = feature.label.as_ref() {
        render_label(label, label_anchor(&points), symbols, canvas)?;
    }
    Ok(true)
}

/// Renders a label centered on `anchor`.
fn render_label(
    label: &str, anchor: Point, symbols: &Symbols, canvas: &Canvas
) -> Result<(), cairo::Error> {
    canvas.select_font_face(
        LABEL_FONT, cairo::FontSlant::Normal, cairo::FontWeight::Normal
    );
    canvas.set_font_size(symbols.font_size);
    let extents = canvas.text_extents(label)?;
    canvas.move_to(
        anchor.x - extents.width() / 2. - extents.x_bearing(),
        anchor.y - extents.height() / 2. - extents.y_bearing(),
    );
    symbols.text.apply(canvas);
    canvas.show_text(label)?;
    canvas.new_path();
    Ok(())
}

/// Returns where a label for a feature with `points` should go.
///
/// This is the center of the points’ bounding box.
fn label_anchor(points: &[Point]) -> Point {
    let mut iter = points.iter();
    let first = match iter.next() {
        Some(p) => *p,
        None => return Point::ZERO,
    };
    iter.fold(Rect::from_points(first, first), |rect, p| {
        rect.union_pt(*p)
    }).center()
}


//------------ Symbols -------------------------------------------------------

/// The symbolizer settings of a layer scaled for the canvas.
struct Symbols {
    stroke: Option<Color>,
    stroke_width: f64,
    fill: Option<Color>,
    radius: f64,
    text: Color,
    font_size: f64,
}

impl Symbols {
    fn new(layer: &Layer, scale_factor: f64) -> Self {
        Symbols {
            stroke: layer.stroke,
            stroke_width: layer.stroke_width * scale_factor,
            fill: layer.fill,
            radius: layer.radius * scale_factor,
            text: layer.text,
            font_size: layer.font_size * scale_factor,
        }
    }

    /// Returns how far a feature’s symbol reaches beyond its points.
    ///
    /// Labels are not measured here, so allow for about ten glyphs.
    fn margin(&self) -> f64 {
        self.stroke_width.max(self.radius).max(self.font_size * 10.)
    }

    fn point_fill(&self) -> Color {
        self.fill.or(self.stroke).unwrap_or(Color::BLACK)
    }

    fn apply_stroke(&self, canvas: &Canvas, color: Color) {
        color.apply(canvas);
        canvas.set_line_width(self.stroke_width);
        canvas.set_line_cap(cairo::LineCap::Round);
        canvas.set_line_join(cairo::LineJoin::Round);
    }
}


//============ Testing =======================================================
