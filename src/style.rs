//! The style sheet describing what goes onto a map.
//!
//! A style sheet is a TOML file. It names the spatial reference system of
//! the map, an optional background color, and a list of layers. Each layer
//! carries the symbolizer settings for its features and the features
//! themselves in geographic coordinates:
//!
//! ```toml
//! srs = "EPSG:3857"
//! background = "#f2efe9"
//!
//! [[layer]]
//! name = "roads"
//! stroke = "#ffffff"
//! stroke-width = 2.0
//!
//! [[layer.feature]]
//! type = "line"
//! coords = [[14.42, 50.07], [14.43, 50.08]]
//! label = "Main street"
//! ```

use std::{error, fmt, fs, io};
use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::color::Color;
use crate::params::LonLat;
use crate::srs::Srs;


//------------ StyleSheet ----------------------------------------------------

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSheet {
    /// The spatial reference system the map is rendered in.
    #[serde(default)]
    pub srs: Srs,

    /// The color the map is filled with before drawing any layers.
    #[serde(default)]
    pub background: Option<Color>,

    /// The layers in drawing order.
    #[serde(default, rename = "layer")]
    pub layers: Vec<Layer>,
}

impl StyleSheet {
    /// Loads a style sheet from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|err| {
            StyleError::new(path, ErrorKind::Io(err))
        })?;
        Self::parse(&data).map_err(|kind| StyleError::new(path, kind))
    }

    /// Parses a style sheet from its text.
    pub fn from_toml(data: &str) -> Result<Self, StyleError> {
        Self::parse(data).map_err(|kind| StyleError::new("<string>", kind))
    }

    fn parse(data: &str) -> Result<Self, ErrorKind> {
        let res: Self = toml::from_str(data).map_err(ErrorKind::Toml)?;
        res.check()?;
        Ok(res)
    }

    /// Checks that every feature has enough points for its geometry.
    fn check(&self) -> Result<(), ErrorKind> {
        for layer in &self.layers {
            for (index, feature) in layer.features.iter().enumerate() {
                let min = feature.geometry.min_coords();
                if feature.coords.len() < min {
                    return Err(ErrorKind::Geometry {
                        layer: layer.name.clone(),
                        index,
                        geometry: feature.geometry,
                        min,
                    })
                }
            }
        }
        Ok(())
    }
}


//------------ Layer ---------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Layer {
    pub name: String,

    /// The color lines and outlines are drawn with.
    #[serde(default)]
    pub stroke: Option<Color>,

    /// The width of lines and outlines in pixels.
    #[serde(default = "Layer::default_stroke_width")]
    pub stroke_width: f64,

    /// The color areas and points are filled with.
    #[serde(default)]
    pub fill: Option<Color>,

    /// The radius of points in pixels.
    #[serde(default = "Layer::default_radius")]
    pub radius: f64,

    /// The color of labels.
    #[serde(default = "Layer::default_text")]
    pub text: Color,

    /// The size of labels in pixels.
    #[serde(default = "Layer::default_font_size")]
    pub font_size: f64,

    #[serde(default, rename = "feature")]
    pub features: Vec<Feature>,
}

impl Layer {
    fn default_stroke_width() -> f64 { 1. }
    fn default_radius() -> f64 { 2. }
    fn default_text() -> Color { Color::BLACK }
    fn default_font_size() -> f64 { 10. }
}


//------------ Feature -------------------------------------------------------

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    #[serde(rename = "type")]
    pub geometry: Geometry,

    /// The points of the feature in geographic coordinates.
    pub coords: Vec<LonLat>,

    #[serde(default)]
    pub label: Option<String>,
}


//------------ Geometry ------------------------------------------------------

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    /// Each coordinate is drawn as a dot.
    Point,

    /// An open line through all coordinates.
    Line,

    /// A closed area.
    Polygon,
}

impl Geometry {
    fn min_coords(self) -> usize {
        match self {
            Geometry::Point => 1,
            Geometry::Line => 2,
            Geometry::Polygon => 3,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Geometry::Point => "point",
            Geometry::Line => "line",
            Geometry::Polygon => "polygon",
        })
    }
}


//------------ StyleError ----------------------------------------------------

/// Loading a style sheet failed.
#[derive(Debug)]
pub struct StyleError {
    path: PathBuf,
    kind: ErrorKind,
}

#[derive(Debug)]
enum ErrorKind {
    Io(io::Error),
    Toml(toml::de::Error),
    Geometry {
        layer: String,
        index: usize,
        geometry: Geometry,
        min: usize,
    },
}

impl StyleError {
    fn new(path: impl Into<PathBuf>, kind: ErrorKind) -> Self {
        StyleError { path: path.into(), kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.path.display())?;
        match self.kind {
            ErrorKind::Io(ref err) => write!(f, "{}", err),
            ErrorKind::Toml(ref err) => write!(f, "{}", err),
            ErrorKind::Geometry { ref layer, index, geometry, min } => {
                write!(f,
                    "layer '{}', feature {}: a {} needs at least {} \
                     coordinates",
                    layer, index, geometry, min
                )
            }
        }
    }
}

impl error::Error for StyleError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.kind {
            ErrorKind::Io(ref err) => Some(err),
            ErrorKind::Toml(ref err) => Some(err),
            ErrorKind::Geometry { .. } => None,
        }
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_sheet() {
        let sheet = StyleSheet::from_toml(r##"
            srs = "+proj=merc +a=6378137 +b=6378137 +units=m"
            background = "#f2efe9"

            [[layer]]
            name = "water"
            fill = "#aad3df"

            [[layer.feature]]
            type = "polygon"
            coords = [[14.40, 50.07], [14.41, 50.07], [14.41, 50.08]]

            [[layer]]
            name = "roads"
            stroke = "#ffffff"
            stroke-width = 3.5

            [[layer.feature]]
            type = "line"
            coords = [[14.42, 50.07], [14.43, 50.08]]
            label = "Main street"
        "##).unwrap();

        assert_eq!(sheet.srs, Srs::WebMercator);
        assert_eq!(sheet.background, Some(Color::hex("#f2efe9").unwrap()));
        assert_eq!(sheet.layers.len(), 2);

        let water = &sheet.layers[0];
        assert_eq!(water.stroke, None);
        assert_eq!(water.stroke_width, 1.);
        assert_eq!(water.features[0].geometry, Geometry::Polygon);

        let roads = &sheet.layers[1];
        assert_eq!(roads.stroke_width, 3.5);
        assert_eq!(roads.font_size, 10.);
        assert_eq!(roads.text, Color::BLACK);
        assert_eq!(
            roads.features[0].coords,
            [LonLat::new(14.42, 50.07), LonLat::new(14.43, 50.08)]
        );
        assert_eq!(roads.features[0].label.as_deref(), Some("Main street"));
    }

    #[test]
    fn empty_sheet() {
        let sheet = StyleSheet::from_toml("").unwrap();
        assert_eq!(sheet.srs, Srs::Geographic);
        assert!(sheet.background.is_none());
        assert!(sheet.layers.is_empty());
    }

    #[test]
    fn rejects_bad_sheets() {
        assert!(StyleSheet::from_toml("srs = \"EPSG:25833\"").is_err());
        assert!(StyleSheet::from_toml("background = \"blue\"").is_err());
        assert!(StyleSheet::from_toml("colour = \"#ffffff\"").is_err());
        assert!(StyleSheet::from_toml(r#"
            [[layer]]
            name = "roads"
            [[layer.feature]]
            type = "circle"
            coords = [[1.0, 2.0]]
        "#).is_err());

        let err = StyleSheet::from_toml(r#"
            [[layer]]
            name = "roads"
            [[layer.feature]]
            type = "line"
            coords = [[1.0, 2.0]]
        "#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<string>: layer 'roads', feature 0: a line needs at least 2 \
             coordinates"
        );
    }

    #[test]
    fn missing_file() {
        let err = StyleSheet::load("/nonexistent/style.toml").unwrap_err();
        assert_eq!(err.path(), Path::new("/nonexistent/style.toml"));
    }
}
