//! Spatial reference systems.
//!
//! We only support the two systems print maps are commonly made in:
//! spherical Web Mercator and plain geographic coordinates. Both can be
//! spelled as EPSG codes or proj4 strings.

use std::{error, fmt};
use std::convert::TryFrom;
use std::f64::consts::PI;
use std::str::FromStr;
use kurbo::Point;
use serde::Deserialize;
use crate::params::{EARTH_RADIUS, LonLat};


//------------ Srs -----------------------------------------------------------

/// A spatial reference system.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub enum Srs {
    /// Spherical Mercator on a sphere with the WGS84 equatorial radius.
    ///
    /// Coordinates are in meters.
    WebMercator,

    /// Longitude and latitude in degrees.
    #[default]
    Geographic,
}

impl Srs {
    /// Projects a geographic position into this system.
    ///
    /// Latitudes are not clamped. Projecting a pole into Web Mercator gives
    /// an infinite y coordinate.
    pub fn forward(self, pos: LonLat) -> Point {
        match self {
            Srs::WebMercator => {
                Point::new(
                    EARTH_RADIUS * pos.lon.to_radians(),
                    EARTH_RADIUS
                        * (PI / 4. + pos.lat.to_radians() / 2.).tan().ln()
                )
            }
            Srs::Geographic => Point::new(pos.lon, pos.lat)
        }
    }

    /// Returns whether coordinates are in degrees rather than meters.
    pub fn is_geographic(self) -> bool {
        matches!(self, Srs::Geographic)
    }

    fn from_epsg(code: &str) -> Option<Self> {
        match code {
            "3857" | "900913" | "3785" | "102100" | "102113" => {
                Some(Srs::WebMercator)
            }
            "4326" => Some(Srs::Geographic),
            _ => None
        }
    }

    fn from_proj4(s: &str) -> Option<Self> {
        let mut res = None;
        for item in s.split_whitespace() {
            let (key, value) = match item.split_once('=') {
                Some(pair) => pair,
                None => continue,
            };
            match key {
                "+init" => {
                    res = Self::from_epsg(value.strip_prefix("epsg:")?);
                }
                "+proj" => {
                    res = match value {
                        "merc" => Some(Srs::WebMercator),
                        "longlat" | "latlong" | "lonlat" | "latlon" => {
                            Some(Srs::Geographic)
                        }
                        _ => return None
                    }
                }
                _ => { }
            }
        }
        res
    }
}

impl FromStr for Srs {
    type Err = SrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let res = match lower.strip_prefix("epsg:") {
            Some(code) => Self::from_epsg(code),
            None => Self::from_proj4(&lower),
        };
        res.ok_or_else(|| SrsError { srs: s.into() })
    }
}

impl TryFrom<String> for Srs {
    type Error = SrsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Srs::WebMercator => {
                "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 \
                 +x_0=0.0 +y_0=0.0 +k=1.0 +units=m +nadgrids=@null \
                 +wktext +no_defs +over"
            }
            Srs::Geographic => "+proj=longlat +datum=WGS84 +no_defs",
        })
    }
}


//------------ SrsError ------------------------------------------------------

/// A spatial reference system was not understood.
#[derive(Clone, Debug)]
pub struct SrsError {
    srs: String,
}

impl fmt::Display for SrsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported spatial reference system '{}'", self.srs)
    }
}

impl error::Error for SrsError { }


//============ Testing =======================================================
