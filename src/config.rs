//! Configuration of a print job.

use std::{error, fmt, fs, io};
use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::params::{LonLat, MAX_ZOOM, PhysicalSize};
use crate::print::PrintJob;


//------------ Config --------------------------------------------------------

/// The configuration of a print job.
///
/// Values are collected from defaults, a config file and the command line,
/// in that order. Only the style sheet has no default.
#[derive(Clone, Debug)]
pub struct Config {
    pub style: Option<PathBuf>,
    pub output: PathBuf,
    pub center: LonLat,
    pub size: PhysicalSize,
    pub scale: f64,
    pub zoom: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            style: None,
            output: PathBuf::from("/tmp/out.pdf"),
            center: LonLat::new(14.4297185, 50.0797755),
            size: PhysicalSize::new(0.3, 0.3),
            scale: 3000.,
            zoom: 17,
        }
    }
}

impl Config {
    /// Applies the values present in a config file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(style) = file.style {
            self.style = Some(style)
        }
        if let Some(output) = file.output {
            self.output = output
        }
        if let Some(center) = file.center {
            self.center = center
        }
        if let Some(size) = file.size {
            self.size = size
        }
        if let Some(scale) = file.scale {
            self.scale = scale
        }
        if let Some(zoom) = file.zoom {
            self.zoom = zoom
        }
    }

    /// Converts the config into a print job.
    pub fn into_job(self) -> Result<PrintJob, ConfigError> {
        let style = self.style.ok_or(ConfigError::MissingStyle)?;
        if self.zoom > MAX_ZOOM {
            return Err(ConfigError::ZoomTooLarge(self.zoom))
        }
        Ok(PrintJob {
            output: self.output,
            style,
            center: self.center,
            size: self.size,
            scale_denominator: self.scale,
            zoom: self.zoom,
        })
    }
}


//------------ ConfigFile ----------------------------------------------------

/// The content of a config file.
///
/// Relative paths are relative to the directory of the config file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub style: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub center: Option<LonLat>,
    pub size: Option<PhysicalSize>,
    pub scale: Option<f64>,
    pub zoom: Option<u8>,
}

impl ConfigFile {
    /// Loads the config file at `path`.
    ///
    /// If the file doesn’t exist and `insist` is `false`, returns `None`.
    pub fn load(
        path: impl AsRef<Path>, insist: bool
    ) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                if !matches!(err.kind(), io::ErrorKind::NotFound) || insist {
                    return Err(ConfigError::Read(path.into(), err))
                }
                return Ok(None)
            }
        };
        let mut res: Self = toml::from_str(&content).map_err(|err| {
            ConfigError::Parse(path.into(), err)
        })?;
        if let Some(base_dir) = path.parent() {
            res.prepare(base_dir);
        }
        Ok(Some(res))
    }

    fn prepare(&mut self, base_dir: &Path) {
        if let Some(style) = self.style.as_mut() {
            *style = base_dir.join(&*style);
        }
        if let Some(output) = self.output.as_mut() {
            *output = base_dir.join(&*output);
        }
    }
}


//------------ ConfigError ---------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Read(PathBuf, io::Error),
    Parse(PathBuf, toml::de::Error),
    MissingStyle,
    ZoomTooLarge(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Read(ref path, ref err) => {
                write!(f,
                    "Failed to read config file {}: {}", path.display(), err
                )
            }
            ConfigError::Parse(ref path, ref err) => {
                write!(f,
                    "Failed to parse config file {}: {}", path.display(), err
                )
            }
            ConfigError::MissingStyle => {
                f.write_str("Style sheet not provided.")
            }
            ConfigError::ZoomTooLarge(zoom) => {
                write!(f,
                    "Zoom level {} exceeds the maximum of {}.", zoom, MAX_ZOOM
                )
            }
        }
    }
}

impl error::Error for ConfigError { }


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.output, Path::new("/tmp/out.pdf"));
        assert_eq!(config.zoom, 17);
        assert!(matches!(
            config.into_job(), Err(ConfigError::MissingStyle)
        ));
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osmprint.conf");
        fs::write(&path, r#"
            style = "carto/style.toml"
            output = "/srv/maps/prague.pdf"
            center = [14.42, 50.08]
            scale = 5000
            zoom = 16
        "#).unwrap();

        let mut config = Config::default();
        config.apply_file(ConfigFile::load(&path, true).unwrap().unwrap());
        let job = config.into_job().unwrap();
        assert_eq!(job.style, dir.path().join("carto/style.toml"));
        assert_eq!(job.output, Path::new("/srv/maps/prague.pdf"));
        assert_eq!(job.center, LonLat::new(14.42, 50.08));
        assert_eq!(job.size, PhysicalSize::new(0.3, 0.3));
        assert_eq!(job.scale_denominator, 5000.);
        assert_eq!(job.zoom, 16);
    }

    #[test]
    fn missing_file() {
        let path = Path::new("/nonexistent/osmprint.conf");
        assert!(ConfigFile::load(path, false).unwrap().is_none());
        assert!(ConfigFile::load(path, true).is_err());
    }

    #[test]
    fn bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osmprint.conf");
        fs::write(&path, "zoom = \"seventeen\"").unwrap();
        assert!(matches!(
            ConfigFile::load(&path, true), Err(ConfigError::Parse(..))
        ));
        fs::write(&path, "colour = \"blue\"").unwrap();
        assert!(ConfigFile::load(&path, true).is_err());
    }

    #[test]
    fn zoom_limit() {
        let config = Config {
            style: Some("style.toml".into()),
            zoom: MAX_ZOOM + 1,
            .. Default::default()
        };
        assert!(matches!(
            config.into_job(), Err(ConfigError::ZoomTooLarge(_))
        ));
    }
}
