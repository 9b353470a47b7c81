//! The surfaces a printed map is written to.

use std::{error, fmt, fs, io, ops};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::params::PixelSize;


//------------ OutputFormat --------------------------------------------------

/// The file format of the output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
    Png,
}

impl OutputFormat {
    /// Determines the format from the extension of `path`.
    ///
    /// Anything we don’t recognize becomes a PDF.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_str(&ext.to_ascii_lowercase()).ok())
            .unwrap_or_default()
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(UnknownFormat),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        })
    }
}


//------------ Surface -------------------------------------------------------

/// An output surface backed by a file.
///
/// Vector surfaces are sized in points. Since we render at 72 DPI, one
/// pixel is one point. PNG images are kept in memory and only written out
/// when the surface is finished.
pub enum Surface {
    Pdf(cairo::PdfSurface),
    Svg(cairo::SvgSurface),
    Png(cairo::ImageSurface, PathBuf),
}

impl Surface {
    /// Creates a surface writing to `path`.
    pub fn create(
        path: impl AsRef<Path>, size: PixelSize
    ) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let (width, height) = (f64::from(size.width), f64::from(size.height));
        let res = match OutputFormat::from_path(path) {
            OutputFormat::Pdf => {
                Surface::Pdf(cairo::PdfSurface::new(width, height, path)?)
            }
            OutputFormat::Svg => {
                Surface::Svg(cairo::SvgSurface::new(
                    width, height, Some(path)
                )?)
            }
            OutputFormat::Png => {
                Surface::Png(
                    cairo::ImageSurface::create(
                        cairo::Format::ARgb32, size.width, size.height
                    )?,
                    path.into()
                )
            }
        };
        Ok(res)
    }

    pub fn format(&self) -> OutputFormat {
        match *self {
            Surface::Pdf(_) => OutputFormat::Pdf,
            Surface::Svg(_) => OutputFormat::Svg,
            Surface::Png(..) => OutputFormat::Png,
        }
    }

    /// Finishes the surface and closes the output file.
    pub fn finish(self) -> Result<(), RenderError> {
        match self {
            Surface::Pdf(surface) => {
                surface.finish();
                surface.status()?;
            }
            Surface::Svg(surface) => {
                surface.finish();
                surface.status()?;
            }
            Surface::Png(surface, path) => {
                let mut file = fs::File::create(&path)?;
                surface.write_to_png(&mut file)?;
            }
        }
        Ok(())
    }
}

impl ops::Deref for Surface {
    type Target = cairo::Surface;

    fn deref(&self) -> &Self::Target {
        match *self {
            Surface::Pdf(ref surface) => surface,
            Surface::Svg(ref surface) => surface,
            Surface::Png(ref surface, _) => surface,
        }
    }
}


//------------ UnknownFormat -------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct UnknownFormat;

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unknown output format")
    }
}

impl error::Error for UnknownFormat { }


//------------ RenderError ---------------------------------------------------

/// Rendering or writing the output failed.
#[derive(Debug)]
pub enum RenderError {
    Cairo(cairo::Error),
    Io(io::Error),
}

impl From<cairo::Error> for RenderError {
    fn from(err: cairo::Error) -> Self {
        RenderError::Cairo(err)
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl From<cairo::IoError> for RenderError {
    fn from(err: cairo::IoError) -> Self {
        match err {
            cairo::IoError::Cairo(err) => RenderError::Cairo(err),
            cairo::IoError::Io(err) => RenderError::Io(err),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RenderError::Cairo(ref err) => {
                write!(f, "rendering failed: {}", err)
            }
            RenderError::Io(ref err) => {
                write!(f, "writing output failed: {}", err)
            }
        }
    }
}

impl error::Error for RenderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            RenderError::Cairo(ref err) => Some(err),
            RenderError::Io(ref err) => Some(err),
        }
    }
}


//============ Testing =======================================================
