//! Printing a map.

use std::{error, fmt};
use std::path::PathBuf;
use crate::map::Map;
use crate::params::{
    LonLat, PhysicalSize, RenderParams, render_scale_factor
};
use crate::style::StyleError;
use crate::surface::{RenderError, Surface};


/// The size of the map before the style is loaded.
const INITIAL_MAP_SIZE: i32 = 256;


//------------ PrintJob ------------------------------------------------------

/// Everything needed to print a map.
#[derive(Clone, Debug)]
pub struct PrintJob {
    /// The path of the output file.
    pub output: PathBuf,

    /// The path of the style sheet.
    pub style: PathBuf,

    /// The center of the map.
    pub center: LonLat,

    /// The size of the printed map in meters.
    pub size: PhysicalSize,

    /// The scale denominator of the printed map.
    pub scale_denominator: f64,

    /// The zoom level whose symbol sizes the map is rendered with.
    pub zoom: u8,
}

impl PrintJob {
    /// Renders the map and writes it to the output file.
    ///
    /// The output is finished and closed even if rendering fails.
    pub fn run(&self) -> Result<RenderParams, PrintError> {
        let mut map = Map::new(INITIAL_MAP_SIZE, INITIAL_MAP_SIZE);
        map.load_style(&self.style)?;

        let params = RenderParams::compute(
            self.center, self.size, self.scale_denominator, map.srs()
        );
        log::info!(
            "printing {} at 1:{} around {} as {}",
            self.size, self.scale_denominator, self.center,
            params.pixel_size
        );
        log::debug!("extent: {:?}", params.extent);

        map.resize(params.pixel_size);
        map.zoom_to_box(params.extent);

        let scale_factor = render_scale_factor(
            self.zoom, map.scale_denominator()
        );
        log::debug!(
            "map scale denominator {:.1}, scale factor {:.4} for zoom {}",
            map.scale_denominator(), scale_factor, self.zoom
        );

        let surface = Surface::create(&self.output, params.pixel_size)?;
        let rendered = map.render(&surface, scale_factor, 0., 0.);
        let finished = surface.finish();
        rendered.map_err(RenderError::from)?;
        finished?;

        log::info!("wrote {}", self.output.display());
        Ok(params)
    }
}


//------------ PrintError ----------------------------------------------------

/// Printing a map failed.
#[derive(Debug)]
pub enum PrintError {
    Style(StyleError),
    Render(RenderError),
}

impl From<StyleError> for PrintError {
    fn from(err: StyleError) -> Self {
        PrintError::Style(err)
    }
}

impl From<RenderError> for PrintError {
    fn from(err: RenderError) -> Self {
        PrintError::Render(err)
    }
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PrintError::Style(ref err) => {
                write!(f, "failed to load style {}", err)
            }
            PrintError::Render(ref err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for PrintError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            PrintError::Style(ref err) => Some(err),
            PrintError::Render(ref err) => Some(err),
        }
    }
}


//============ Testing =======================================================

#[cfg(test)]
mod test {
    use std::fs;
    use crate::params::PixelSize;
    use super::*;

    const STYLE: &str = r##"
        srs = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +wktext +no_defs +over"
        background = "#f2efe9"

        [[layer]]
        name = "park"
        fill = "#c8facc"
        stroke = "#8fbf8f"

        [[layer.feature]]
        type = "polygon"
        coords = [
            [14.4280, 50.0790], [14.4310, 50.0790],
            [14.4310, 50.0805], [14.4280, 50.0805],
        ]
        label = "Park"

        [[layer]]
        name = "roads"
        stroke = "#ffffff"
        stroke-width = 6.0

        [[layer.feature]]
        type = "line"
        coords = [[14.4250, 50.0797755], [14.4350, 50.0797755]]

        [[layer]]
        name = "stops"
        fill = "#1e90ff"
        radius = 4.0

        [[layer.feature]]
        type = "point"
        coords = [[14.4297185, 50.0797755]]

        [[layer.feature]]
        type = "point"
        coords = [[15.0, 51.0]]
    "##;

    fn job(dir: &tempfile::TempDir, output: &str) -> PrintJob {
        let style = dir.path().join("style.toml");
        fs::write(&style, STYLE).unwrap();
        PrintJob {
            output: dir.path().join(output),
            style,
            center: LonLat::new(14.4297185, 50.0797755),
            size: PhysicalSize::new(0.3, 0.3),
            scale_denominator: 3000.,
            zoom: 17,
        }
    }

    #[test]
    fn print_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, "out.pdf");
        let params = job.run().unwrap();
        assert_eq!(params.pixel_size, PixelSize::new(850, 850));
        assert!((params.extent.width() - 1401.9).abs() < 0.1);

        let data = fs::read(&job.output).unwrap();
        assert!(data.starts_with(b"%PDF"));
        assert!(data.len() > 100);
    }

    #[test]
    fn print_png() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, "out.png");
        job.run().unwrap();
        let data = fs::read(&job.output).unwrap();
        assert!(data.starts_with(b"\x89PNG"));
    }

    #[test]
    fn missing_style_fails_before_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(&dir, "out.pdf");
        job.style = dir.path().join("missing.toml");
        assert!(matches!(job.run(), Err(PrintError::Style(_))));
        assert!(!job.output.exists());
    }

    #[test]
    fn failed_render_still_finishes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(&dir, "out.pdf");
        // A zero scale collapses the extent to a point.
        job.scale_denominator = 0.;
        assert!(matches!(
            job.run(),
            Err(PrintError::Render(RenderError::Cairo(
                cairo::Error::InvalidMatrix
            )))
        ));

        let data = fs::read(&job.output).unwrap();
        assert!(data.starts_with(b"%PDF"));
        let end = data.iter().rposition(|ch| !ch.is_ascii_whitespace());
        let end = end.map(|pos| pos + 1).unwrap_or(0);
        assert!(data[..end].ends_with(b"%%EOF"));
    }

    #[test]
    fn unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(&dir, "out.pdf");
        job.output = dir.path().join("no/such/dir/out.png");
        assert!(matches!(job.run(), Err(PrintError::Render(_))));
    }
}
