pub use self::config::Config;
pub use self::map::Map;
pub use self::params::{LonLat, PhysicalSize, PixelSize, RenderParams};
pub use self::print::{PrintError, PrintJob};
pub use self::srs::Srs;

pub mod canvas;
pub mod color;
pub mod config;
pub mod map;
pub mod params;
pub mod print;
pub mod render;
pub mod srs;
pub mod style;
pub mod surface;
