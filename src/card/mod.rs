pub mod colors;
pub mod format;
pub mod layout;
pub mod locale;
pub mod options;
pub mod output;
pub mod postprocess;
pub mod renderer;
pub mod svg;
pub mod theme;

pub use locale::{Locale, LocaleCatalog};
pub use options::{CardOptions, OutputType};
pub use output::{Body, CardContent, CommandRasterizer, GeneratedResponse, OutputGenerator, Rasterizer};
pub use postprocess::{convert_hex_colors, remove_animations};
pub use renderer::CardRenderer;
pub use theme::{Theme, ThemeCatalog, ThemeRole};
