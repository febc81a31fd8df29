mod colormap;
mod settings;
mod pipeline;

pub use colormap::{ColorLut, Colormap, ColormapRegistry};
pub use settings::{Contrast, DisplaySettings};
pub use pipeline::{get_steps_num, level_of, render};
