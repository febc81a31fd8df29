mod canvas;
mod app;

pub use app::{Msg, create_app};
pub use canvas::RenderCanvas;
