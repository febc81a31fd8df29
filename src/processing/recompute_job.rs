use std::sync::Arc;
use crate::{display::{self, ColorLut, DisplaySettings}, filter::FilterChain, img::{ImageBuffer, Renderable}, my_err::MyError};
use super::ProgressProvider;


/// Self-contained snapshot of everything one recompute needs, so it can run off the UI thread
/// while the subwindow keeps accepting edits.
#[derive(Clone)]
pub struct RecomputeJob {
    pub subwindow_id: usize,
    pub revision: u64,
    pub image: Arc<ImageBuffer>,
    pub settings: DisplaySettings,
    pub chain: FilterChain,
    pub lut: ColorLut,
}

#[derive(Debug)]
pub struct RecomputeDone {
    pub subwindow_id: usize,
    pub revision: u64,
    pub result: Result<Renderable, MyError>,
}

impl RecomputeJob {
    pub fn get_steps_num(&self) -> usize {
        display::get_steps_num(&self.image, &self.chain)
    }

    pub fn run(&self, prog_prov: &mut ProgressProvider) -> RecomputeDone {
        prog_prov.reset(self.get_steps_num());

        let result = display::render(&self.image, &self.settings, &self.chain, &self.lut, prog_prov);

        RecomputeDone {
            subwindow_id: self.subwindow_id,
            revision: self.revision,
            result,
        }
    }
}
