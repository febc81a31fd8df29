use std::sync::Arc;
use crate::{
    display::{self, Colormap, ColormapRegistry, DisplaySettings},
    filter::{FilterChain, filter_option::FilterParams},
    img::{ImageBuffer, Renderable},
    my_err::MyError,
    processing::{ProgressProvider, RecomputeDone, RecomputeJob},
};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubwindowState {
    /// The cached renderable matches the current image, settings and chain.
    Fresh,
    /// An input changed since the last successful recompute.
    Stale,
}

/// One view of a shared image with its own settings and filter chain.
///
/// Every successful mutation makes the view `Stale` and bumps its revision;
/// only a successful recompute of the latest revision makes it `Fresh` again.
/// The last good renderable stays available while stale.
pub struct Subwindow {
    id: usize,
    title: String,
    image: Arc<ImageBuffer>,
    settings: DisplaySettings,
    chain: FilterChain,
    colormaps: Arc<ColormapRegistry>,
    cached: Renderable,
    state: SubwindowState,
    revision: u64,
    in_flight: Option<u64>,
    failed: Option<u64>,
}

impl Subwindow {
    pub fn new(id: usize, title: &str, image: Arc<ImageBuffer>, colormaps: Arc<ColormapRegistry>) -> Result<Self, MyError> {
        let settings = DisplaySettings::for_image(&image);
        Self::with_settings(id, title, image, colormaps, settings)
    }

    pub fn with_settings(
        id: usize,
        title: &str,
        image: Arc<ImageBuffer>,
        colormaps: Arc<ColormapRegistry>,
        settings: DisplaySettings) -> Result<Self, MyError>
    {
        let chain = FilterChain::new();
        let cached = display::render(&image, &settings, &chain,
            colormaps.lut(settings.colormap()), &mut ProgressProvider::silent())?;

        log::info!("subwindow {} '{}' opened on {}", id, title, image.get_description());

        Ok(Subwindow {
            id,
            title: title.to_string(),
            image,
            settings,
            chain,
            colormaps,
            cached,
            state: SubwindowState::Fresh,
            revision: 0,
            in_flight: None,
            failed: None,
        })
    }

    pub fn id(&self) -> usize { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn image(&self) -> &Arc<ImageBuffer> { &self.image }
    pub fn settings(&self) -> &DisplaySettings { &self.settings }
    pub fn chain(&self) -> &FilterChain { &self.chain }
    pub fn state(&self) -> SubwindowState { self.state }
    pub fn revision(&self) -> u64 { self.revision }
    pub fn is_recompute_in_flight(&self) -> bool { self.in_flight.is_some() }

    /// Stale, nothing sent out, and the current revision hasn't already failed.
    pub fn needs_recompute(&self) -> bool {
        self.state == SubwindowState::Stale
            && self.in_flight.is_none()
            && self.failed != Some(self.revision)
    }

    fn mutate<Op>(&mut self, what: &str, op: Op) -> Result<(), MyError>
        where Op: FnOnce(&mut DisplaySettings, &mut FilterChain) -> Result<(), MyError>
    {
        match op(&mut self.settings, &mut self.chain) {
            Ok(()) => {
                self.mark_stale(what);
                Ok(())
            },
            Err(err) => {
                log::warn!("subwindow {}: {} rejected: {}", self.id, what, err);
                Err(err)
            }
        }
    }

    fn mark_stale(&mut self, what: &str) {
        self.state = SubwindowState::Stale;
        self.revision += 1;
        log::debug!("subwindow {}: {}, now rev {}", self.id, what, self.revision);
    }

    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.settings.set_colormap(colormap);
        self.mark_stale("colormap");
    }

    pub fn set_colormap_by_name(&mut self, name: &str) -> Result<(), MyError> {
        self.mutate("colormap", |s, _| s.set_colormap_by_name(name))
    }

    pub fn set_contrast(&mut self, lower: f64, upper: f64) -> Result<(), MyError> {
        self.mutate("contrast", |s, _| s.set_contrast(lower, upper))
    }

    pub fn set_auto_contrast(&mut self) {
        self.settings.set_auto_contrast();
        self.mark_stale("auto contrast");
    }

    pub fn set_dc_offset(&mut self, dc_offset: f64) -> Result<(), MyError> {
        self.mutate("DC offset", |s, _| s.set_dc_offset(dc_offset))
    }

    pub fn set_aspect(&mut self, aspect: Option<f64>) -> Result<(), MyError> {
        self.mutate("aspect", |s, _| s.set_aspect(aspect))
    }

    pub fn append_filter(&mut self, name: &str, params: &FilterParams) -> Result<(), MyError> {
        self.mutate("filter appended", |_, c| c.append(name, params))
    }

    pub fn remove_filter(&mut self, index: usize) -> Result<(), MyError> {
        self.mutate("filter removed", |_, c| c.remove(index))
    }

    pub fn replace_filter(&mut self, index: usize, name: &str, params: &FilterParams) -> Result<(), MyError> {
        self.mutate("filter replaced", |_, c| c.replace(index, name, params))
    }

    pub fn move_filter_up(&mut self, index: usize) -> Result<(), MyError> {
        self.mutate("filter moved up", |_, c| c.move_up(index))
    }

    pub fn move_filter_down(&mut self, index: usize) -> Result<(), MyError> {
        self.mutate("filter moved down", |_, c| c.move_down(index))
    }

    pub fn clear_filters(&mut self) {
        self.chain.clear();
        self.mark_stale("filters cleared");
    }

    /// Swaps in a whole configuration at once, e.g. a loaded project.
    pub fn set_configuration(&mut self, settings: DisplaySettings, chain: FilterChain) {
        self.settings = settings;
        self.chain = chain;
        self.mark_stale("configuration replaced");
    }

    /// Renders synchronously. On failure the view stays `Stale` and keeps the last good renderable.
    pub fn recompute(&mut self) -> Result<(), MyError> {
        if self.state == SubwindowState::Fresh {
            return Ok(());
        }

        let job = self.snapshot();
        let done = job.run(&mut ProgressProvider::silent());
        self.accept(done).map(|_| ())
    }

    /// The current renderable; fails with `StaleBuffer` until the view is recomputed.
    pub fn renderable(&self) -> Result<&Renderable, MyError> {
        match self.state {
            SubwindowState::Fresh => Ok(&self.cached),
            SubwindowState::Stale => Err(MyError::StaleBuffer),
        }
    }

    /// Whatever was rendered last, stale or not.
    pub fn last_good(&self) -> &Renderable { &self.cached }

    /// Snapshot for a background recompute. One job per subwindow at a time.
    pub fn begin_recompute(&mut self) -> Result<RecomputeJob, MyError> {
        if self.in_flight.is_some() {
            return Err(MyError::RecomputeInFlight);
        }
        let job = self.snapshot();
        self.in_flight = Some(job.revision);
        log::debug!("subwindow {}: recompute of rev {} sent out", self.id, job.revision);
        Ok(job)
    }

    /// Takes a finished job back. `Ok(true)` when it became the displayed
    /// renderable, `Ok(false)` when a later mutation made it obsolete.
    pub fn finish_recompute(&mut self, done: RecomputeDone) -> Result<bool, MyError> {
        if done.subwindow_id != self.id {
            return Err(MyError::new(format!(
                "recompute of subwindow {} delivered to subwindow {}", done.subwindow_id, self.id)));
        }
        self.in_flight = None;
        self.accept(done)
    }

    fn snapshot(&self) -> RecomputeJob {
        RecomputeJob {
            subwindow_id: self.id,
            revision: self.revision,
            image: Arc::clone(&self.image),
            settings: self.settings.clone(),
            chain: self.chain.clone(),
            lut: self.colormaps.lut(self.settings.colormap()).clone(),
        }
    }

    fn accept(&mut self, done: RecomputeDone) -> Result<bool, MyError> {
        if done.revision != self.revision {
            log::debug!("subwindow {}: rev {} is obsolete, now at rev {}", self.id, done.revision, self.revision);
            return Ok(false);
        }

        match done.result {
            Ok(renderable) => {
                log::debug!("subwindow {}: rev {} rendered, {}", self.id, done.revision, renderable.get_description());
                self.cached = renderable;
                self.state = SubwindowState::Fresh;
                Ok(true)
            },
            Err(err) => {
                log::error!("subwindow {}: recompute of rev {} failed: {}", self.id, done.revision, err);
                self.failed = Some(done.revision);
                Err(err)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::img::Metadata;
    use super::*;

    fn subwindow() -> Subwindow {
        let image = ImageBuffer::new("t", 3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0], Metadata::new()).unwrap();
        let colormaps = ColormapRegistry::load_embedded().unwrap();
        Subwindow::new(1, "test", Arc::new(image), Arc::new(colormaps)).unwrap()
    }

    #[test]
    fn starts_fresh() {
        let sw = subwindow();
        assert_eq!(sw.state(), SubwindowState::Fresh);
        let r = sw.renderable().unwrap();
        assert_eq!((r.w(), r.h()), (3, 2));
    }

    #[test]
    fn rejected_mutation_keeps_fresh() {
        let mut sw = subwindow();
        assert!(sw.set_contrast(2.0, 1.0).is_err());
        assert!(sw.append_filter("Sharpen", &FilterParams::new()).is_err());
        assert_eq!(sw.state(), SubwindowState::Fresh);
        assert_eq!(sw.revision(), 0);
    }

    #[test]
    fn stale_until_recomputed() {
        let mut sw = subwindow();
        sw.set_dc_offset(1.0).unwrap();
        assert_eq!(sw.renderable().err(), Some(MyError::StaleBuffer));

        sw.recompute().unwrap();
        assert_eq!(sw.renderable().unwrap().intensities().pixels()[0], -1.0);
    }

    #[test]
    fn failed_recompute_keeps_last_good() {
        let mut sw = subwindow();
        let before = sw.last_good().clone();

        sw.append_filter("DC Offset", &FilterParams::new().with("offset", 10)).unwrap();
        sw.append_filter("Log Transform", &FilterParams::new()).unwrap();

        assert!(matches!(sw.recompute(), Err(MyError::FilterExecution { index: 1, .. })));
        assert_eq!(sw.state(), SubwindowState::Stale);
        assert_eq!(sw.last_good(), &before);
        assert!(!sw.needs_recompute());

        sw.remove_filter(1).unwrap();
        assert!(sw.needs_recompute());
    }

    #[test]
    fn infallible_edits_bump_the_revision() {
        let mut sw = subwindow();
        sw.set_colormap(Colormap::Bone);
        sw.set_auto_contrast();
        sw.clear_filters();
        assert_eq!(sw.revision(), 3);

        let (settings, chain) = (sw.settings().clone(), sw.chain().clone());
        sw.set_configuration(settings, chain);
        assert_eq!(sw.revision(), 4);
        assert_eq!(sw.state(), SubwindowState::Stale);
    }

    #[test]
    fn obsolete_job_is_dropped() {
        let mut sw = subwindow();
        sw.set_colormap(Colormap::Hot);

        let job = sw.begin_recompute().unwrap();
        assert_eq!(sw.begin_recompute().err(), Some(MyError::RecomputeInFlight));

        sw.set_colormap(Colormap::Jet);
        let done = job.run(&mut ProgressProvider::silent());
        assert_eq!(sw.finish_recompute(done), Ok(false));
        assert_eq!(sw.state(), SubwindowState::Stale);

        let job = sw.begin_recompute().unwrap();
        let done = job.run(&mut ProgressProvider::silent());
        assert_eq!(sw.finish_recompute(done), Ok(true));
        assert_eq!(sw.renderable().unwrap().colormap(), Colormap::Jet);
    }
}
