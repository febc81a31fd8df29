use crate::{img::Matrix2D, processing::{Halted, ProgressProvider}};
use super::{FilterBase, FilterKind, filter_option::FilterParams};


/// Why a single step didn't produce its output.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStop {
    Halted,
    Failed(String),
}

impl From<Halted> for StepStop {
    fn from(_: Halted) -> Self {
        StepStop::Halted
    }
}

pub trait Filter: Send {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop>;
    fn get_steps_num(&self, mat: &Matrix2D) -> usize;
    fn get_description(&self) -> String;
    fn kind(&self) -> FilterKind;
    /// Normalized parameters, defaults included.
    fn params(&self) -> FilterParams;
    fn get_copy(&self) -> FilterBase;
}
