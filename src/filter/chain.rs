use std::fmt;
use crate::{img::Matrix2D, my_err::MyError, processing::ProgressProvider};
use super::{FilterBase, FilterKind, filter_option::FilterParams, filter_trait::StepStop, try_create_filter};


/// Ordered filter steps applied one after another.
#[derive(Default)]
pub struct FilterChain {
    steps: Vec<FilterBase>,
}

impl FilterChain {
    pub fn new() -> Self {
        FilterChain { steps: Vec::new() }
    }

    pub fn len(&self) -> usize { self.steps.len() }
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Validates `name` and `params` before the step is added; nothing changes on error.
    pub fn append(&mut self, name: &str, params: &FilterParams) -> Result<(), MyError> {
        let filter = try_create_filter(name, params)?;
        log::debug!("chain step {} added: {}", self.steps.len(), filter.get_description());
        self.steps.push(filter);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<(), MyError> {
        self.check_index(index)?;
        let filter = self.steps.remove(index);
        log::debug!("chain step {} removed: {}", index, filter.get_description());
        Ok(())
    }

    pub fn replace(&mut self, index: usize, name: &str, params: &FilterParams) -> Result<(), MyError> {
        self.check_index(index)?;
        let filter = try_create_filter(name, params)?;
        self.steps[index] = filter;
        Ok(())
    }

    pub fn move_up(&mut self, index: usize) -> Result<(), MyError> {
        self.check_index(index)?;
        if index > 0 {
            self.steps.swap(index - 1, index);
        }
        Ok(())
    }

    pub fn move_down(&mut self, index: usize) -> Result<(), MyError> {
        self.check_index(index)?;
        if index + 1 < self.steps.len() {
            self.steps.swap(index, index + 1);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// `(kind, normalized params)` of every step, in order.
    pub fn steps(&self) -> Vec<(FilterKind, FilterParams)> {
        self.steps.iter().map(|f| (f.kind(), f.params())).collect()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.steps.iter().map(|f| f.get_description()).collect()
    }

    pub fn get_steps_num(&self, mat: &Matrix2D) -> usize {
        self.steps.iter().map(|f| f.get_steps_num(mat)).sum()
    }

    pub fn apply(&self, mat: &Matrix2D) -> Result<Matrix2D, MyError> {
        self.apply_with_progress(mat, &mut ProgressProvider::silent())
    }

    pub fn apply_with_progress(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, MyError> {
        let mut cur = mat.clone();

        for (index, filter) in self.steps.iter().enumerate() {
            let name = filter.kind().name().to_string();

            cur = filter.process(&cur, prog_prov).map_err(|stop| match stop {
                StepStop::Halted => MyError::Halted,
                StepStop::Failed(msg) => MyError::FilterExecution { name: name.clone(), index, msg },
            })?;

            if !cur.all_finite() {
                return Err(MyError::FilterExecution {
                    name,
                    index,
                    msg: "produced non-finite values".to_string(),
                });
            }

            log::trace!("chain step {} ({}) done", index, filter.get_description());
        }

        Ok(cur)
    }

    fn check_index(&self, index: usize) -> Result<(), MyError> {
        if index >= self.steps.len() {
            return Err(MyError::IndexOutOfRange { index, len: self.steps.len() });
        }
        Ok(())
    }
}

impl Clone for FilterChain {
    fn clone(&self) -> Self {
        FilterChain { steps: self.steps.iter().map(|f| f.get_copy()).collect() }
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptions()).finish()
    }
}

impl PartialEq for FilterChain {
    fn eq(&self, other: &Self) -> bool {
        self.steps() == other.steps()
    }
}
