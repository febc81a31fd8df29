use std::{sync::mpsc::{Receiver, Sender}, time};
use super::WorkerMsg;


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halted;

pub struct HaltMessage;

/// Counts completed actions of a running recompute, reports percents and
/// checks for a halt request between actions.
pub struct ProgressProvider<'own> {
    tx_progress: Option<&'own Sender<WorkerMsg>>,
    rx_halt: Option<&'own Receiver<HaltMessage>>,
    subwindow_id: usize,
    pr_data: ProgressData,
    halted: bool,
}

impl<'own> ProgressProvider<'own> {
    pub fn new(tx_progress: &'own Sender<WorkerMsg>, rx_halt: &'own Receiver<HaltMessage>, subwindow_id: usize) -> Self {
        ProgressProvider {
            tx_progress: Some(tx_progress),
            rx_halt: Some(rx_halt),
            subwindow_id,
            pr_data: ProgressData::new(),
            halted: false,
        }
    }

    /// No reporting and no halting, for synchronous recomputes on the UI thread.
    pub fn silent() -> ProgressProvider<'static> {
        ProgressProvider {
            tx_progress: None,
            rx_halt: None,
            subwindow_id: 0,
            pr_data: ProgressData::new(),
            halted: false,
        }
    }

    pub fn reset(&mut self, actions_count: usize) {
        self.pr_data = ProgressData::new();
        self.pr_data.all_actions_count = actions_count;
    }

    const MS_DELAY: u128 = 100;

    pub fn complete_action(&mut self) -> Result<(), Halted> {
        if let Some(rx_halt) = self.rx_halt {
            if rx_halt.try_recv().is_ok() {
                self.halted = true;
            }
        }
        if self.halted {
            return Err(Halted);
        }

        self.pr_data.completed_actions_count += 1;

        if let Some(tx) = self.tx_progress {
            if self.pr_data.prev_time.elapsed().as_millis() > Self::MS_DELAY {
                self.pr_data.prev_time = time::Instant::now();
                let _ = tx.send(WorkerMsg::Progress { subwindow_id: self.subwindow_id, percents: self.percents() });
            }
        }

        Ok(())
    }

    pub fn percents(&self) -> usize {
        if self.pr_data.all_actions_count == 0 {
            return 100;
        }
        self.pr_data.completed_actions_count * 100 / self.pr_data.all_actions_count
    }

    pub fn completed_actions(&self) -> usize { self.pr_data.completed_actions_count }

    pub fn all_actions_completed(&self) -> bool {
        self.pr_data.all_actions_count == self.pr_data.completed_actions_count
    }
}


struct ProgressData {
    all_actions_count: usize,
    completed_actions_count: usize,
    prev_time: time::Instant,
}

impl ProgressData {
    fn new() -> Self {
        ProgressData {
            all_actions_count: 0,
            completed_actions_count: 0,
            prev_time: time::Instant::now(),
        }
    }
}
