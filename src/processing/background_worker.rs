use std::{collections::VecDeque, sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, mpsc::{self, Receiver, Sender}}, thread::{self, JoinHandle}};
use crate::my_err::MyError;
use super::{HaltMessage, ProgressProvider, RecomputeJob, WorkerMsg};


/// One background thread running recompute jobs in the order they were put.
/// Results and progress go to `tx_result`; nothing is cached here.
pub struct RecomputeWorker {
    inner: Arc<Inner>,
    tx_halt: Sender<HaltMessage>,
    thread_handle: Option<JoinHandle<()>>,
}

impl RecomputeWorker {
    pub fn new(tx_result: Sender<WorkerMsg>) -> Result<Self, MyError> {
        let inner = Arc::new(Inner::new());
        let (tx_halt, rx_halt) = mpsc::channel::<HaltMessage>();

        let inner_arc = Arc::clone(&inner);
        let thread_handle = thread::Builder::new()
            .name("Recompute".to_string())
            .spawn(move || Self::run_loop(inner_arc, tx_result, rx_halt))?;

        Ok(RecomputeWorker { inner, tx_halt, thread_handle: Some(thread_handle) })
    }

    fn run_loop(inner: Arc<Inner>, tx_result: Sender<WorkerMsg>, rx_halt: Receiver<HaltMessage>) {
        loop {
            let guard = inner.lock();
            let mut guard = inner.cv
                .wait_while(guard, |g| g.jobs.is_empty() && !g.shutdown)
                .unwrap_or_else(PoisonError::into_inner);

            if guard.shutdown {
                break;
            }

            let job = match guard.jobs.pop_front() {
                Some(job) => job,
                None => continue,
            };
            drop(guard);

            // a halt sent before this job started was meant for an earlier one
            while rx_halt.try_recv().is_ok() {}

            log::debug!("recompute of subwindow {} rev {} started", job.subwindow_id, job.revision);

            let mut prog_prov = ProgressProvider::new(&tx_result, &rx_halt, job.subwindow_id);
            let done = job.run(&mut prog_prov);

            log::debug!("recompute of subwindow {} rev {} finished, ok: {}",
                done.subwindow_id, done.revision, done.result.is_ok());

            if tx_result.send(WorkerMsg::Completed(done)).is_err() {
                log::warn!("result receiver is gone, stopping recompute thread");
                break;
            }
        }
    }

    pub fn put_job(&self, job: RecomputeJob) {
        let mut guard = self.inner.lock();
        guard.jobs.push_back(job);
        drop(guard);

        self.inner.cv.notify_one();
    }

    /// Stops the job being run right now; queued jobs still run.
    pub fn halt(&self) {
        let _ = self.tx_halt.send(HaltMessage);
    }
}

impl Drop for RecomputeWorker {
    fn drop(&mut self) {
        let mut guard = self.inner.lock();
        guard.shutdown = true;
        guard.jobs.clear();
        drop(guard);

        self.halt();
        self.inner.cv.notify_all();

        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("recompute thread panicked");
            }
        }
    }
}


struct Inner {
    cv: Condvar,
    guarded: Mutex<Guarded>,
}

impl Inner {
    fn new() -> Self {
        Inner {
            cv: Condvar::new(),
            guarded: Mutex::new(Guarded { jobs: VecDeque::new(), shutdown: false }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Guarded> {
        self.guarded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Guarded {
    jobs: VecDeque<RecomputeJob>,
    shutdown: bool,
}
