//! The worker side of the coordinator.
//!
//! One iteration, with the session lock held throughout:
//!
//! 1. shutdown requested: stop;
//! 2. not running: nothing to do (the thread waits on the condvar);
//! 3. `Active`: tick, with a full or incremental redraw;
//! 4. `Initializable`: enter the algorithm and draw the first frame;
//! 5. otherwise the search has just finished: stop running, validate, and
//!    ask the UI for a repaint once the lock is released.
//!
//! Between iterations the thread waits out the worker interval, waking
//! early only for shutdown. The stop flag is read without the session lock;
//! since a shutdown notification can land between the idle check and the
//! wait, idle waits are bounded by the shutdown poll.

use std::sync::PoisonError;

use crate::coordinator::{BenchState, Shared};
use crate::lifecycle::BeginMode;

/// What one worker iteration did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerStep {
    /// Not running; nothing done.
    Idle,
    /// Entered the algorithm.
    Began,
    /// Ticked an active search.
    Ticked,
    /// Stopped after the search finished.
    Finished,
    /// Shutdown requested.
    Stopped,
}

impl BenchState {
    /// Steps 3 to 5. The caller has checked `running`.
    fn drive(&mut self) -> WorkerStep {
        if self.session.can_run() {
            self.tick(BeginMode::Run);
            WorkerStep::Ticked
        } else if self.session.can_initialize() {
            self.begin(BeginMode::Run);
            WorkerStep::Began
        } else {
            self.running = false;
            self.validate_if_done();
            log::info!("run finished in state {:?}", self.session.state());
            WorkerStep::Finished
        }
    }

    fn next_step(&mut self, stopping: bool) -> WorkerStep {
        if stopping {
            WorkerStep::Stopped
        } else if !self.running {
            WorkerStep::Idle
        } else {
            self.drive()
        }
    }
}

fn after_iteration(shared: &Shared, step: WorkerStep) {
    if step == WorkerStep::Finished {
        shared.repaint.request_repaint();
    }
}

/// One non-blocking iteration.
pub(crate) fn iterate(shared: &Shared) -> WorkerStep {
    let step = shared.lock().next_step(shared.stopping());
    after_iteration(shared, step);
    step
}

/// Worker thread body.
pub(crate) fn run(shared: &Shared) {
    log::debug!("worker started");
    loop {
        let step = {
            let st = shared.lock();
            let (mut st, _) = shared
                .wake
                .wait_timeout_while(st, shared.poll, |s| !s.running && !shared.stopping())
                .unwrap_or_else(PoisonError::into_inner);
            st.next_step(shared.stopping())
        };
        match step {
            WorkerStep::Stopped => break,
            // Timed out waiting for a run; check again.
            WorkerStep::Idle => continue,
            _ => after_iteration(shared, step),
        }

        let st = shared.lock();
        drop(
            shared
                .wake
                .wait_timeout_while(st, shared.interval, |_| !shared.stopping())
                .unwrap_or_else(PoisonError::into_inner),
        );
    }
    log::debug!("worker stopped");
    shared.acknowledge_shutdown();
}
