//! Async driver for one check session: upload, start prediction, then an
//! await-then-schedule polling loop.
//!
//! Each step runs as a single `spawn_local` future and reports back to the
//! `App` component through a callback. The loop sleeps first and awaits
//! each status check before scheduling the next, so there is never more
//! than one prediction check in flight.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo_console::error;
use gloo_file::File as GlooFile;
use gloo_timers::future::sleep;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use shared::{ImageId, PredictionId, PredictionJob, PredictionReport, UploadedImage};

use crate::api::{self, ApiError};

pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

pub enum WorkflowEvent {
    ImageUploaded(UploadedImage),
    PredictionStarted(PredictionJob),
    /// One poll observation, terminal or not. The loop stops itself after
    /// emitting a terminal one.
    ReportObserved(PredictionReport),
    Failed(String),
}

/// Cancellation token shared between the `App` and the futures it spawns.
/// A response that was already in flight when `cancel` ran is discarded at
/// the first check after its await point.
#[derive(Clone, Default)]
pub struct WorkflowHandle {
    cancelled: Rc<Cell<bool>>,
}

impl WorkflowHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

pub fn spawn_upload(file: GlooFile, handle: WorkflowHandle, notify: Callback<WorkflowEvent>) {
    spawn_local(async move {
        let outcome = api::upload_image(&file).await;
        if handle.is_cancelled() {
            return;
        }
        match outcome {
            Ok(image) => notify.emit(WorkflowEvent::ImageUploaded(image)),
            Err(err) => {
                error!(format!("Upload error: {err}"));
                notify.emit(WorkflowEvent::Failed(err.to_string()));
            }
        }
    });
}

pub fn spawn_start_prediction(
    image: ImageId,
    handle: WorkflowHandle,
    notify: Callback<WorkflowEvent>,
) {
    spawn_local(async move {
        let outcome = api::start_prediction(&image).await;
        if handle.is_cancelled() {
            return;
        }
        match outcome {
            Ok(job) => notify.emit(WorkflowEvent::PredictionStarted(job)),
            Err(err) => {
                error!(format!("Prediction request error: {err}"));
                notify.emit(WorkflowEvent::Failed(err.to_string()));
            }
        }
    });
}

/// What one completed status check means for the loop.
pub(crate) enum Tick {
    /// Forward the observation and schedule the next check.
    Observed(WorkflowEvent),
    /// Forward and stop: terminal status or transport error.
    Last(WorkflowEvent),
    /// Cancellation won the race against the in-flight response; nothing
    /// reaches the app.
    Discarded,
}

pub(crate) fn tick_outcome(outcome: Result<PredictionReport, ApiError>, cancelled: bool) -> Tick {
    if cancelled {
        return Tick::Discarded;
    }
    match outcome {
        Ok(report) if report.status.is_terminal() => {
            Tick::Last(WorkflowEvent::ReportObserved(report))
        }
        Ok(report) => Tick::Observed(WorkflowEvent::ReportObserved(report)),
        Err(err) => Tick::Last(WorkflowEvent::Failed(err.to_string())),
    }
}

/// Polls the job every `POLL_INTERVAL` until a terminal status, a
/// transport error, or cancellation. A transport error on any tick ends
/// the loop; ticks are never retried.
pub fn spawn_poll_loop(job: PredictionId, handle: WorkflowHandle, notify: Callback<WorkflowEvent>) {
    spawn_local(async move {
        loop {
            sleep(POLL_INTERVAL).await;
            if handle.is_cancelled() {
                return;
            }

            let outcome = api::fetch_prediction(&job).await;
            if let Err(err) = &outcome {
                error!(format!("Poll error: {err}"));
            }

            match tick_outcome(outcome, handle.is_cancelled()) {
                Tick::Observed(event) => notify.emit(event),
                Tick::Last(event) => {
                    notify.emit(event);
                    return;
                }
                Tick::Discarded => return,
            }
        }
    });
}
