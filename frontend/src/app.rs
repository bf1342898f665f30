use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{PredictionReport, PredictionStatus, Session};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

use crate::components::{final_page, result_page, scanning_page, upload_page, utils};
use crate::geo::{self, GeoPosition};
use crate::workflow::{self, WorkflowEvent, WorkflowHandle};

const GENERIC_FAILURE: &str = "The check could not be completed. Please try again.";

/// The photo the user picked, kept alongside its object URL so the
/// preview survives into the result stage.
#[derive(Clone)]
pub struct PickedFile {
    pub file: GlooFile,
    pub preview_url: ObjectUrl,
}

/// Terminal payload handed from the workflow to the display stages. Owned
/// by the app, not stashed in any navigation mechanism.
pub struct ScanOutcome {
    pub report: PredictionReport,
    pub preview_url: Option<ObjectUrl>,
}

pub enum Stage {
    Upload,
    Scanning,
    Result(ScanOutcome),
    Final,
}

pub enum Msg {
    // File operations
    FilesPicked(Vec<GlooFile>),
    ClearFile,

    // Workflow
    StartScan,
    Workflow(WorkflowEvent),
    Restart,

    // Stage navigation
    ShowMap,
    Located(GeoPosition),
    LocateFailed(String),

    // UI states
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct App {
    pub stage: Stage,
    pub session: Session,
    pub picked: Option<PickedFile>,
    pub error: Option<String>,
    pub is_dragging: bool,
    pub scan_status: Option<PredictionStatus>,
    pub position: Option<GeoPosition>,
    pub geo_error: Option<String>,
    workflow: Option<WorkflowHandle>,
    paste_listener: Option<EventListener>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut app = Self {
            stage: Stage::Upload,
            session: Session::new(),
            picked: None,
            error: None,
            is_dragging: false,
            scan_status: None,
            position: None,
            geo_error: None,
            workflow: None,
            paste_listener: None,
        };

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            app.paste_listener = Some(listener);
        }

        app
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FilesPicked(files) => self.handle_files_picked(files),
            Msg::ClearFile => {
                self.picked = None;
                true
            }

            Msg::StartScan => self.handle_start_scan(ctx),
            Msg::Workflow(event) => self.handle_workflow_event(ctx, event),
            Msg::Restart => self.handle_restart(),

            Msg::ShowMap => self.handle_show_map(ctx),
            Msg::Located(position) => {
                self.position = Some(position);
                true
            }
            Msg::LocateFailed(message) => {
                log::warn!("Geolocation failed: {message}");
                self.geo_error = Some(message);
                true
            }

            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => self.handle_drop(ctx, event),
            Msg::HandlePaste(event) => self.handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <header class="app-header">
                    <h1><i class="fa-solid fa-car"></i>{" Vehicle Condition Check"}</h1>
                    <p class="subtitle">{"Upload a photo of your car to check its condition"}</p>
                </header>

                <main class="main-content">
                    { utils::render_error_message(self) }
                    {
                        match &self.stage {
                            Stage::Upload => upload_page::render(self, ctx),
                            Stage::Scanning => scanning_page::render(self),
                            Stage::Result(outcome) => result_page::render(ctx, outcome),
                            Stage::Final => final_page::render(self, ctx),
                        }
                    }
                </main>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(handle) = self.workflow.take() {
            handle.cancel();
        }
    }
}

impl App {
    fn handle_files_picked(&mut self, files: Vec<GlooFile>) -> bool {
        if !matches!(self.stage, Stage::Upload) {
            return false;
        }

        match files.into_iter().next() {
            Some(file) => {
                let preview_url = ObjectUrl::from(file.clone());
                self.picked = Some(PickedFile { file, preview_url });
                self.error = None;
            }
            None => {
                self.error = Some("No valid image file selected.".into());
            }
        }
        true
    }

    fn handle_start_scan(&mut self, ctx: &Context<Self>) -> bool {
        let Some(picked) = &self.picked else {
            self.error = Some("Pick a photo of your car first.".into());
            return true;
        };

        // Fresh session and cancellation token; any leftovers from a
        // previous run must not reach this one.
        if let Some(old) = self.workflow.take() {
            old.cancel();
        }
        let handle = WorkflowHandle::new();
        self.session = Session::new();
        self.error = None;
        self.scan_status = None;
        self.stage = Stage::Scanning;

        workflow::spawn_upload(
            picked.file.clone(),
            handle.clone(),
            ctx.link().callback(Msg::Workflow),
        );
        self.workflow = Some(handle);
        true
    }

    fn handle_workflow_event(&mut self, ctx: &Context<Self>, event: WorkflowEvent) -> bool {
        // A missing handle means the run this event belongs to was torn
        // down; the event is stale.
        let Some(handle) = self.workflow.clone() else {
            return false;
        };

        match event {
            WorkflowEvent::ImageUploaded(image) => {
                log::info!("Image uploaded as {}", image.id);
                match self.session.image_uploaded(image.id.clone()) {
                    Ok(()) => {
                        workflow::spawn_start_prediction(
                            image.id,
                            handle,
                            ctx.link().callback(Msg::Workflow),
                        );
                        false
                    }
                    Err(err) => self.abort_with(err.to_string()),
                }
            }
            WorkflowEvent::PredictionStarted(job) => {
                log::info!("Prediction job {} started", job.id);
                match self.session.prediction_started(job.id.clone()) {
                    Ok(()) => {
                        workflow::spawn_poll_loop(
                            job.id,
                            handle,
                            ctx.link().callback(Msg::Workflow),
                        );
                        false
                    }
                    Err(err) => self.abort_with(err.to_string()),
                }
            }
            WorkflowEvent::ReportObserved(report) => {
                let status = report.status;
                match self.session.observe(report) {
                    Ok(shared::Poll::Continue) => {
                        if let shared::SessionState::JobPending { ticks, .. } =
                            self.session.state()
                        {
                            log::debug!("Prediction still {status} after {ticks} checks");
                        }
                        self.scan_status = Some(status);
                        true
                    }
                    Ok(shared::Poll::Finished(report)) => {
                        handle.cancel();
                        self.workflow = None;
                        self.stage = Stage::Result(ScanOutcome {
                            report,
                            preview_url: self.picked.as_ref().map(|p| p.preview_url.clone()),
                        });
                        true
                    }
                    Err(err) => self.abort_with(err.to_string()),
                }
            }
            WorkflowEvent::Failed(message) => self.abort_with(message),
        }
    }

    fn handle_restart(&mut self) -> bool {
        if let Some(handle) = self.workflow.take() {
            handle.cancel();
        }
        self.session = Session::new();
        self.picked = None;
        self.error = None;
        self.scan_status = None;
        self.position = None;
        self.geo_error = None;
        self.stage = Stage::Upload;
        true
    }

    fn handle_show_map(&mut self, ctx: &Context<Self>) -> bool {
        if !matches!(self.stage, Stage::Result(_)) {
            return false;
        }
        self.stage = Stage::Final;
        self.position = None;
        self.geo_error = None;
        geo::locate(
            ctx.link().callback(Msg::Located),
            ctx.link().callback(Msg::LocateFailed),
        );
        true
    }

    fn handle_drop(&mut self, ctx: &Context<Self>, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        if let Some(data_transfer) = event.data_transfer() {
            if let Some(file_list) = data_transfer.files() {
                ctx.link()
                    .send_message(Msg::FilesPicked(utils::extract_image_files(&file_list)));
            }
        }
        true
    }

    fn handle_paste(&mut self, ctx: &Context<Self>, event: ClipboardEvent) -> bool {
        if !matches!(self.stage, Stage::Upload) {
            return false;
        }
        if let Some(data_transfer) = event.clipboard_data() {
            if let Some(file_list) = data_transfer.files() {
                let files = utils::extract_image_files(&file_list);
                if !files.is_empty() {
                    event.prevent_default();
                    ctx.link().send_message(Msg::FilesPicked(files));
                    return true;
                }
            }
        }
        false
    }

    /// Ends the current session on any operation failure: the timer stops,
    /// the user sees one generic notice, and the only way forward is a new
    /// session from the upload stage.
    fn abort_with(&mut self, detail: String) -> bool {
        gloo_console::error!(format!("Workflow aborted: {detail}"));
        if let Some(handle) = self.workflow.take() {
            handle.cancel();
        }
        if let Err(err) = self.session.fail(detail) {
            log::debug!("Abort on an already-finished session: {err}");
        }
        self.error = Some(GENERIC_FAILURE.into());
        self.scan_status = None;
        self.stage = Stage::Upload;
        true
    }
}
