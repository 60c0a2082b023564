//! Application state and async task plumbing.
//!
//! All user events run on the main loop; network work is spawned onto the
//! runtime and reports back over an unbounded channel as [`AppEvent`]s.
//! Generation results are stamped with a [`GenerationTicket`] so a result
//! arriving after its dialog closed (or was reopened) is discarded rather
//! than rendered into the wrong instance.

use std::sync::Arc;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{error, info};

use folio_client::{
    prompts, GenerationClient, GenerationResult, HttpContactSubmitter, HttpGenerationTransport,
};
use folio_core::connectivity::ConnectivityWatcher;
use folio_core::{
    Connectivity, FolioConfig, KvStore, PendingSubmission, SubmissionQueue, SubmitOutcome,
};

use crate::focus::{Control, FocusId};
use crate::form::{ContactForm, StatusKind};
use crate::modal::{Dialog, GenerationTicket, ModalController};
use crate::projects::{catalog, ProjectBoard};
use crate::theme::Theme;

/// Portfolio sections, the nav-link analogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    About,
    Projects,
    Contact,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Home,
        Section::About,
        Section::Projects,
        Section::Contact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::Home => Section::About,
            Section::About => Section::Projects,
            Section::Projects => Section::Contact,
            Section::Contact => Section::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Section::Home => Section::Contact,
            Section::About => Section::Home,
            Section::Projects => Section::About,
            Section::Contact => Section::Projects,
        }
    }
}

/// Where a finished generation should land.
#[derive(Debug, Clone)]
pub enum GenTarget {
    /// The explanation panel of one dialog instance.
    Dialog(GenerationTicket),
    /// The contact form's message field.
    Draft,
}

/// Completion messages from spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    GenerationFinished {
        target: GenTarget,
        result: GenerationResult,
    },
    SubmitFinished(SubmitOutcome),
    ReplayFinished(Option<SubmitOutcome>),
    ConnectivityRestored,
}

/// Long-lived service handles shared with spawned tasks.
pub struct Services {
    pub queue: Arc<SubmissionQueue<HttpContactSubmitter>>,
    pub assist: Arc<GenerationClient<HttpGenerationTransport>>,
    pub connectivity: Arc<Connectivity>,
}

pub struct App {
    pub theme: Theme,
    pub section: Section,
    pub board: ProjectBoard,
    pub form: ContactForm,
    pub modal: ModalController,
    pub store: Arc<KvStore>,
    pub should_quit: bool,
    /// Content rect of the active dialog from the last render, for
    /// backdrop hit-testing of mouse clicks.
    pub modal_area: Option<Rect>,
    pub services: Services,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Build the app plus the connectivity watcher the main loop listens on.
    pub fn new(
        config: &FolioConfig,
        store: Arc<KvStore>,
    ) -> anyhow::Result<(Self, ConnectivityWatcher)> {
        let submitter = HttpContactSubmitter::new(&config.endpoints.contact_url)
            .map_err(|err| anyhow::anyhow!("contact submitter: {err}"))?;
        let assist =
            GenerationClient::over_http(&config.endpoints.generation_url, &config.assist)
                .map_err(|err| anyhow::anyhow!("generation client: {err}"))?;
        let (connectivity, watcher) = Connectivity::new(true);

        let services = Services {
            queue: Arc::new(SubmissionQueue::new(Arc::clone(&store), submitter)),
            assist: Arc::new(assist),
            connectivity: Arc::new(connectivity),
        };
        Ok((Self::with_services(store, services), watcher))
    }

    pub fn with_services(store: Arc<KvStore>, services: Services) -> Self {
        let theme = Theme::load(&store);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut modal = ModalController::new();
        for project in catalog() {
            modal.register(
                Dialog::new(project.id, project.title, project.description).with_controls(vec![
                    Control::new("ask-ai"),
                    Control::new("close"),
                ]),
            );
        }

        let mut app = Self {
            theme,
            section: Section::Home,
            board: ProjectBoard::default(),
            form: ContactForm::new(),
            modal,
            store,
            should_quit: false,
            modal_area: None,
            services,
            events_tx,
            events_rx,
        };
        app.announce_pending_on_startup();
        app
    }

    /// Sender for background tasks (connectivity watcher, probe).
    pub fn events_tx(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.events_tx.clone()
    }

    /// Drain one completed background event, if any.
    pub fn try_recv_event(&mut self) -> Option<AppEvent> {
        self.events_rx.try_recv().ok()
    }

    fn announce_pending_on_startup(&mut self) {
        match self.services.queue.pending() {
            Ok(Some(_)) => self.form.set_status(
                "You have a saved message from offline. It will be sent when online.",
                StatusKind::Info,
            ),
            Ok(None) => {}
            Err(err) => error!(error = %err, "could not read pending submission"),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle(&self.store);
    }

    /// Open the selected project's dialog, remembering the card as the
    /// focus to restore on close.
    pub fn open_selected_project(&mut self) {
        let Some(project) = self.board.selected_project(catalog()) else {
            return;
        };
        let prior = FocusId::new(format!("card-{}", project.id));
        self.modal.open(project.id, Some(prior));
    }

    /// Move page focus back to a restored target after a dialog closes.
    pub fn restore_page_focus(&mut self, restore: Option<FocusId>) {
        let Some(id) = restore else { return };
        if let Some(project_id) = id.as_str().strip_prefix("card-") {
            let position = self
                .board
                .visible(catalog())
                .iter()
                .position(|project| project.id == project_id);
            if let Some(index) = position {
                self.board.selected = index;
            }
        }
    }

    /// Kick off the project explainer for the active dialog.
    pub fn ask_ai(&mut self) {
        let Some(active) = self.modal.active().map(str::to_string) else {
            return;
        };
        let Some(dialog) = self.modal.dialog(&active) else {
            return;
        };
        // Focus can stay on the disabled button; a repeat activation while
        // a generation is in flight must not start a second one.
        if dialog
            .controls
            .iter()
            .any(|control| control.id.as_str() == "ask-ai" && control.disabled)
        {
            return;
        }
        let prompt = prompts::explainer_prompt(&dialog.title, &dialog.body);

        let Some(ticket) = self.modal.begin_generation(&active) else {
            return;
        };
        // Busy button leaves the tab order until the result lands.
        self.modal
            .set_control_disabled(&active, &FocusId::new("ask-ai"), true);
        self.spawn_generation(prompt, prompts::EXPLAINER_SYSTEM.to_string(), GenTarget::Dialog(ticket));
    }

    /// Draft the contact message from keywords.
    pub fn draft_message(&mut self) {
        if self.form.draft_busy.is_busy() {
            return;
        }
        let keywords = self.form.keywords.trim().to_string();
        if keywords.is_empty() {
            self.form
                .set_status("Please enter a few keywords.", StatusKind::Error);
            return;
        }
        let sender = if self.form.name.trim().is_empty() {
            "Sender".to_string()
        } else {
            self.form.name.trim().to_string()
        };

        self.form.draft_busy.start();
        self.form
            .set_status("Drafting message… please wait.", StatusKind::Info);
        self.spawn_generation(
            prompts::draft_prompt(&keywords, &sender),
            prompts::draft_system(&sender),
            GenTarget::Draft,
        );
    }

    fn spawn_generation(&self, prompt: String, system: String, target: GenTarget) {
        let assist = Arc::clone(&self.services.assist);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = assist.generate(&prompt, &system).await;
            let _ = tx.send(AppEvent::GenerationFinished { target, result });
        });
    }

    /// Validate and send the contact form.
    pub fn submit_form(&mut self) {
        if self.form.submit_busy.is_busy() {
            return;
        }
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(message) => {
                self.form.set_status(message, StatusKind::Error);
                return;
            }
        };

        self.form.submit_busy.start();
        self.spawn_submit(payload, false);
    }

    fn spawn_submit(&self, payload: PendingSubmission, replay: bool) {
        let queue = Arc::clone(&self.services.queue);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match queue.try_submit(&payload).await {
                Ok(outcome) if replay => {
                    let _ = tx.send(AppEvent::ReplayFinished(Some(outcome)));
                }
                Ok(outcome) => {
                    let _ = tx.send(AppEvent::SubmitFinished(outcome));
                }
                Err(err) => error!(error = %err, "submission bookkeeping failed"),
            }
        });
    }

    /// Apply a completed background event to the UI state.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::GenerationFinished { target, result } => {
                self.apply_generation(target, result)
            }
            AppEvent::SubmitFinished(outcome) => self.apply_submit_outcome(outcome),
            AppEvent::ReplayFinished(outcome) => {
                if let Some(outcome) = outcome {
                    info!(?outcome, "offline replay finished");
                    self.apply_submit_outcome(outcome);
                }
            }
            AppEvent::ConnectivityRestored => {
                let queue = Arc::clone(&self.services.queue);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    match queue.on_connectivity_restored().await {
                        Ok(outcome) => {
                            let _ = tx.send(AppEvent::ReplayFinished(outcome));
                        }
                        Err(err) => error!(error = %err, "offline replay failed"),
                    }
                });
            }
        }
    }

    fn apply_generation(&mut self, target: GenTarget, result: GenerationResult) {
        match target {
            GenTarget::Dialog(ticket) => {
                // Re-enable the button even when the instance is gone;
                // the dialog may be reopened later.
                self.modal
                    .set_control_disabled(&ticket.dialog_id, &FocusId::new("ask-ai"), false);
                let text = match result {
                    GenerationResult::Success { text } => text,
                    GenerationResult::Failure { message } => message,
                };
                self.modal.apply_generation(&ticket, text);
            }
            GenTarget::Draft => {
                self.form.draft_busy.stop();
                match result {
                    GenerationResult::Success { text } => {
                        self.form.message = text.replace('*', "");
                        self.form.set_status("Message drafted!", StatusKind::Success);
                    }
                    GenerationResult::Failure { .. } => {
                        self.form
                            .set_status("Error creating message. Try again.", StatusKind::Error);
                    }
                }
            }
        }
    }

    fn apply_submit_outcome(&mut self, outcome: SubmitOutcome) {
        self.form.submit_busy.stop();
        match outcome {
            SubmitOutcome::Sent => {
                self.form.reset();
                self.form
                    .set_status("Message sent successfully!", StatusKind::Success);
            }
            SubmitOutcome::QueuedOffline => {
                self.services.connectivity.set_online(false);
                self.form.set_status(
                    "You are offline. Message saved locally.",
                    StatusKind::Error,
                );
            }
            SubmitOutcome::Rejected(message) | SubmitOutcome::Failed(message) => {
                self.form.set_status(message, StatusKind::Error);
            }
        }
    }
}
