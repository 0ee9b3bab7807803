//! The reconciliation core.
//!
//! [`Console`] owns every piece of client state: the worker draft, the
//! authoritative status, logs and notebook list, notifications, modals and the
//! single pending-request slot. It is mutated only through
//! [`Console::dispatch`] and [`Console::complete`], which never block and
//! return the [`Effect`]s to execute.
//!
//! ## Request lifecycle
//!
//! A blocking mutation (start, stop, apply, create or delete notebook) fills
//! the pending slot on dispatch. Its [`Completion`] always clears the slot,
//! whatever the outcome. A second blocking mutation while one is pending is
//! refused locally without a network call.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use sparkdeck_client::ApiError;
use sparkdeck_core::config::RefreshConfig;
use sparkdeck_core::logging::{POLL_TARGET, REQUEST_TARGET};
use sparkdeck_core::{DeckConfig, Severity};

use crate::action::{Action, Completion, DialogEdit, Effect, Fetch, Message, Mutation, MutationKind, Ticket};
use crate::draft::{DraftError, WorkerDraft};
use crate::logs::LogView;
use crate::modal::{Confirmation, NotebookDialog};
use crate::notebooks::NotebookPanel;
use crate::notify::{NotificationCenter, Timings};
use crate::status::StatusPanel;

/// The blocking call currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    pub ticket: Ticket,
    pub kind: MutationKind,
    pub since: Instant,
}

/// All client state plus the dispatch table.
#[derive(Debug)]
pub struct Console {
    draft: WorkerDraft,
    status: StatusPanel,
    logs: LogView,
    notebooks: NotebookPanel,
    notifications: NotificationCenter,
    dialog: NotebookDialog,
    confirmation: Option<Confirmation>,
    pending: Option<Pending>,
    next_ticket: u64,
    refresh: RefreshConfig,
}

impl Console {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            draft: WorkerDraft::new(config.defaults.workers()),
            status: StatusPanel::new(config.master_ui_url.clone()),
            logs: LogView::default(),
            notebooks: NotebookPanel::default(),
            notifications: NotificationCenter::new(Timings::from(&config.notifications)),
            dialog: NotebookDialog::default(),
            confirmation: None,
            pending: None,
            next_ticket: 1,
            refresh: config.refresh.clone(),
        }
    }

    /// Effects to run once at startup, besides the pollers' first ticks.
    pub fn startup(&self) -> Vec<Effect> {
        vec![Effect::Fetch(Fetch::Notebooks)]
    }

    // ============================================================
    // Accessors
    // ============================================================

    pub fn draft(&self) -> &WorkerDraft {
        &self.draft
    }

    pub fn status(&self) -> &StatusPanel {
        &self.status
    }

    pub fn logs(&self) -> &LogView {
        &self.logs
    }

    pub fn notebooks(&self) -> &NotebookPanel {
        &self.notebooks
    }

    pub fn notebooks_mut(&mut self) -> &mut NotebookPanel {
        &mut self.notebooks
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn dialog(&self) -> &NotebookDialog {
        &self.dialog
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    /// Whether the blocking-loading overlay is shown.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    // ============================================================
    // Dispatch
    // ============================================================

    pub fn handle(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        match message {
            Message::Action(action) => self.dispatch(action, now),
            Message::Completed(completion) => self.complete(completion, now),
        }
    }

    /// Apply an operator or timer intent.
    pub fn dispatch(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        match action {
            Action::RefreshStatus => {
                self.status.begin_poll(now);
                vec![Effect::Fetch(Fetch::Status)]
            }
            Action::RefreshLogs => vec![Effect::Fetch(Fetch::Logs)],
            Action::RefreshNotebooks => vec![Effect::Fetch(Fetch::Notebooks)],
            Action::RefreshAll => {
                self.status.begin_poll(now);
                vec![
                    Effect::Fetch(Fetch::Status),
                    Effect::Fetch(Fetch::Logs),
                    Effect::Fetch(Fetch::Notebooks),
                ]
            }

            Action::UpdateWorker { position, field } => {
                if !self.draft.update(position, field) {
                    debug!(position, "ignoring update for missing worker");
                }
                Vec::new()
            }
            Action::AddWorker => {
                self.draft.append();
                self.notify(
                    Severity::Info,
                    "Worker added. Apply the configuration to restart the cluster.",
                    now,
                );
                Vec::new()
            }
            Action::RemoveWorker { position } => {
                match self.draft.remove(position) {
                    Ok(_) => self.notify(
                        Severity::Info,
                        "Worker removed. Apply the configuration to restart the cluster.",
                        now,
                    ),
                    Err(err @ DraftError::LastWorker) => {
                        self.notify(Severity::Error, err.to_string(), now)
                    }
                    Err(err @ DraftError::OutOfRange { .. }) => {
                        debug!(%err, "ignoring remove");
                    }
                }
                Vec::new()
            }

            Action::StartCluster => self.submit(Mutation::Start, now),
            Action::StopCluster => self.ask(Confirmation::StopCluster, now),
            Action::ApplyConfig => {
                let request = self.draft.snapshot();
                self.submit(Mutation::Apply(request), now)
            }
            Action::ClearLogs => self.submit(Mutation::ClearLogs, now),
            Action::OpenMasterUi => match self.status.master_ui_link() {
                Some(url) => vec![Effect::OpenUrl(url.to_string())],
                None => {
                    debug!("master UI unavailable while offline");
                    Vec::new()
                }
            },

            Action::ShowCreateNotebook => {
                self.dialog.show();
                Vec::new()
            }
            Action::HideCreateNotebook => {
                self.dialog.hide();
                Vec::new()
            }
            Action::EditDialog(edit) => {
                if self.dialog.is_open() {
                    match edit {
                        DialogEdit::Insert(c) => self.dialog.focused_mut().push(c),
                        DialogEdit::Backspace => {
                            self.dialog.focused_mut().pop();
                        }
                        DialogEdit::NextField => self.dialog.field = self.dialog.field.next(),
                    }
                }
                Vec::new()
            }
            Action::SubmitNotebook => match self.dialog.request() {
                Some(request) => self.submit(Mutation::CreateNotebook(request), now),
                None => {
                    self.notify(Severity::Error, "Please enter a notebook name", now);
                    Vec::new()
                }
            },
            Action::OpenNotebook { id } => vec![Effect::ResolveNotebookUrl { id }],
            Action::DeleteNotebook { id } => self.ask(Confirmation::DeleteNotebook { id }, now),

            Action::Confirm => match self.confirmation.take() {
                Some(Confirmation::StopCluster) => self.submit(Mutation::Stop, now),
                Some(Confirmation::DeleteNotebook { id }) => {
                    self.submit(Mutation::DeleteNotebook { id }, now)
                }
                None => Vec::new(),
            },
            Action::Decline => {
                self.confirmation = None;
                Vec::new()
            }

            Action::Tick => {
                self.notifications.tick(now);
                Vec::new()
            }
        }
    }

    /// Apply the result of an effect.
    pub fn complete(&mut self, completion: Completion, now: Instant) -> Vec<Effect> {
        match completion {
            Completion::Status(Ok(status)) => {
                self.status.apply(status);
                Vec::new()
            }
            Completion::Status(Err(err)) => {
                self.status.record_failure();
                warn!(target: POLL_TARGET, error = %err, failures = self.status.failures(), "status poll failed");
                Vec::new()
            }
            Completion::Logs(Ok(lines)) => {
                self.logs.replace(lines);
                Vec::new()
            }
            Completion::Logs(Err(err)) => {
                warn!(target: POLL_TARGET, error = %err, "log poll failed");
                Vec::new()
            }
            Completion::Notebooks(Ok(notebooks)) => {
                self.notebooks.replace(notebooks);
                Vec::new()
            }
            Completion::Notebooks(Err(err)) => {
                warn!(target: POLL_TARGET, error = %err, "notebook list failed");
                Vec::new()
            }

            Completion::Submitted { ticket, kind, result } => {
                self.release(ticket, kind);
                self.finish(kind, result, now)
            }

            Completion::NotebookUrl { id, result } => match result {
                Ok(url) => vec![Effect::OpenUrl(url)],
                Err(err) => {
                    warn!(target: REQUEST_TARGET, notebook = %id, error = %err, "could not resolve notebook URL");
                    self.notify(Severity::Error, format!("Error opening notebook: {}", err.detail()), now);
                    Vec::new()
                }
            },
            Completion::UrlOpened { url, result } => {
                match result {
                    Ok(()) => debug!(%url, "opened in browser"),
                    Err(err) => {
                        warn!(%url, error = %err, "could not open browser");
                        self.notify(Severity::Error, format!("Could not open {url}: {err}"), now);
                    }
                }
                Vec::new()
            }
        }
    }

    // ============================================================
    // Request lifecycle
    // ============================================================

    fn ask(&mut self, confirmation: Confirmation, now: Instant) -> Vec<Effect> {
        if let Some(pending) = self.pending {
            self.refuse_busy(pending, now);
        } else {
            self.confirmation = Some(confirmation);
        }
        Vec::new()
    }

    fn submit(&mut self, mutation: Mutation, now: Instant) -> Vec<Effect> {
        let kind = mutation.kind();
        if kind.is_blocking()
            && let Some(pending) = self.pending
        {
            self.refuse_busy(pending, now);
            return Vec::new();
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        if kind.is_blocking() {
            self.pending = Some(Pending {
                ticket,
                kind,
                since: now,
            });
        }

        info!(target: REQUEST_TARGET, ticket = ticket.0, ?kind, "submitting");
        vec![Effect::Submit { ticket, mutation }]
    }

    fn refuse_busy(&mut self, pending: Pending, now: Instant) {
        debug!(kind = ?pending.kind, "refusing overlapping mutation");
        self.notify(
            Severity::Info,
            format!("{} is still in progress", pending.kind.label()),
            now,
        );
    }

    fn release(&mut self, ticket: Ticket, kind: MutationKind) {
        if !kind.is_blocking() {
            return;
        }
        match self.pending {
            Some(pending) if pending.ticket == ticket => self.pending = None,
            other => warn!(
                target: REQUEST_TARGET,
                ticket = ticket.0,
                pending = ?other.map(|p| p.ticket.0),
                "completion does not match the pending request"
            ),
        }
    }

    fn finish(&mut self, kind: MutationKind, result: Result<Option<String>, ApiError>, now: Instant) -> Vec<Effect> {
        match result {
            Ok(message) => {
                info!(target: REQUEST_TARGET, ?kind, message = ?message, "request succeeded");
                self.succeeded(kind, message, now)
            }
            Err(err) if err.is_rejected() => {
                warn!(target: REQUEST_TARGET, ?kind, error = %err, "request rejected");
                self.rejected(kind, &err, now)
            }
            Err(err) => {
                warn!(target: REQUEST_TARGET, ?kind, error = %err, "request failed");
                let text = match kind {
                    MutationKind::ClearLogs => format!("Error clearing logs: {err}"),
                    _ => format!("Error: {err}"),
                };
                self.notify(Severity::Error, text, now);
                Vec::new()
            }
        }
    }

    fn succeeded(&mut self, kind: MutationKind, message: Option<String>, now: Instant) -> Vec<Effect> {
        let message = message.filter(|m| !m.trim().is_empty());
        match kind {
            MutationKind::Start => {
                let text = message.unwrap_or_else(|| "Cluster start initiated".to_string());
                self.notify(Severity::Success, text, now);
                self.converge(self.refresh.status_delay())
            }
            MutationKind::Stop => {
                let text = message.unwrap_or_else(|| "Cluster stopped successfully".to_string());
                self.notify(Severity::Success, text, now);
                self.converge(self.refresh.status_delay())
            }
            MutationKind::Apply => {
                let text = message.unwrap_or_else(|| "Configuration applied".to_string());
                self.notify(Severity::Success, text, now);
                self.converge(self.refresh.apply_status_delay())
            }
            MutationKind::CreateNotebook => {
                self.notify(Severity::Success, "Notebook created successfully", now);
                self.dialog.hide();
                self.dialog.reset();
                vec![Effect::Fetch(Fetch::Notebooks)]
            }
            MutationKind::DeleteNotebook => {
                self.notify(Severity::Success, "Notebook deleted", now);
                vec![Effect::Fetch(Fetch::Notebooks)]
            }
            MutationKind::ClearLogs => {
                self.notify(Severity::Success, "Logs cleared", now);
                vec![Effect::Fetch(Fetch::Logs)]
            }
        }
    }

    fn rejected(&mut self, kind: MutationKind, err: &ApiError, now: Instant) -> Vec<Effect> {
        let detail = err.detail();
        let text = match kind {
            MutationKind::Start => format!("Failed to start cluster: {detail}"),
            MutationKind::Stop => format!("Failed to stop cluster: {detail}"),
            MutationKind::Apply => format!("Failed to apply configuration: {detail}"),
            MutationKind::CreateNotebook => format!("Failed to create notebook: {detail}"),
            MutationKind::DeleteNotebook => format!("Failed to delete notebook: {detail}"),
            MutationKind::ClearLogs => format!("Error clearing logs: {detail}"),
        };
        self.notify(Severity::Error, text, now);

        match kind {
            // Backend-side diagnostics land in the log buffer
            MutationKind::Apply => vec![Effect::Fetch(Fetch::Logs)],
            _ => Vec::new(),
        }
    }

    /// Out-of-band refreshes after a lifecycle call succeeds.
    fn converge(&self, status_delay: Duration) -> Vec<Effect> {
        vec![
            Effect::Schedule {
                after: status_delay,
                fetch: Fetch::Status,
            },
            Effect::Schedule {
                after: self.refresh.logs_delay(),
                fetch: Fetch::Logs,
            },
        ]
    }

    fn notify(&mut self, severity: Severity, text: impl Into<String>, now: Instant) {
        self.notifications.push(severity, text, now);
    }
}

#[cfg(test)]
mod tests {
    use sparkdeck_core::{ClusterStatus, Cores, Memory, NotebookRecord, WorkerSpec};

    use super::*;
    use crate::draft::WorkerField;

    fn console() -> Console {
        Console::new(&DeckConfig::default())
    }

    fn latest(console: &Console) -> (Severity, String) {
        let n = console.notifications().latest().unwrap();
        (n.severity, n.text.clone())
    }

    fn submitted(effects: &[Effect]) -> (Ticket, Mutation) {
        match effects {
            [Effect::Submit { ticket, mutation }] => (*ticket, mutation.clone()),
            other => panic!("expected a single submit, got {other:?}"),
        }
    }

    fn notebook(id: &str) -> NotebookRecord {
        NotebookRecord {
            id: id.to_string(),
            name: id.to_string(),
            template: "blank".to_string(),
            created_at: String::new(),
            path: None,
        }
    }

    // ============================================================
    // Draft editing
    // ============================================================

    #[test]
    fn test_initial_draft_from_config() {
        let mut config = DeckConfig::default();
        config.defaults.worker_count = 3;
        config.defaults.memory = Memory::Gb2;
        let console = Console::new(&config);
        assert_eq!(console.draft().len(), 3);
        assert_eq!(console.draft().get(2), Some(&WorkerSpec::new(Memory::Gb2, Cores::One)));
    }

    #[test]
    fn test_remove_last_worker_notifies_error() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(Action::RemoveWorker { position: 0 }, now);
        console.dispatch(Action::RemoveWorker { position: 0 }, now);

        assert_eq!(console.draft().len(), 1);
        let (severity, text) = latest(&console);
        assert_eq!(severity, Severity::Error);
        assert_eq!(text, "Cannot remove last worker. Cluster needs at least 1 worker.");
    }

    #[test]
    fn test_add_and_remove_notify_reapply() {
        let mut console = console();
        let now = Instant::now();
        let effects = console.dispatch(Action::AddWorker, now);
        assert!(effects.is_empty());
        assert_eq!(console.draft().len(), 3);
        assert!(latest(&console).1.starts_with("Worker added"));

        console.dispatch(Action::RemoveWorker { position: 1 }, now);
        assert_eq!(console.draft().len(), 2);
        assert_eq!(latest(&console).0, Severity::Info);
        assert!(latest(&console).1.starts_with("Worker removed"));
    }

    #[test]
    fn test_out_of_range_edits_are_silent() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(
            Action::UpdateWorker {
                position: 9,
                field: WorkerField::Memory(Memory::Gb8),
            },
            now,
        );
        console.dispatch(Action::RemoveWorker { position: 9 }, now);
        assert!(console.notifications().is_empty());
        assert_eq!(console.draft().len(), 2);
    }

    // ============================================================
    // Apply / lifecycle
    // ============================================================

    #[test]
    fn test_apply_snapshot_taken_at_dispatch() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(
            Action::UpdateWorker {
                position: 0,
                field: WorkerField::Memory(Memory::Mb512),
            },
            now,
        );

        let (_, mutation) = submitted(&console.dispatch(Action::ApplyConfig, now));
        assert!(console.is_loading());

        // Editing while the call is in flight does not touch the submitted copy
        console.dispatch(Action::AddWorker, now);
        let Mutation::Apply(request) = mutation else {
            panic!("expected apply");
        };
        assert_eq!(
            request.workers,
            vec![
                WorkerSpec::new(Memory::Mb512, Cores::One),
                WorkerSpec::new(Memory::Gb1, Cores::One)
            ]
        );
    }

    #[test]
    fn test_apply_success_schedules_refreshes() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, _) = submitted(&console.dispatch(Action::ApplyConfig, now));

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::Apply,
                result: Ok(Some("Cluster configured with 2 worker(s)".to_string())),
            },
            now,
        );

        assert!(!console.is_loading());
        assert_eq!(
            latest(&console),
            (Severity::Success, "Cluster configured with 2 worker(s)".to_string())
        );
        assert_eq!(
            effects,
            vec![
                Effect::Schedule {
                    after: Duration::from_millis(3000),
                    fetch: Fetch::Status
                },
                Effect::Schedule {
                    after: Duration::from_millis(1000),
                    fetch: Fetch::Logs
                },
            ]
        );
    }

    #[test]
    fn test_apply_rejection_refreshes_logs_immediately() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, _) = submitted(&console.dispatch(Action::ApplyConfig, now));

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::Apply,
                result: Err(ApiError::Rejected {
                    status: 500,
                    detail: "port in use".to_string(),
                }),
            },
            now,
        );

        assert!(!console.is_loading());
        let (severity, text) = latest(&console);
        assert_eq!(severity, Severity::Error);
        assert!(text.contains("port in use"));
        assert_eq!(effects, vec![Effect::Fetch(Fetch::Logs)]);
    }

    #[test]
    fn test_transport_failure_generic_notification() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, _) = submitted(&console.dispatch(Action::StartCluster, now));

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::Start,
                result: Err(ApiError::Transport("connection refused".to_string())),
            },
            now,
        );

        assert!(effects.is_empty());
        assert!(!console.is_loading());
        assert_eq!(
            latest(&console),
            (Severity::Error, "Error: connection refused".to_string())
        );
    }

    #[test]
    fn test_start_success_uses_default_text_and_delays() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, mutation) = submitted(&console.dispatch(Action::StartCluster, now));
        assert_eq!(mutation, Mutation::Start);

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::Start,
                result: Ok(None),
            },
            now,
        );
        assert_eq!(latest(&console).1, "Cluster start initiated");
        assert!(effects.contains(&Effect::Schedule {
            after: Duration::from_millis(2000),
            fetch: Fetch::Status
        }));
    }

    #[test]
    fn test_stop_requires_confirmation() {
        let mut console = console();
        let now = Instant::now();

        let effects = console.dispatch(Action::StopCluster, now);
        assert!(effects.is_empty());
        assert_eq!(console.confirmation(), Some(&Confirmation::StopCluster));
        assert!(!console.is_loading());

        let effects = console.dispatch(Action::Decline, now);
        assert!(effects.is_empty());
        assert!(console.confirmation().is_none());
        assert!(!console.is_loading());
        assert!(console.notifications().is_empty());

        console.dispatch(Action::StopCluster, now);
        let (_, mutation) = submitted(&console.dispatch(Action::Confirm, now));
        assert_eq!(mutation, Mutation::Stop);
        assert!(console.is_loading());
    }

    #[test]
    fn test_overlapping_mutation_refused() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, _) = submitted(&console.dispatch(Action::ApplyConfig, now));

        assert!(console.dispatch(Action::StartCluster, now).is_empty());
        assert!(console.dispatch(Action::StopCluster, now).is_empty());
        assert!(console.confirmation().is_none());
        assert_eq!(latest(&console).1, "Applying configuration is still in progress");
        assert_eq!(console.pending().unwrap().ticket, ticket);

        // Clearing logs does not hold the overlay and may overlap
        let effects = console.dispatch(Action::ClearLogs, now);
        assert!(matches!(effects.as_slice(), [Effect::Submit { .. }]));
        assert_eq!(console.pending().unwrap().ticket, ticket);
    }

    #[test]
    fn test_stale_completion_does_not_release_pending() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, _) = submitted(&console.dispatch(Action::StartCluster, now));

        console.complete(
            Completion::Submitted {
                ticket: Ticket(ticket.0 + 100),
                kind: MutationKind::Stop,
                result: Ok(None),
            },
            now,
        );
        assert!(console.is_loading());
    }

    // ============================================================
    // Polling
    // ============================================================

    #[test]
    fn test_status_failure_keeps_stale_then_updates() {
        let mut console = console();
        let now = Instant::now();
        console.complete(
            Completion::Status(Ok(ClusterStatus {
                running: true,
                worker_count: 2,
                ..ClusterStatus::default()
            })),
            now,
        );
        console.complete(
            Completion::Status(Err(ApiError::Transport("timeout".to_string()))),
            now,
        );

        assert!(console.status().is_online());
        assert_eq!(console.status().worker_count(), Some(2));
        assert!(console.notifications().is_empty());

        console.complete(
            Completion::Status(Ok(ClusterStatus {
                running: false,
                worker_count: 0,
                ..ClusterStatus::default()
            })),
            now,
        );
        assert!(!console.status().is_online());
        assert_eq!(console.status().worker_count(), Some(0));
    }

    #[test]
    fn test_refresh_status_starts_spinner() {
        let mut console = console();
        let now = Instant::now();
        let effects = console.dispatch(Action::RefreshStatus, now);
        assert_eq!(effects, vec![Effect::Fetch(Fetch::Status)]);
        assert!(console.status().is_spinning(now));
    }

    #[test]
    fn test_log_failure_is_silent() {
        let mut console = console();
        let now = Instant::now();
        console.complete(Completion::Logs(Ok(vec!["started".to_string()])), now);
        console.complete(Completion::Logs(Err(ApiError::Decode("bad".to_string()))), now);
        assert_eq!(console.logs().lines(), ["started".to_string()]);
        assert!(console.notifications().is_empty());
    }

    #[test]
    fn test_master_ui_only_when_online() {
        let mut console = console();
        let now = Instant::now();
        assert!(console.dispatch(Action::OpenMasterUi, now).is_empty());

        console.complete(
            Completion::Status(Ok(ClusterStatus {
                running: true,
                master_ui_url: Some("http://localhost:8080".to_string()),
                ..ClusterStatus::default()
            })),
            now,
        );
        assert_eq!(
            console.dispatch(Action::OpenMasterUi, now),
            vec![Effect::OpenUrl("http://localhost:8080".to_string())]
        );
    }

    // ============================================================
    // Notebooks
    // ============================================================

    #[test]
    fn test_create_validation_failure() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(Action::ShowCreateNotebook, now);
        let effects = console.dispatch(Action::SubmitNotebook, now);

        assert!(effects.is_empty());
        assert!(!console.is_loading());
        assert!(console.dialog().is_open());
        assert_eq!(latest(&console).0, Severity::Error);
    }

    #[test]
    fn test_create_failure_keeps_dialog_values() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(Action::ShowCreateNotebook, now);
        for c in "etl".chars() {
            console.dispatch(Action::EditDialog(DialogEdit::Insert(c)), now);
        }
        let (ticket, mutation) = submitted(&console.dispatch(Action::SubmitNotebook, now));
        let Mutation::CreateNotebook(request) = mutation else {
            panic!("expected create");
        };
        assert_eq!(request.name, "etl");
        assert_eq!(request.template, "blank");

        console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::CreateNotebook,
                result: Err(ApiError::Rejected {
                    status: 400,
                    detail: "Invalid notebook name".to_string(),
                }),
            },
            now,
        );
        assert!(console.dialog().is_open());
        assert_eq!(console.dialog().name, "etl");
        assert_eq!(
            latest(&console).1,
            "Failed to create notebook: Invalid notebook name"
        );
    }

    #[test]
    fn test_create_success_closes_and_relists() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(Action::ShowCreateNotebook, now);
        console.dispatch(Action::EditDialog(DialogEdit::Insert('x')), now);
        let (ticket, _) = submitted(&console.dispatch(Action::SubmitNotebook, now));

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::CreateNotebook,
                result: Ok(None),
            },
            now,
        );
        assert_eq!(effects, vec![Effect::Fetch(Fetch::Notebooks)]);
        assert!(!console.dialog().is_open());
        assert!(console.dialog().name.is_empty());
        // No optimistic insert
        assert!(console.notebooks().is_empty());
    }

    #[test]
    fn test_delete_confirmed_relists_without_local_removal() {
        let mut console = console();
        let now = Instant::now();
        console.complete(Completion::Notebooks(Ok(vec![notebook("a"), notebook("b")])), now);

        console.dispatch(Action::DeleteNotebook { id: "a".to_string() }, now);
        let (ticket, mutation) = submitted(&console.dispatch(Action::Confirm, now));
        assert_eq!(mutation, Mutation::DeleteNotebook { id: "a".to_string() });

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::DeleteNotebook,
                result: Ok(Some("deleted".to_string())),
            },
            now,
        );
        assert_eq!(effects, vec![Effect::Fetch(Fetch::Notebooks)]);
        assert!(console.notebooks().contains("a"));

        console.complete(Completion::Notebooks(Ok(vec![notebook("b")])), now);
        assert!(!console.notebooks().contains("a"));
    }

    #[test]
    fn test_delete_failure_keeps_row() {
        let mut console = console();
        let now = Instant::now();
        console.complete(Completion::Notebooks(Ok(vec![notebook("a")])), now);
        console.dispatch(Action::DeleteNotebook { id: "a".to_string() }, now);
        let (ticket, _) = submitted(&console.dispatch(Action::Confirm, now));

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::DeleteNotebook,
                result: Err(ApiError::Rejected {
                    status: 404,
                    detail: "Notebook not found".to_string(),
                }),
            },
            now,
        );
        assert!(effects.is_empty());
        assert!(console.notebooks().contains("a"));
        assert_eq!(
            latest(&console),
            (Severity::Error, "Failed to delete notebook: Notebook not found".to_string())
        );
    }

    #[test]
    fn test_delete_declined_is_noop() {
        let mut console = console();
        let now = Instant::now();
        console.dispatch(Action::DeleteNotebook { id: "a".to_string() }, now);
        assert!(console.dispatch(Action::Decline, now).is_empty());
        assert!(console.dispatch(Action::Confirm, now).is_empty());
        assert!(console.notifications().is_empty());
    }

    #[test]
    fn test_open_notebook_failure_notifies() {
        let mut console = console();
        let now = Instant::now();
        assert_eq!(
            console.dispatch(Action::OpenNotebook { id: "nb".to_string() }, now),
            vec![Effect::ResolveNotebookUrl { id: "nb".to_string() }]
        );

        let effects = console.complete(
            Completion::NotebookUrl {
                id: "nb".to_string(),
                result: Err(ApiError::Transport("connection refused".to_string())),
            },
            now,
        );
        assert!(effects.is_empty());
        assert_eq!(
            latest(&console).1,
            "Error opening notebook: connection refused"
        );
        assert!(!console.is_loading());
    }

    #[test]
    fn test_clear_logs_success_refreshes() {
        let mut console = console();
        let now = Instant::now();
        let (ticket, mutation) = submitted(&console.dispatch(Action::ClearLogs, now));
        assert_eq!(mutation, Mutation::ClearLogs);
        assert!(!console.is_loading());

        let effects = console.complete(
            Completion::Submitted {
                ticket,
                kind: MutationKind::ClearLogs,
                result: Ok(None),
            },
            now,
        );
        assert_eq!(effects, vec![Effect::Fetch(Fetch::Logs)]);
        assert_eq!(latest(&console), (Severity::Success, "Logs cleared".to_string()));
    }
}
