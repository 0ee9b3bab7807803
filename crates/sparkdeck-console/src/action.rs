//! The dispatch table vocabulary.
//!
//! [`Action`]s are intents from the operator or a timer. [`Effect`]s are the
//! side effects the console asks the runtime to perform. [`Completion`]s carry
//! results back. The runtime delivers both through [`Message`].

use std::time::Duration;

use sparkdeck_client::ApiResult;
use sparkdeck_core::{ApplyConfigRequest, ClusterStatus, CreateNotebookRequest, NotebookRecord};

use crate::draft::WorkerField;

/// Edits to the notebook dialog form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEdit {
    Insert(char),
    Backspace,
    NextField,
}

/// Operator and timer intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Background refreshes
    RefreshStatus,
    RefreshLogs,
    RefreshNotebooks,
    RefreshAll,

    // Draft editing
    UpdateWorker { position: usize, field: WorkerField },
    AddWorker,
    RemoveWorker { position: usize },

    // Cluster lifecycle
    StartCluster,
    StopCluster,
    ApplyConfig,
    ClearLogs,
    OpenMasterUi,

    // Notebooks
    ShowCreateNotebook,
    HideCreateNotebook,
    EditDialog(DialogEdit),
    SubmitNotebook,
    OpenNotebook { id: String },
    DeleteNotebook { id: String },

    // Confirmation prompt
    Confirm,
    Decline,

    /// Advance notification lifecycles
    Tick,
}

/// Read-only backend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fetch {
    Status,
    Logs,
    Notebooks,
}

impl Fetch {
    /// The action that performs this fetch through the console.
    pub fn action(&self) -> Action {
        match self {
            Fetch::Status => Action::RefreshStatus,
            Fetch::Logs => Action::RefreshLogs,
            Fetch::Notebooks => Action::RefreshNotebooks,
        }
    }
}

/// Mutating backend calls, with their payload captured at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Start,
    Stop,
    Apply(ApplyConfigRequest),
    CreateNotebook(CreateNotebookRequest),
    DeleteNotebook { id: String },
    ClearLogs,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Start => MutationKind::Start,
            Mutation::Stop => MutationKind::Stop,
            Mutation::Apply(_) => MutationKind::Apply,
            Mutation::CreateNotebook(_) => MutationKind::CreateNotebook,
            Mutation::DeleteNotebook { .. } => MutationKind::DeleteNotebook,
            Mutation::ClearLogs => MutationKind::ClearLogs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Start,
    Stop,
    Apply,
    CreateNotebook,
    DeleteNotebook,
    ClearLogs,
}

impl MutationKind {
    /// Whether the call holds the loading overlay while outstanding.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, MutationKind::ClearLogs)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MutationKind::Start => "Starting cluster",
            MutationKind::Stop => "Stopping cluster",
            MutationKind::Apply => "Applying configuration",
            MutationKind::CreateNotebook => "Creating notebook",
            MutationKind::DeleteNotebook => "Deleting notebook",
            MutationKind::ClearLogs => "Clearing logs",
        }
    }
}

/// Identifies one submitted mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// Side effects requested by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(Fetch),
    Submit { ticket: Ticket, mutation: Mutation },
    /// Run `fetch` out of band after `after`
    Schedule { after: Duration, fetch: Fetch },
    ResolveNotebookUrl { id: String },
    OpenUrl(String),
}

/// Results of effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Status(ApiResult<ClusterStatus>),
    Logs(ApiResult<Vec<String>>),
    Notebooks(ApiResult<Vec<NotebookRecord>>),
    Submitted {
        ticket: Ticket,
        kind: MutationKind,
        result: ApiResult<Option<String>>,
    },
    NotebookUrl {
        id: String,
        result: ApiResult<String>,
    },
    UrlOpened {
        url: String,
        result: Result<(), String>,
    },
}

/// Everything the event loop feeds into the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Action(Action),
    Completed(Completion),
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        Message::Action(action)
    }
}

impl From<Completion> for Message {
    fn from(completion: Completion) -> Self {
        Message::Completed(completion)
    }
}
