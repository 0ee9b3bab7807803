//! Effect execution.
//!
//! The [`Runtime`] turns [`Effect`]s into spawned tokio tasks and reports
//! their results as [`Message`]s on an unbounded channel. The event loop owns
//! the receiving end and feeds each message back into the console.
//!
//! ## Pollers
//!
//! [`Runtime::spawn_pollers`] starts the two background refresh loops. Their
//! first tick fires immediately, which doubles as the startup poll. Polls are
//! never cancelled in flight; if two overlap, whichever resolves last wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, instrument, warn};

use sparkdeck_client::{ApiError, ApiResult, ClusterApi};
use sparkdeck_core::config::PollingConfig;

use crate::action::{Action, Completion, Effect, Fetch, Message, Mutation};

/// Opens URLs in a browsing context outside the console.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), String>;
}

/// Hands URLs to the desktop's default browser.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn program() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        }
    }
}

#[async_trait]
impl UrlOpener for SystemBrowser {
    #[instrument(level = "debug", skip(self))]
    async fn open(&self, url: &str) -> Result<(), String> {
        let program = Self::program();
        let status = Command::new(program)
            .arg(url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| format!("failed to run {program}: {e}"))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("{program} exited with {status}"))
        }
    }
}

/// Create the message channel shared by the runtime and the event loop.
pub fn channel() -> (UnboundedSender<Message>, UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

/// Executes console effects as background tasks.
#[derive(Clone)]
pub struct Runtime {
    api: Arc<dyn ClusterApi>,
    opener: Arc<dyn UrlOpener>,
    tx: UnboundedSender<Message>,
}

impl Runtime {
    pub fn new(api: Arc<dyn ClusterApi>, opener: Arc<dyn UrlOpener>, tx: UnboundedSender<Message>) -> Self {
        Self { api, opener, tx }
    }

    pub fn sender(&self) -> UnboundedSender<Message> {
        self.tx.clone()
    }

    /// Spawn one task per effect.
    pub fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    fn spawn(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        match effect {
            Effect::Fetch(fetch) => {
                tokio::spawn(async move {
                    let completion = run_fetch(api.as_ref(), fetch).await;
                    deliver(&tx, completion.into());
                });
            }
            Effect::Schedule { after, fetch } => {
                tokio::spawn(async move {
                    sleep(after).await;
                    deliver(&tx, fetch.action().into());
                });
            }
            Effect::Submit { ticket, mutation } => {
                let kind = mutation.kind();
                tokio::spawn(async move {
                    // The inner task may fail in any way; the completion is
                    // still delivered so the pending slot gets released.
                    let inner = tokio::spawn(run_mutation(api, mutation));
                    let result = match inner.await {
                        Ok(result) => result,
                        Err(join_err) => {
                            warn!(ticket = ticket.0, ?kind, error = %join_err, "request task aborted");
                            Err(ApiError::Transport(format!("request aborted: {join_err}")))
                        }
                    };
                    deliver(&tx, Completion::Submitted { ticket, kind, result }.into());
                });
            }
            Effect::ResolveNotebookUrl { id } => {
                tokio::spawn(async move {
                    let result = api.notebook_url(&id).await;
                    deliver(&tx, Completion::NotebookUrl { id, result }.into());
                });
            }
            Effect::OpenUrl(url) => {
                let opener = Arc::clone(&self.opener);
                tokio::spawn(async move {
                    let result = opener.open(&url).await;
                    deliver(&tx, Completion::UrlOpened { url, result }.into());
                });
            }
        }
    }

    /// Start the status and log pollers.
    pub fn spawn_pollers(&self, polling: &PollingConfig) -> Pollers {
        Pollers {
            handles: vec![
                self.spawn_poller(polling.status_interval(), Action::RefreshStatus),
                self.spawn_poller(polling.logs_interval(), Action::RefreshLogs),
            ],
        }
    }

    fn spawn_poller(&self, period: Duration, action: Action) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(Message::Action(action.clone())).is_err() {
                    debug!(?action, "poller stopping, receiver closed");
                    break;
                }
            }
        })
    }
}

/// Handle to the running pollers.
#[derive(Debug)]
pub struct Pollers {
    handles: Vec<JoinHandle<()>>,
}

impl Pollers {
    pub fn shutdown(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|h| !h.is_finished())
    }
}

impl Drop for Pollers {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

fn deliver(tx: &UnboundedSender<Message>, message: Message) {
    if tx.send(message).is_err() {
        debug!("dropping result, console closed");
    }
}

async fn run_fetch(api: &dyn ClusterApi, fetch: Fetch) -> Completion {
    match fetch {
        Fetch::Status => Completion::Status(api.cluster_status().await),
        Fetch::Logs => Completion::Logs(api.cluster_logs().await),
        Fetch::Notebooks => Completion::Notebooks(api.list_notebooks().await),
    }
}

async fn run_mutation(api: Arc<dyn ClusterApi>, mutation: Mutation) -> ApiResult<Option<String>> {
    match mutation {
        Mutation::Start => api.start_cluster().await,
        Mutation::Stop => api.stop_cluster().await,
        Mutation::Apply(request) => api.apply_config(&request).await,
        Mutation::CreateNotebook(request) => api.create_notebook(&request).await,
        Mutation::DeleteNotebook { id } => api.delete_notebook(&id).await,
        Mutation::ClearLogs => api.clear_logs().await.map(|()| None),
    }
}
