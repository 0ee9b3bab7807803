//! Terminal UI for sparkdeck.
//!
//! This crate renders the console state with Ratatui and turns key presses
//! into console actions. All cluster logic lives in `sparkdeck-console`.
//!
//! ## Hotkeys
//!
//! - `Tab` - Cycle panel focus
//! - `↑`/`↓` - Select worker or notebook
//! - `←`/`→` - Select memory or cores column
//! - `+`/`-` - Change the focused value
//! - `a` - Add worker
//! - `d` - Remove worker / delete notebook
//! - `A` - Apply configuration
//! - `s` / `S` - Start / stop cluster
//! - `n` - New notebook
//! - `Enter` - Open notebook
//! - `m` - Open master UI
//! - `c` - Clear logs
//! - `r` - Refresh
//! - `?` - Help
//! - `q` - Quit

pub mod app;
pub mod event;
pub mod theme;
pub mod view;
pub mod widget;

pub use app::{App, reset_terminal};
pub use event::{AppEvent, InputHandler, InputMode};
pub use view::{Column, FocusPanel};
