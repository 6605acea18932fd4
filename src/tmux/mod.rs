// ABOUTME: tmux integration: the multiplexer port, its subprocess adapter, and the
// reconcilers that launch, tear down, and export sessions through it

pub mod cli;
pub mod error;
pub mod exporter;
pub mod launcher;
pub mod port;

pub use cli::TmuxCli;
pub use error::TmuxError;
pub use exporter::{export, EXPORTED_OPTIONS};
pub use launcher::{launch, teardown, LaunchReport, LaunchedWindow};
pub use port::{Multiplexer, PaneInfo, WindowInfo};
