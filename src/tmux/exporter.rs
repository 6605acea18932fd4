// ABOUTME: Reads the attached tmux session back into a declarative session tree
// Lossy by nature: split orientation and named layouts cannot be recovered

use tracing::{debug, info};

use super::error::{StepContext, TmuxError};
use super::port::{Multiplexer, PaneInfo};
use crate::models::{OptionValue, PaneSpec, SessionMeta, SessionSpec, Split, WindowSpec};

/// The only session options export asks tmux about.
pub const EXPORTED_OPTIONS: [&str; 3] = ["mouse", "base-index", "history-limit"];

/// Foreground commands that mean "idle shell" and export as no command.
const LOGIN_SHELLS: [&str; 3] = ["bash", "zsh", "sh"];

/// Capture the session the caller is attached to.
///
/// Options are best effort: one that cannot be read is left out. Everything
/// else that fails aborts the export with the step that failed.
pub fn export(mux: &dyn Multiplexer) -> Result<SessionSpec, TmuxError> {
    let session = mux.current_session()?;
    info!("Exporting session '{}'", session);

    let mut spec = SessionSpec {
        session: SessionMeta {
            name: session.clone(),
            base_dir: String::new(),
        },
        ..SessionSpec::default()
    };

    for key in EXPORTED_OPTIONS {
        match mux.show_option(&session, key) {
            Ok(Some(text)) => {
                spec.options
                    .insert(key.to_string(), OptionValue::from_manager_text(&text));
            }
            Ok(None) => debug!("Option {} is not set", key),
            Err(e) => debug!("Skipping option {}: {}", key, e),
        }
    }

    spec.env = mux
        .show_environment(&session)
        .step(|| format!("read environment of session '{}'", session))?;

    let windows = mux
        .list_windows(&session)
        .step(|| format!("list windows of session '{}'", session))?;

    for window in windows {
        let panes = mux
            .list_panes(&window.id)
            .step(|| format!("list panes of window '{}'", window.name))?;
        debug!(
            "Window '{}' ({}) has {} panes",
            window.name,
            window.id,
            panes.len()
        );

        spec.windows.push(WindowSpec {
            name: window.name,
            dir: String::new(),
            // tmux only knows the geometry string, not which named layout produced it.
            layout: String::new(),
            panes: panes
                .iter()
                .enumerate()
                .map(|(i, pane)| export_pane(i, pane))
                .collect(),
        });
    }

    info!(
        "Exported {} windows from session '{}'",
        spec.windows.len(),
        session
    );
    Ok(spec)
}

fn export_pane(index: usize, pane: &PaneInfo) -> PaneSpec {
    let cmd = if LOGIN_SHELLS.contains(&pane.current_command.as_str()) {
        String::new()
    } else {
        pane.current_command.clone()
    };
    // Orientation is not observable; every later pane is recorded as vertical.
    let split = if index > 0 {
        Split::Vertical.as_str().to_string()
    } else {
        String::new()
    };

    PaneSpec {
        cmd,
        dir: pane.current_path.clone(),
        split,
    }
}
