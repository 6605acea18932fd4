// ABOUTME: Multiplexer implementation that shells out to the tmux binary
// Query output is requested tab-delimited, one record per line, and parsed here

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

use super::error::TmuxError;
use super::port::{Multiplexer, PaneInfo, WindowInfo};
use crate::models::{Layout, Split};

const WINDOW_FORMAT: &str = "#{window_id}\t#{window_index}\t#{window_name}\t#{window_layout}";
const PANE_FORMAT: &str = "#{pane_id}\t#{pane_current_path}\t#{pane_current_command}";

pub struct TmuxCli {
    binary: String,
}

impl TmuxCli {
    pub fn new() -> Self {
        Self::with_binary("tmux")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Check that the tmux binary can be spawned at all
    pub fn check_tmux_installed(&self) -> Result<(), TmuxError> {
        self.output(&["-V"]).map(|_| ())
    }

    fn output(&self, args: &[&str]) -> Result<Output, TmuxError> {
        debug!("Running {} {}", self.binary, args.join(" "));
        Command::new(&self.binary).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TmuxError::TmuxNotInstalled
            } else {
                TmuxError::IoError(e)
            }
        })
    }

    /// Run a command and return its stdout, mapping a non-zero exit to an error.
    fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let output = self.output(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(args, stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a `-P -F` creation command and return the single id it prints.
    fn run_for_id(&self, args: &[&str]) -> Result<String, TmuxError> {
        let stdout = self.run(args)?;
        let id = stdout.trim();
        if id.is_empty() {
            return Err(TmuxError::UnexpectedOutput {
                command: args.join(" "),
                output: stdout,
            });
        }
        Ok(id.to_string())
    }
}

impl Default for TmuxCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiplexer for TmuxCli {
    fn session_exists(&self, session: &str) -> Result<bool, TmuxError> {
        let output = self.output(&["has-session", "-t", &exact(session)])?;
        Ok(output.status.success())
    }

    fn create_session(&self, session: &str, dir: &Path) -> Result<(), TmuxError> {
        let dir = dir.to_string_lossy();
        self.run(&["new-session", "-d", "-s", session, "-c", &dir])?;
        Ok(())
    }

    fn set_option(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError> {
        self.run(&["set-option", "-t", &exact(session), key, value])?;
        Ok(())
    }

    fn set_environment(&self, session: &str, key: &str, value: &str) -> Result<(), TmuxError> {
        self.run(&["set-environment", "-t", &exact(session), key, value])?;
        Ok(())
    }

    fn show_option(&self, session: &str, key: &str) -> Result<Option<String>, TmuxError> {
        let stdout = self.run(&["show-options", "-t", &exact(session), "-v", key])?;
        let value = stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    fn show_environment(&self, session: &str) -> Result<BTreeMap<String, String>, TmuxError> {
        let stdout = self.run(&["show-environment", "-t", &exact(session)])?;
        Ok(parse_environment(&stdout))
    }

    fn new_window(&self, session: &str, name: &str, dir: &Path) -> Result<String, TmuxError> {
        let target = format!("{}:", exact(session));
        let dir = dir.to_string_lossy();
        self.run_for_id(&[
            "new-window", "-d", "-t", &target, "-n", name, "-c", &dir, "-P", "-F", "#{window_id}",
        ])
    }

    fn rename_window(&self, window_id: &str, name: &str) -> Result<(), TmuxError> {
        self.run(&["rename-window", "-t", window_id, name])?;
        Ok(())
    }

    fn select_window(&self, window_id: &str) -> Result<(), TmuxError> {
        self.run(&["select-window", "-t", window_id])?;
        Ok(())
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, TmuxError> {
        let target = exact(session);
        let args: [&str; 5] = ["list-windows", "-t", &target, "-F", WINDOW_FORMAT];
        let stdout = self.run(&args)?;
        parse_windows(&stdout).map_err(|line| TmuxError::UnexpectedOutput {
            command: args.join(" "),
            output: line,
        })
    }

    fn split_window(&self, window_id: &str, split: Split, dir: &Path) -> Result<String, TmuxError> {
        let dir = dir.to_string_lossy();
        self.run_for_id(&[
            "split-window",
            "-t",
            window_id,
            split.tmux_flag(),
            "-c",
            &dir,
            "-P",
            "-F",
            "#{pane_id}",
        ])
    }

    fn send_keys(&self, pane_id: &str, text: &str) -> Result<(), TmuxError> {
        self.run(&["send-keys", "-t", pane_id, text, "Enter"])?;
        Ok(())
    }

    fn list_panes(&self, window_id: &str) -> Result<Vec<PaneInfo>, TmuxError> {
        let args = ["list-panes", "-t", window_id, "-F", PANE_FORMAT];
        let stdout = self.run(&args)?;
        parse_panes(&stdout).map_err(|line| TmuxError::UnexpectedOutput {
            command: args.join(" "),
            output: line,
        })
    }

    fn select_layout(&self, window_id: &str, layout: Layout) -> Result<(), TmuxError> {
        self.run(&["select-layout", "-t", window_id, layout.as_str()])?;
        Ok(())
    }

    fn kill_session(&self, session: &str) -> Result<(), TmuxError> {
        self.run(&["kill-session", "-t", &exact(session)])?;
        Ok(())
    }

    fn current_session(&self) -> Result<String, TmuxError> {
        // Outside a client tmux would answer for the most recent session instead.
        if std::env::var_os("TMUX").is_none() {
            return Err(TmuxError::NotAttached);
        }
        let stdout = self.run(&["display-message", "-p", "#{session_name}"])?;
        let name = stdout.trim();
        if name.is_empty() {
            return Err(TmuxError::NotAttached);
        }
        Ok(name.to_string())
    }
}

/// `=name` makes tmux match the session name exactly instead of by prefix.
fn exact(session: &str) -> String {
    format!("={}", session)
}

fn classify_failure(args: &[&str], stderr: String) -> TmuxError {
    if stderr.contains("no server running") || stderr.contains("error connecting to") {
        return TmuxError::ServerUnavailable(stderr);
    }
    TmuxError::CommandFailed {
        command: args.join(" "),
        stderr,
    }
}

/// Parse `list-windows` output; the offending line is returned on failure.
pub(crate) fn parse_windows(output: &str) -> Result<Vec<WindowInfo>, String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.splitn(4, '\t');
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(index), Some(name), Some(layout)) => Ok(WindowInfo {
                    id: id.to_string(),
                    index: index.parse().map_err(|_| line.to_string())?,
                    name: name.to_string(),
                    layout: layout.to_string(),
                }),
                _ => Err(line.to_string()),
            }
        })
        .collect()
}

pub(crate) fn parse_panes(output: &str) -> Result<Vec<PaneInfo>, String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.splitn(3, '\t');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(path), Some(command)) => Ok(PaneInfo {
                    id: id.to_string(),
                    current_path: path.to_string(),
                    current_command: command.to_string(),
                }),
                _ => Err(line.to_string()),
            }
        })
        .collect()
}

/// Parse `show-environment` output. Lines beginning with `-` mark variables
/// removed from the session and are skipped.
pub(crate) fn parse_environment(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_windows() {
        let output = "@1\t1\teditor\tc5e0,204x50,0,0,1\n@4\t2\tlogs\tb25d,204x50,0,0{102x50,0,0,4,101x50,103,0,5}\n";
        let windows = parse_windows(output).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].id, "@1");
        assert_eq!(windows[0].index, 1);
        assert_eq!(windows[0].name, "editor");
        assert_eq!(windows[1].layout, "b25d,204x50,0,0{102x50,0,0,4,101x50,103,0,5}");
    }

    #[test]
    fn test_parse_windows_rejects_short_lines() {
        let err = parse_windows("@1\t1\teditor\n").unwrap_err();
        assert_eq!(err, "@1\t1\teditor");
        assert!(parse_windows("@1\tone\tmain\tlayout\n").is_err());
    }

    #[test]
    fn test_parse_panes_keeps_colons_in_paths() {
        let output = "%0\t/home/me/a:b\tnvim\n%3\t/tmp\tzsh\n";
        let panes = parse_panes(output).unwrap();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes[0].current_path, "/home/me/a:b");
        assert_eq!(panes[0].current_command, "nvim");
        assert_eq!(panes[1].id, "%3");
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_panes("").unwrap().is_empty());
        assert!(parse_windows("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_environment_skips_unset_markers() {
        let output = "DISPLAY=:0\n-SSH_AGENT_PID\nEDITOR=nvim\n\nURL=http://x/?a=b\n";
        let env = parse_environment(output);
        assert_eq!(env.len(), 3);
        assert_eq!(env["DISPLAY"], ":0");
        assert_eq!(env["EDITOR"], "nvim");
        assert_eq!(env["URL"], "http://x/?a=b");
        assert!(!env.contains_key("SSH_AGENT_PID"));
    }

    #[test]
    fn test_classify_failure() {
        let err = classify_failure(
            &["has-session"],
            "no server running on /tmp/tmux-1000/default".into(),
        );
        assert!(matches!(err, TmuxError::ServerUnavailable(_)));

        let err = classify_failure(&["select-layout", "-t", "@1", "tiled"], "bad".into());
        match err {
            TmuxError::CommandFailed { command, stderr } => {
                assert_eq!(command, "select-layout -t @1 tiled");
                assert_eq!(stderr, "bad");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_binary_reports_not_installed() {
        let tmux = TmuxCli::with_binary("/nonexistent/bin/tmux-hive-test");
        assert!(matches!(
            tmux.session_exists("demo"),
            Err(TmuxError::TmuxNotInstalled)
        ));
        assert!(matches!(
            tmux.check_tmux_installed(),
            Err(TmuxError::TmuxNotInstalled)
        ));
    }
}
