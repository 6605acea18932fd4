// ABOUTME: Named tmux layouts and pane split orientations accepted in session configs

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    EvenHorizontal,
    EvenVertical,
    MainHorizontal,
    MainVertical,
    Tiled,
}

impl Layout {
    pub const ALL: [Layout; 5] = [
        Layout::EvenHorizontal,
        Layout::EvenVertical,
        Layout::MainHorizontal,
        Layout::MainVertical,
        Layout::Tiled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::EvenHorizontal => "even-horizontal",
            Layout::EvenVertical => "even-vertical",
            Layout::MainHorizontal => "main-horizontal",
            Layout::MainVertical => "main-vertical",
            Layout::Tiled => "tiled",
        }
    }

    /// Comma-separated list of accepted names, for error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown layout '{}'", s))
    }
}

/// Orientation of the split that creates a pane.
///
/// `Horizontal` places the new pane beside the current one (`split-window -h`),
/// `Vertical` stacks it below (`split-window -v`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Split {
    Horizontal,
    #[default]
    Vertical,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Horizontal, Split::Vertical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Horizontal => "horizontal",
            Split::Vertical => "vertical",
        }
    }

    pub fn tmux_flag(&self) -> &'static str {
        match self {
            Split::Horizontal => "-h",
            Split::Vertical => "-v",
        }
    }

    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Split::Horizontal),
            "vertical" => Ok(Split::Vertical),
            other => Err(format!("unknown split '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_names_parse() {
        for layout in Layout::ALL {
            assert_eq!(layout.as_str().parse::<Layout>(), Ok(layout));
        }
        assert!("spiral".parse::<Layout>().is_err());
        assert!("".parse::<Layout>().is_err());
    }

    #[test]
    fn test_layout_names_listing() {
        assert_eq!(
            Layout::names(),
            "even-horizontal, even-vertical, main-horizontal, main-vertical, tiled"
        );
    }

    #[test]
    fn test_split_flags() {
        assert_eq!(Split::Horizontal.tmux_flag(), "-h");
        assert_eq!(Split::Vertical.tmux_flag(), "-v");
        assert_eq!(Split::default(), Split::Vertical);
        assert!("diagonal".parse::<Split>().is_err());
    }
}
