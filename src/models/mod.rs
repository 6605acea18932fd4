// ABOUTME: Declarative session model: tree types, YAML document handling, and validation

pub mod document;
pub mod layout;
pub mod session;
pub mod validation;

pub use document::{parse_file, parse_str, to_yaml, write_file, ConfigError};
pub use layout::{Layout, Split};
pub use session::{resolve_dir, OptionValue, PaneSpec, SessionMeta, SessionSpec, WindowSpec};
pub use validation::{validate, ValidationError, ValidationErrors};
