// ABOUTME: Session templates compiled into the binary
// Each one is a YAML document so it reads exactly like a user's own config

const BASIC: &str = r#"session:
  name: basic
  base_dir: .
windows:
  - name: main
    panes:
      - cmd: ""
options:
  mouse: "on"
  base-index: 1
  history-limit: 50000
"#;

const DEV: &str = r#"session:
  name: dev
  base_dir: .
windows:
  - name: editor
    layout: main-vertical
    panes:
      - cmd: nvim .
      - split: vertical
  - name: terminal
    layout: even-vertical
    panes:
      - cmd: ""
      - split: vertical
  - name: logs
    panes:
      - cmd: ""
options:
  mouse: "on"
  base-index: 1
  history-limit: 50000
"#;

const CTF: &str = r#"session:
  name: ctf-dev
  base_dir: .
windows:
  - name: editor
    layout: main-vertical
    panes:
      - cmd: nvim .
      - split: vertical
  - name: docker
    dir: ./docker
    panes:
      - cmd: docker-compose up
      - cmd: docker-compose logs -f
        split: horizontal
  - name: recon
    layout: tiled
    panes:
      - cmd: ""
      - split: vertical
      - split: horizontal
      - split: vertical
  - name: notes
    panes:
      - cmd: ""
options:
  mouse: "on"
  base-index: 1
  history-limit: 50000
env:
  CHALLENGE_ID: challenge-001
  DEBUG: "true"
"#;

const WEB: &str = r#"session:
  name: web-dev
  base_dir: .
windows:
  - name: editor
    layout: main-vertical
    panes:
      - cmd: nvim .
      - split: vertical
  - name: frontend
    dir: ./frontend
    panes:
      - cmd: npm run dev
      - cmd: npm run test -- --watch
        split: vertical
  - name: backend
    dir: ./backend
    panes:
      - cmd: npm run dev
      - cmd: npm run test -- --watch
        split: vertical
  - name: database
    panes:
      - cmd: docker-compose up postgres redis
      - split: vertical
options:
  mouse: "on"
  base-index: 1
  history-limit: 50000
env:
  NODE_ENV: development
"#;

const BLANK: &str = r#"session:
  name: my-session
  base_dir: .
windows:
  - name: main
    panes:
      - cmd: ""
options:
  mouse: "on"
  base-index: 1
  history-limit: 50000
"#;

/// Built-in templates by name, sorted. `minimal` is another name for `blank`.
pub const BUILTINS: [(&str, &str); 6] = [
    ("basic", BASIC),
    ("blank", BLANK),
    ("ctf", CTF),
    ("dev", DEV),
    ("minimal", BLANK),
    ("web", WEB),
];

pub fn get(name: &str) -> Option<&'static str> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, text)| *text)
}

pub fn is_builtin(name: &str) -> bool {
    get(name).is_some()
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}
