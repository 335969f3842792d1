//! Console output as localization keys plus named parameters.
//!
//! The exact wording belongs to the localization layer. `fallback_text`
//! renders plain English for headless tools that have none.

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub key: &'static str,
    pub args: Vec<(&'static str, String)>,
    pub is_error: bool,
}

impl ConsoleMessage {
    pub fn line(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
            is_error: false,
        }
    }

    pub fn error(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
            is_error: true,
        }
    }

    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.args.push((name, value.to_string()));
        self
    }

    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// English rendering, used when no localization is loaded
    pub fn fallback_text(&self) -> String {
        let mut text = fallback_template(self.key).to_string();
        for (name, value) in &self.args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

fn fallback_template(key: &str) -> &'static str {
    match key {
        "cmd-starmap-list-desc" => "Lists every star on the starmap.",
        "cmd-starmap-list-help" => "Usage: starmap_list",
        "cmd-starmap-list-no-stars" => "No stars on the starmap.",
        "cmd-starmap-list-line" => "{index}: map {mapId} \"{name}\" at {position}",
        "cmd-regenhyperline-desc" => "Clears hyperlane overrides and regenerates the starmap.",
        "cmd-regenhyperline-help" => "Usage: regenhyperline",
        "cmd-regenhyperline-done" => "Hyperlanes regenerated.",
        "cmd-hypeline-desc" => "Adds a hyperlane between two stars.",
        "cmd-hypeline-help" => "Usage: hyperline <mapA> <mapB>",
        "cmd-hypeline-added" => "Hyperlane {mapA} <-> {mapB} added.",
        "cmd-hypeline-exists" => "Hyperlane {mapA} <-> {mapB} already exists.",
        "cmd-hypeline-blocked" => {
            "Hyperlane {mapA} <-> {mapB} is blocked until overrides are cleared."
        }
        "cmd-hypeline-star-not-found" => "No star for map {mapA} or map {mapB}.",
        "cmd-hypeline-same-star" => "A hyperlane needs two different stars, got {mapId} twice.",
        "cmd-unhyperline-desc" => "Removes the hyperlane between two stars.",
        "cmd-unhyperline-help" => "Usage: unhyperline <mapA> <mapB>",
        "cmd-unhyperline-removed" => "Hyperlane {mapA} <-> {mapB} removed.",
        "cmd-unhyperline-blocked-only" => {
            "No hyperlane between {mapA} and {mapB}; blocked it from regenerating."
        }
        "shell-wrong-arguments-number" => "Wrong number of arguments.",
        "shell-invalid-map-id" => "Invalid map id: {value}",
        "shell-unknown-command" => "Unknown command: {command}",
        _ => "{missing localization}",
    }
}

impl From<&CommandError> for ConsoleMessage {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::UnknownCommand(command) => {
                ConsoleMessage::error("shell-unknown-command").with("command", command)
            }
            CommandError::WrongArgumentCount { expected, found } => {
                ConsoleMessage::error("shell-wrong-arguments-number")
                    .with("expected", expected)
                    .with("found", found)
            }
            CommandError::InvalidMapId(value) => {
                ConsoleMessage::error("shell-invalid-map-id").with("value", value)
            }
            CommandError::StarNotFound { map_a, map_b } => {
                ConsoleMessage::error("cmd-hypeline-star-not-found")
                    .with("mapA", map_a)
                    .with("mapB", map_b)
            }
            CommandError::SameStar { map } => {
                ConsoleMessage::error("cmd-hypeline-same-star").with("mapId", map)
            }
        }
    }
}
