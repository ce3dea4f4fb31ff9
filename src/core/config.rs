use std::env;

const DEFAULT_EDITOR: &str = "vi";

/// Process-wide settings handed to every command handler.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Debug-level logging, from `--verbose`.
    pub verbose: bool,
    /// Editor taken from `$VISUAL` or `$EDITOR`, if any.
    pub editor: Option<String>,
}

impl AppConfig {
    pub fn from_env(verbose: bool) -> Self {
        let editor = ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.trim().is_empty());

        Self {
            verbose,
            editor,
        }
    }

    /// Resolves the editor command, preferring an explicit override.
    pub fn editor_command(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.editor.clone())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}
