// config.rs

pub const DEFAULT_PROMPT: &str = "catshell> ";
pub const HISTORY_SIZE: usize = 10;
/// Includes the newline and the terminator slot, like an `fgets` buffer.
pub const MAX_CMD_LENGTH: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub history_capacity: usize,
    pub max_line_len: usize,
}

impl ShellConfig {
    /// Content bytes a single read may return.
    pub fn line_budget(&self) -> usize {
        self.max_line_len.saturating_sub(1).max(1)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_capacity: HISTORY_SIZE,
            max_line_len: MAX_CMD_LENGTH,
        }
    }
}
