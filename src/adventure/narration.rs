//! Ordered narration lines produced while handling a player action.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narration {
    lines: Vec<String>,
}

impl Narration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Empty line, used to separate blocks of text.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if any line contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
