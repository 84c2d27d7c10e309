use chrono::Local;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Robot,
}

impl Role {
    /// Style tag used by every projection (CSS class in the page, label in the TUI).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Robot => "robot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    Text(String),
    /// One activatable control per string.
    Options(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub timestamp: String,
    pub role: Role,
    pub body: EntryBody,
}

impl Entry {
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Text(text) => Some(text),
            EntryBody::Options(_) => None,
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.body {
            EntryBody::Options(options) => Some(options),
            EntryBody::Text(_) => None,
        }
    }
}

/// Append-only chat log. Entries are never edited or removed.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, body: EntryBody) -> &Entry {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        self.entries.push(Entry {
            timestamp,
            role,
            body,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Every option control currently on screen, as `(entry index, option index)`,
    /// oldest block first.
    pub fn option_controls(&self) -> Vec<(usize, usize)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.options().map(|opts| (i, opts.len())))
            .flat_map(|(i, n)| (0..n).map(move |j| (i, j)))
            .collect()
    }

    pub fn option_label(&self, entry: usize, option: usize) -> Option<&str> {
        self.get(entry)?.options()?.get(option).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_new() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn test_push_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.push(Role::User, EntryBody::Text("Hello".to_string()));
        transcript.push(Role::Robot, EntryBody::Text("Hi there!".to_string()));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].role, Role::User);
        assert_eq!(transcript.entries()[0].text(), Some("Hello"));
        assert_eq!(transcript.entries()[1].role, Role::Robot);
        assert_eq!(transcript.entries()[1].text(), Some("Hi there!"));
        assert_eq!(transcript.entries()[1].timestamp.len(), "12:00:00".len());
    }

    #[test]
    fn test_option_controls_span_all_blocks() {
        let mut transcript = Transcript::new();
        transcript.push(
            Role::Robot,
            EntryBody::Options(vec!["A".to_string(), "B".to_string()]),
        );
        transcript.push(Role::User, EntryBody::Text("A".to_string()));
        transcript.push(Role::Robot, EntryBody::Options(vec!["C".to_string()]));

        assert_eq!(transcript.option_controls(), vec![(0, 0), (0, 1), (2, 0)]);
        assert_eq!(transcript.option_label(0, 1), Some("B"));
        assert_eq!(transcript.option_label(2, 0), Some("C"));
        assert_eq!(transcript.option_label(1, 0), None);
        assert_eq!(transcript.option_label(2, 5), None);
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Robot.as_str(), "robot");
    }
}
