use ratatui::text::Line;

/// Scroll state of the transcript pane.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TranscriptView {
    pub scroll_position: u16,
    pub max_scroll: u16,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_position = self.scroll_position.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_position = self.scroll_position.saturating_add(lines).min(self.max_scroll);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_position = self.max_scroll;
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll_position >= self.max_scroll
    }

    /// Recomputes the scroll range for `content_height` rows shown `viewport_height` at a time.
    pub fn update(&mut self, content_height: usize, viewport_height: u16) {
        let overflow = content_height.saturating_sub(viewport_height as usize);
        self.max_scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
        self.scroll_position = self.scroll_position.min(self.max_scroll);
    }
}

/// Rows `lines` occupy once word-wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            if text.is_empty() {
                1
            } else {
                textwrap::wrap(&text, width as usize).len().max(1)
            }
        })
        .sum()
}
