use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::transcript::Transcript;
use crate::ui_components::TranscriptView;
use crate::widget::ChatWidget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    /// Index into [`Transcript::option_controls`].
    Options(usize),
}

pub struct AppState {
    pub widget: ChatWidget,
    pub textarea: TextArea<'static>,
    pub focus: Focus,
    pub transcript_view: TranscriptView,
    pub show_help: bool,
    pub server_url: String,
}

fn new_textarea(text: &str) -> TextArea<'static> {
    let mut textarea = TextArea::from(text.lines().map(str::to_string).collect::<Vec<_>>());
    textarea.set_block(Block::default().borders(Borders::ALL).title("Message"));
    textarea.set_placeholder_text("Type your answer and press Enter");
    textarea.move_cursor(tui_textarea::CursorMove::End);
    textarea
}

impl AppState {
    pub fn new(server_url: &str) -> Self {
        Self {
            widget: ChatWidget::new(),
            textarea: new_textarea(""),
            focus: Focus::Input,
            transcript_view: TranscriptView::new(),
            show_help: false,
            server_url: server_url.to_string(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        self.widget.transcript()
    }

    pub fn textarea_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Copies what is typed into the widget's input buffer.
    pub fn sync_input_from_textarea(&mut self) {
        let text = self.textarea_text();
        self.widget.set_input(text);
    }

    /// Rebuilds the input pane when the widget changed the buffer (appends clear it).
    pub fn sync_textarea_from_widget(&mut self) {
        if self.textarea_text() != self.widget.input() {
            self.textarea = new_textarea(self.widget.input());
        }
    }

    /// The `(entry, option)` pair the focus points at, if any.
    pub fn selected_control(&self) -> Option<(usize, usize)> {
        match self.focus {
            Focus::Input => None,
            Focus::Options(i) => self.transcript().option_controls().get(i).copied(),
        }
    }

    /// Tab: input → first control of the newest option block → input.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Options(_) => Focus::Input,
            Focus::Input => {
                let controls = self.transcript().option_controls();
                match controls.last() {
                    Some(&(newest, _)) => {
                        let first = controls.iter().position(|&(e, _)| e == newest).unwrap_or(0);
                        Focus::Options(first)
                    }
                    None => Focus::Input,
                }
            }
        };
    }

    pub fn select_previous_option(&mut self) {
        if let Focus::Options(i) = self.focus {
            self.focus = Focus::Options(i.saturating_sub(1));
        }
    }

    pub fn select_next_option(&mut self) {
        if let Focus::Options(i) = self.focus {
            let count = self.transcript().option_controls().len();
            if i + 1 < count {
                self.focus = Focus::Options(i + 1);
            }
        }
    }
}
