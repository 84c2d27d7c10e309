use crate::constants::{FINAL_OPTIONS, QUESTIONS};
use crate::protocol::ChatReply;

/// Server-side conversation state: which question comes next and every
/// answer recorded so far.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Interview {
    question_index: usize,
    responses: Vec<String>,
}

impl Interview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.question_index = 0;
        self.responses.clear();
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub fn is_finished(&self) -> bool {
        self.question_index >= QUESTIONS.len()
    }

    /// Handles one `/process_chat` turn. The first turn only opens the
    /// interview; every later input is an answer. Once all questions are
    /// asked, each turn gets the final options.
    pub fn advance(&mut self, user_input: &str) -> ChatReply {
        if self.question_index > 0 {
            self.responses.push(user_input.to_string());
        }
        match QUESTIONS.get(self.question_index) {
            Some(question) => {
                self.question_index += 1;
                ChatReply::question(*question)
            }
            None => {
                self.question_index = QUESTIONS.len();
                ChatReply::options(FINAL_OPTIONS)
            }
        }
    }

    /// Records the picked final option and returns the answers the advisor works from.
    pub fn choose_final_option(&mut self, user_input: &str) -> Vec<String> {
        self.responses.push(user_input.to_string());
        self.responses.clone()
    }
}
