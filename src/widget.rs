//! The chat widget controller.
//!
//! [`ChatWidget`] owns the transcript, the input buffer and the busy flag. A
//! turn is split in two so that any front end can run the request wherever it
//! likes: `begin_*` validates and returns a [`PendingTurn`], the caller sends
//! it, and [`ChatWidget::complete`] applies whatever came back. The async
//! `send_*` helpers do all three in place.

use tracing::{debug, error, info};

use crate::backend::{ChatBackend, TransportError};
use crate::protocol::ChatReply;
use crate::transcript::{Entry, EntryBody, Role, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrigin {
    /// Typed into the input and submitted.
    Typed,
    /// An option control was activated.
    Option,
}

/// A dispatched turn waiting for its reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub origin: TurnOrigin,
    /// Exactly what goes on the wire as `user_input`.
    pub user_input: String,
}

/// Why a submit produced no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    EmptyInput,
    Busy,
    UnknownOption,
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    transcript: Transcript,
    input: String,
    busy: bool,
    follow_bottom: bool,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True once an append asked the view to show the newest entry. Views
    /// reset it through [`ChatWidget::release_bottom`] when the user scrolls away.
    pub fn follows_bottom(&self) -> bool {
        self.follow_bottom
    }

    pub fn release_bottom(&mut self) {
        self.follow_bottom = false;
    }

    fn append(&mut self, role: Role, body: EntryBody) {
        let entry = self.transcript.push(role, body);
        debug!(role = %entry.role, "Appended transcript entry");
        self.input.clear();
        self.follow_bottom = true;
    }

    fn append_text(&mut self, role: Role, text: &str) {
        self.append(role, EntryBody::Text(text.to_string()));
    }

    fn append_options(&mut self, options: &[String]) {
        self.append(Role::Robot, EntryBody::Options(options.to_vec()));
    }

    /// Starts a typed turn from the input buffer. The raw, untrimmed text is sent.
    pub fn begin_submit(&mut self) -> Result<PendingTurn, Rejected> {
        if self.input.trim().is_empty() {
            return Err(Rejected::EmptyInput);
        }
        if self.busy {
            debug!("Submit ignored, a turn is already in flight");
            return Err(Rejected::Busy);
        }
        self.busy = true;
        Ok(PendingTurn {
            origin: TurnOrigin::Typed,
            user_input: self.input.clone(),
        })
    }

    /// Starts an option turn. The choice shows up as a user entry right away.
    pub fn begin_option(&mut self, option: &str) -> Result<PendingTurn, Rejected> {
        if self.busy {
            debug!("Option ignored, a turn is already in flight");
            return Err(Rejected::Busy);
        }
        self.busy = true;
        self.append_text(Role::User, option);
        Ok(PendingTurn {
            origin: TurnOrigin::Option,
            user_input: option.to_string(),
        })
    }

    /// Activates the control at `(entry, option)` in the transcript.
    pub fn activate_option(&mut self, entry: usize, option: usize) -> Result<PendingTurn, Rejected> {
        let label = self
            .transcript
            .option_label(entry, option)
            .ok_or(Rejected::UnknownOption)?
            .to_string();
        self.begin_option(&label)
    }

    /// Applies the outcome of a dispatched turn and frees the widget for the next one.
    pub fn complete(&mut self, turn: PendingTurn, outcome: Result<ChatReply, TransportError>) {
        self.busy = false;
        let reply = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, user_input = %turn.user_input, "Chat request failed");
                return;
            }
        };
        match turn.origin {
            TurnOrigin::Typed => self.apply_typed_reply(&turn.user_input, &reply),
            TurnOrigin::Option => self.apply_option_reply(&reply),
        }
    }

    fn apply_typed_reply(&mut self, user_input: &str, reply: &ChatReply) {
        if let Some(error) = reply.error_text() {
            info!(%error, "Chat service reported an error");
            self.append_text(Role::Robot, &format!("Error: {}", error));
            return;
        }
        self.append_text(Role::User, user_input);
        if let Some(response) = reply.response_text() {
            self.append_text(Role::Robot, response);
        }
        if let Some(question) = reply.question_text() {
            self.append_text(Role::Robot, question);
        }
        if let Some(options) = reply.option_list() {
            self.append_options(options);
        }
    }

    // Each field is handled on its own here, errors included.
    fn apply_option_reply(&mut self, reply: &ChatReply) {
        if let Some(response) = reply.response_text() {
            self.append_text(Role::Robot, response);
        }
        if let Some(options) = reply.option_list() {
            self.append_options(options);
        }
        if let Some(error) = reply.error_text() {
            info!(%error, "Chat service reported an error");
            self.append_text(Role::Robot, &format!("Error: {}", error));
        }
    }

    /// Submit action: one request for a non-empty input, nothing otherwise.
    pub async fn send_user_input<B: ChatBackend>(&mut self, backend: &B) -> Result<(), Rejected> {
        let turn = self.begin_submit()?;
        let outcome = backend.process_chat(&turn.user_input).await;
        self.complete(turn, outcome);
        Ok(())
    }

    /// Option selection action.
    pub async fn send_option<B: ChatBackend>(
        &mut self,
        backend: &B,
        option: &str,
    ) -> Result<(), Rejected> {
        let turn = self.begin_option(option)?;
        let outcome = backend.process_option(&turn.user_input).await;
        self.complete(turn, outcome);
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        self.transcript.entries()
    }
}
