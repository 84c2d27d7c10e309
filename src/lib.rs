pub mod advisor;
pub mod app_state;
pub mod backend;
pub mod chat;
pub mod constants;
pub mod events;
pub mod interview;
pub mod protocol;
pub mod transcript;
pub mod ui;
pub mod ui_components;
pub mod web_server;
pub mod widget;

pub use backend::{ChatBackend, HttpBackend, TransportError};
pub use protocol::ChatReply;
pub use transcript::{Entry, EntryBody, Role, Transcript};
pub use widget::{ChatWidget, PendingTurn, Rejected, TurnOrigin};
