use reqwest::Client;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::constants;
use crate::protocol::{ChatForm, ChatReply};

/// The request never produced a usable reply: connection failure, or a body
/// that is not the reply JSON object.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reply from {url} is not valid chat JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Delivers one user turn to the chat service.
pub trait ChatBackend {
    fn process_chat(
        &self,
        user_input: &str,
    ) -> impl Future<Output = Result<ChatReply, TransportError>> + Send;

    /// Same call for a picked option. Defaults to the chat endpoint.
    fn process_option(
        &self,
        option: &str,
    ) -> impl Future<Output = Result<ChatReply, TransportError>> + Send {
        self.process_chat(option)
    }
}

/// `ChatBackend` over HTTP: form-encoded POSTs to the chat service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    chat_path: String,
    option_path: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_path: constants::CHAT_PATH.to_string(),
            option_path: constants::CHAT_PATH.to_string(),
        }
    }

    /// Route picked options somewhere other than the chat endpoint.
    pub fn with_option_path(mut self, path: &str) -> Self {
        self.option_path = path.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Loads the host page, which starts a fresh conversation on the server.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn start_conversation(&self) -> Result<(), TransportError> {
        let url = self.url("/");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        debug!(status = %response.status(), "Conversation reset");
        Ok(())
    }

    // The status code is not part of the contract; any JSON body is a reply.
    async fn post(&self, path: &str, user_input: &str) -> Result<ChatReply, TransportError> {
        let url = self.url(path);
        let form = ChatForm {
            user_input: user_input.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        debug!(%url, status = %response.status(), "Chat reply received");
        response
            .json::<ChatReply>()
            .await
            .map_err(|source| TransportError::Decode { url, source })
    }
}

impl ChatBackend for HttpBackend {
    async fn process_chat(&self, user_input: &str) -> Result<ChatReply, TransportError> {
        self.post(&self.chat_path, user_input).await
    }

    async fn process_option(&self, option: &str) -> Result<ChatReply, TransportError> {
        self.post(&self.option_path, option).await
    }
}
