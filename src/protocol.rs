use serde::{Deserialize, Serialize};

/// Form body of every chat turn: `user_input=<text>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatForm {
    pub user_input: String,
}

/// JSON body returned by the chat endpoints. Every field is optional and the
/// client checks each one on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Empty strings count as absent, matching how the browser widget reads these fields.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl ChatReply {
    pub fn response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn question(text: impl Into<String>) -> Self {
        Self {
            question: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(options.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            error: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn response_text(&self) -> Option<&str> {
        present(&self.response)
    }

    pub fn question_text(&self) -> Option<&str> {
        present(&self.question)
    }

    pub fn error_text(&self) -> Option<&str> {
        present(&self.error)
    }

    /// An options array counts even when it is empty.
    pub fn option_list(&self) -> Option<&[String]> {
        self.options.as_deref()
    }
}
