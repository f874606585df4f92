use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Languages a room can be switched to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Python,
    Java,
}

impl Language {
    /// Template content a freshly created room starts with.
    pub fn default_template(&self) -> &'static str {
        match self {
            Language::Javascript => "// Start coding together...\n",
            Language::Python => "# Start coding together...\n",
            Language::Java => {
                "public class Main {\n    public static void main(String[] args) {\n    }\n}\n"
            }
        }
    }

    /// File name handed to the execution service when the caller omits one.
    pub fn default_filename(&self) -> &'static str {
        match self {
            Language::Javascript => "main.js",
            Language::Python => "main.py",
            Language::Java => "Main.java",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Javascript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Java => write!(f, "java"),
        }
    }
}

/// Authoritative state of one room.
///
/// `content` is always a full snapshot, never a diff log. The three fields are
/// independently owned: each inbound event overwrites exactly one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    pub content: String,
    pub language: Language,
    pub output: Vec<String>,
}

impl RoomState {
    pub fn with_defaults() -> Self {
        let language = Language::default();
        Self {
            content: language.default_template().to_string(),
            language,
            output: Vec::new(),
        }
    }
}

impl Default for RoomState {
    fn default() -> Self {
        Self::with_defaults()
    }
}
