use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input kind of a referenceable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    ShortText,
    LongText,
    Email,
    Date,
    FileUpload,
    MultipleChoice,
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// Maps an authoring-document node type onto a field kind.
    pub fn from_node_type(node_type: &str) -> Self {
        match node_type {
            "shortText" | "short_text" | "shortAnswer" => Self::ShortText,
            "longText" | "long_text" | "longAnswer" => Self::LongText,
            "email" | "emailInput" => Self::Email,
            "date" | "dateInput" => Self::Date,
            "fileUpload" | "file_upload" => Self::FileUpload,
            "multipleChoice" | "multiple_choice" => Self::MultipleChoice,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "shortText",
            Self::LongText => "longText",
            Self::Email => "email",
            Self::Date => "date",
            Self::FileUpload => "fileUpload",
            Self::MultipleChoice => "multipleChoice",
            Self::Unknown => "unknown",
        }
    }
}

/// Read-only view of a document field the engine can reference in rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    /// Preview text collected from the node's text children.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub required: bool,
    /// Option labels of a multiple-choice field, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            content: String::new(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}
