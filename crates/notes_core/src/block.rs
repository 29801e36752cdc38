use serde::{Deserialize, Serialize};

/// One typed unit of generated note content.
///
/// On the wire every block is `{"type": <tag>, "content": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Heading(String),
    Paragraph(String),
    /// Contiguous list items render as a single list.
    ListItem(String),
    KnowledgePoint(KnowledgePoint),
}

/// An annotated term. `term` is both the display label and the lookup key;
/// `explanation` is the short gloss shown as a hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgePoint {
    pub term: String,
    pub explanation: String,
}

/// Payload carried inside a note's serialized `content` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContent {
    pub notes: Vec<Block>,
}

impl Block {
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading(text.into())
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(text.into())
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Block::ListItem(text.into())
    }

    pub fn knowledge_point(term: impl Into<String>, explanation: impl Into<String>) -> Self {
        Block::KnowledgePoint(KnowledgePoint {
            term: term.into(),
            explanation: explanation.into(),
        })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::ListItem(_))
    }

    /// Wire tag, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading(_) => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::ListItem(_) => "list_item",
            Block::KnowledgePoint(_) => "knowledge_point",
        }
    }
}
