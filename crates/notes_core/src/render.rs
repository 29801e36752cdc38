use crate::block::{Block, KnowledgePoint};

/// Renders small inline markup strings. Implementations must return safe
/// HTML from `to_html`; `to_plain` strips the markup down to display text.
pub trait InlineMarkup: Send + Sync {
    fn to_html(&self, source: &str) -> String;
    fn to_plain(&self, source: &str) -> String;
}

/// Live view node produced from one block (or one run of list items).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    Heading { level: u8, html: String },
    Paragraph { html: String },
    List { items: Vec<String> },
    KnowledgePoint(Marker),
}

/// Interactive knowledge-point marker. `term` and `explanation` keep the raw
/// source since they are sent back to the backend on lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: usize,
    pub term: String,
    pub explanation: String,
    pub label_html: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedDocument {
    pub nodes: Vec<ViewNode>,
    pub canonical: String,
    visible_text: String,
}

impl RenderedDocument {
    pub fn marker(&self, id: usize) -> Option<&Marker> {
        self.markers().find(|marker| marker.id == id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::KnowledgePoint(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn list_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, ViewNode::List { .. }))
            .count()
    }

    /// Plain text of the live view, one line per rendered element.
    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Single pass over `blocks`, producing the live view and the canonical
/// markdown reconstruction side by side.
pub fn render(blocks: &[Block], inline: &dyn InlineMarkup) -> RenderedDocument {
    let mut ctx = RenderContext::new(inline);
    for block in blocks {
        if !block.is_list_item() {
            ctx.close_list();
        }
        match block {
            Block::Heading(text) => ctx.push_heading(text),
            Block::Paragraph(text) => ctx.push_paragraph(text),
            Block::ListItem(text) => ctx.push_list_item(text),
            Block::KnowledgePoint(point) => ctx.push_knowledge_point(point),
        }
    }
    ctx.close_list();
    ctx.into_document()
}

struct RenderContext<'a> {
    inline: &'a dyn InlineMarkup,
    nodes: Vec<ViewNode>,
    canonical: String,
    visible: Vec<String>,
    open_list: Option<Vec<String>>,
    next_marker: usize,
}

impl<'a> RenderContext<'a> {
    fn new(inline: &'a dyn InlineMarkup) -> Self {
        Self {
            inline,
            nodes: Vec::new(),
            canonical: String::new(),
            visible: Vec::new(),
            open_list: None,
            next_marker: 0,
        }
    }

    fn push_heading(&mut self, text: &str) {
        self.nodes.push(ViewNode::Heading {
            level: 2,
            html: self.inline.to_html(text),
        });
        self.visible.push(self.inline.to_plain(text));
        self.canonical.push_str("## ");
        self.canonical.push_str(text);
        self.canonical.push_str("\n\n");
    }

    fn push_paragraph(&mut self, text: &str) {
        self.nodes.push(ViewNode::Paragraph {
            html: self.inline.to_html(text),
        });
        self.visible.push(self.inline.to_plain(text));
        self.canonical.push_str(text);
        self.canonical.push_str("\n\n");
    }

    fn push_list_item(&mut self, text: &str) {
        let html = self.inline.to_html(text);
        self.open_list.get_or_insert_with(Vec::new).push(html);
        self.visible.push(self.inline.to_plain(text));
        self.canonical.push_str("* ");
        self.canonical.push_str(text);
        self.canonical.push('\n');
    }

    fn push_knowledge_point(&mut self, point: &KnowledgePoint) {
        let marker = Marker {
            id: self.next_marker,
            term: point.term.clone(),
            explanation: point.explanation.clone(),
            label_html: self.inline.to_html(&point.term),
            hint: self.inline.to_plain(&point.explanation),
        };
        self.next_marker += 1;
        self.visible.push(self.inline.to_plain(&point.term));
        self.nodes.push(ViewNode::KnowledgePoint(marker));
        self.canonical.push_str("> **");
        self.canonical.push_str(&point.term);
        self.canonical.push_str("**: ");
        self.canonical.push_str(&point.explanation);
        self.canonical.push_str("\n\n");
    }

    fn close_list(&mut self) {
        if let Some(items) = self.open_list.take() {
            self.nodes.push(ViewNode::List { items });
            self.canonical.push('\n');
        }
    }

    fn into_document(self) -> RenderedDocument {
        RenderedDocument {
            nodes: self.nodes,
            canonical: self.canonical,
            visible_text: self.visible.join("\n"),
        }
    }
}
