#![allow(dead_code)]

use std::sync::Once;

use notes_core::{render, Block, InlineMarkup, RenderedDocument};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(notes_logging::initialize_for_tests);
}

/// Wraps text in a span and drops emphasis markers, enough to tell the view
/// apart from the canonical source.
pub struct SpanMarkup;

impl InlineMarkup for SpanMarkup {
    fn to_html(&self, source: &str) -> String {
        format!("<span>{}</span>", source.replace("**", ""))
    }

    fn to_plain(&self, source: &str) -> String {
        source.replace("**", "")
    }
}

pub fn render_blocks(blocks: &[Block]) -> RenderedDocument {
    render(blocks, &SpanMarkup)
}

pub fn sample_blocks() -> Vec<Block> {
    vec![
        Block::heading("Intro"),
        Block::paragraph("Hello"),
        Block::list_item("A"),
        Block::list_item("B"),
        Block::knowledge_point("RAG", "retrieval augmented generation"),
    ]
}
