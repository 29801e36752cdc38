use notes_core::{AnnotationBody, AppViewModel, LayoutView, TaskPhase, ViewNode};
use scraper::{ElementRef, Html};

use super::constants::LAYOUT_BAR_WIDTH;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let provider = view.provider.as_deref().unwrap_or("default");
    lines.push(format!(
        "[{}] mode {} | provider {} | generate {}",
        phase_label(&view.phase),
        view.mode.as_str(),
        provider,
        if view.generate_enabled { "ready" } else { "busy" }
    ));
    if !view.status_text.is_empty() {
        lines.push(view.status_text.clone());
    }

    if let Some(nodes) = &view.document {
        if view.annotation.is_some() {
            lines.push(layout_bar(&view.layout));
        }
        lines.push(String::new());
        for node in nodes {
            render_node(node, &mut lines);
        }
        if view.note_actions_visible {
            let export = if view.exporting { "exporting..." } else { "export" };
            lines.push(format!("actions: {export} | copy"));
        }
    }

    if let Some(panel) = &view.annotation {
        lines.push(String::new());
        lines.push(format!("== {} ==", panel.title));
        match &panel.body {
            AnnotationBody::Loading => lines.push("Loading...".to_string()),
            AnnotationBody::Answer(explanation) => {
                lines.extend(html_lines(&explanation.html));
                lines.push("actions: copy answer".to_string());
            }
            AnnotationBody::Error(message) => lines.push(format!("Error: {message}")),
        }
    }

    lines
}

fn render_node(node: &ViewNode, lines: &mut Vec<String>) {
    match node {
        ViewNode::Heading { html, .. } => {
            lines.push(format!("## {}", node_text(html)));
            lines.push(String::new());
        }
        ViewNode::Paragraph { html } => {
            lines.push(node_text(html));
            lines.push(String::new());
        }
        ViewNode::List { items } => {
            lines.extend(items.iter().map(|item| format!("  * {}", node_text(item))));
            lines.push(String::new());
        }
        ViewNode::KnowledgePoint(marker) => {
            lines.push(format!(
                "  [{}] {} ({})",
                marker.id,
                node_text(&marker.label_html),
                marker.hint
            ));
            lines.push(String::new());
        }
    }
}

fn phase_label(phase: &TaskPhase) -> &'static str {
    match phase {
        TaskPhase::Idle => "idle",
        TaskPhase::ResolvingPage => "resolving",
        TaskPhase::Submitting { .. } => "submitting",
        TaskPhase::Polling { .. } => "polling",
        TaskPhase::Ready => "ready",
        TaskPhase::Failed => "failed",
    }
}

fn layout_bar(layout: &LayoutView) -> String {
    let doc_cells = ((layout.document_percent / 100.0) * LAYOUT_BAR_WIDTH as f32).round() as usize;
    let doc_cells = doc_cells.min(LAYOUT_BAR_WIDTH);
    let divider = if layout.dragging { '#' } else { '|' };
    format!(
        "{}{}{} doc {:.0}% / notes {:.0}%",
        "=".repeat(doc_cells),
        divider,
        "-".repeat(LAYOUT_BAR_WIDTH - doc_cells),
        layout.document_percent,
        layout.annotation_percent
    )
}

/// Terminal text of an inline HTML fragment.
fn node_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    squash(&fragment.root_element().text().collect::<String>())
}

/// One terminal line per block of a rendered answer. List items keep a
/// bullet, preformatted text keeps its lines.
fn html_lines(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut lines = Vec::new();
    for child in fragment.root_element().children() {
        if let Some(text) = child.value().as_text() {
            let text = squash(text);
            if !text.is_empty() {
                lines.push(text);
            }
            continue;
        }
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };
        match element.value().name() {
            "ul" | "ol" => {
                for item in element.children().filter_map(ElementRef::wrap) {
                    lines.push(format!("  * {}", squash(&item.text().collect::<String>())));
                }
            }
            "pre" => lines.extend(
                element
                    .text()
                    .collect::<String>()
                    .lines()
                    .map(|line| format!("    {line}")),
            ),
            _ => lines.push(squash(&element.text().collect::<String>())),
        }
    }
    lines
}

fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
