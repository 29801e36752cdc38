use notes_core::InlineMarkup;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Markdown rendering for block text and explanation answers. Raw HTML in
/// the source is shown as text, never injected.
///
/// Block text is inline-only: a leading `1985.` or `#` stays literal text
/// and never opens a list or heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkup;

impl InlineMarkup for PulldownMarkup {
    fn to_html(&self, source: &str) -> String {
        let escaped = escape_block_syntax(source);
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, inline_events(&escaped));
        out.trim_end().to_string()
    }

    fn to_plain(&self, source: &str) -> String {
        let escaped = escape_block_syntax(source);
        let mut plain = String::new();
        for event in inline_events(&escaped) {
            match event {
                Event::Text(text) | Event::Code(text) => plain.push_str(&text),
                Event::SoftBreak | Event::HardBreak => plain.push(' '),
                _ => {}
            }
        }
        plain.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Full block markdown to HTML, used for explanation answers.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(source, options).map(escape_raw_html);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Parser events with every block container removed. A block end becomes a
/// soft break so separate lines never run together.
fn inline_events(source: &str) -> impl Iterator<Item = Event<'_>> {
    Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).filter_map(|event| match event {
        Event::Start(tag) if !is_inline_tag(&tag) => None,
        Event::End(tag) if !is_inline_end(&tag) => Some(Event::SoftBreak),
        other => Some(escape_raw_html(other)),
    })
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

fn escape_raw_html(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(CowStr::from(raw.into_string())),
        other => other,
    }
}

/// Backslash-escapes whatever would open a block at the start of a line:
/// list markers, ATX headings, quotes, fences, rules and setext underlines.
/// Indentation is dropped so nothing becomes an indented code block.
fn escape_block_syntax(source: &str) -> String {
    source
        .split('\n')
        .map(|line| {
            let line = line.trim_start();
            match block_marker_at(line) {
                Some(at) => format!("{}\\{}", &line[..at], &line[at..]),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte offset of the character to escape, if `line` opens a block.
fn block_marker_at(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let first = *bytes.first()?;
    let followed_by_space = |at: usize| bytes.get(at).map_or(true, |b| *b == b' ' || *b == b'\t');

    match first {
        b'>' => Some(0),
        b'#' => {
            let hashes = bytes.iter().take_while(|b| **b == b'#').count();
            (hashes <= 6 && followed_by_space(hashes)).then_some(0)
        }
        b'-' | b'+' | b'*' | b'_' | b'=' if is_rule(line, first) => Some(0),
        b'-' | b'+' | b'*' if followed_by_space(1) => Some(0),
        b'`' | b'~' if line.starts_with("```") || line.starts_with("~~~") => Some(0),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            let delimiter = bytes.get(digits).copied();
            (digits <= 9
                && matches!(delimiter, Some(b'.') | Some(b')'))
                && followed_by_space(digits + 1))
            .then_some(digits)
        }
        _ => None,
    }
}

/// `---`, `* * *`, `___` or a setext `===` line.
fn is_rule(line: &str, marker: u8) -> bool {
    let count = line.bytes().filter(|b| *b == marker).count();
    let only_marker = line.bytes().all(|b| b == marker || b == b' ' || b == b'\t');
    let needed = if marker == b'=' { 1 } else { 3 };
    only_marker && count >= needed
}
