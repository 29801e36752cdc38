use notes_core::{GenerationMode, Msg};

use super::constants::SPLIT_CONTAINER;

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    Show,
    Help,
    Quit,
    /// Anything the popup state machine handles directly.
    Popup(Msg),
}

pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" => {
            if rest.is_empty() {
                return Err("usage: open <url>".to_string());
            }
            Command::Open(rest.to_string())
        }
        "mode" => {
            let mode = GenerationMode::parse(rest)
                .ok_or_else(|| format!("unknown mode {rest:?}, expected flash or pro"))?;
            Command::Popup(Msg::ModeSelected(mode))
        }
        "provider" => Command::Popup(Msg::ProviderSelected(optional(rest))),
        "key" => Command::Popup(Msg::ApiKeyChanged(optional(rest))),
        "generate" | "g" => Command::Popup(Msg::GenerateClicked),
        "explain" | "e" => {
            let marker_id = rest
                .parse::<usize>()
                .map_err(|_| "usage: explain <n>".to_string())?;
            Command::Popup(Msg::MarkerActivated { marker_id })
        }
        "close" => Command::Popup(Msg::PanelClosed),
        "press" => Command::Popup(Msg::DividerPressed),
        "move" => {
            let pointer_y = rest
                .parse::<f32>()
                .map_err(|_| "usage: move <y>".to_string())?;
            Command::Popup(Msg::DividerMoved {
                pointer_y,
                container: SPLIT_CONTAINER,
            })
        }
        "release" => Command::Popup(Msg::DividerReleased),
        "export" => Command::Popup(Msg::ExportClicked),
        "copy" => match rest {
            "" => Command::Popup(Msg::CopyNoteClicked),
            "answer" => Command::Popup(Msg::CopyAnswerClicked),
            _ => return Err("usage: copy [answer]".to_string()),
        },
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try `help`")),
    };
    Ok(Some(command))
}

fn optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
