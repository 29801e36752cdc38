use notes_core::ContainerBounds;

/// The terminal has no pixels; divider positions are given on a 0..100
/// ruler spanning both regions.
pub const SPLIT_CONTAINER: ContainerBounds = ContainerBounds {
    top: 0.0,
    height: 100.0,
};

pub const LAYOUT_BAR_WIDTH: usize = 40;

pub const PROMPT: &str = "notes> ";

pub const HELP: &str = "\
Commands:
  open <url>          set the active page
  mode flash|pro      choose generation mode
  provider [name]     choose a provider (blank clears)
  key [api-key]       set the API key (blank clears)
  generate            generate notes for the active page
  explain <n>         explain knowledge point [n]
  close               close the explanation panel
  press | move <y> | release
                      drag the divider (y on a 0..100 ruler)
  export              export the note as markdown into ./output
  copy                print the note's markdown
  copy answer         print the explanation's markdown
  show                redraw
  help                this text
  quit";
