use crate::config::RenderConfig;
use crate::config::TableCellMode;

/// Node categories the engine decorates, one per query capture name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capture {
    Heading,
    Dash,
    Code,
    CodeInline,
    ListMarker,
    CheckboxChecked,
    CheckboxUnchecked,
    Quote,
    Table,
    Link,
    Shortcut,
}

/// Producers run in phases so block layouts can measure decorated inline content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Blocks that replace whole rows and draw their inline content themselves.
    Claim,
    Inline,
    Block,
}

const CAPTURES: &[(&str, Capture)] = &[
    ("heading", Capture::Heading),
    ("dash", Capture::Dash),
    ("code", Capture::Code),
    ("code_inline", Capture::CodeInline),
    ("list_marker", Capture::ListMarker),
    ("checkbox_checked", Capture::CheckboxChecked),
    ("checkbox_unchecked", Capture::CheckboxUnchecked),
    ("quote", Capture::Quote),
    ("table", Capture::Table),
    ("link", Capture::Link),
    ("shortcut", Capture::Shortcut),
];

impl Capture {
    pub fn from_name(name: &str) -> Option<Self> {
        CAPTURES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, capture)| *capture)
    }

    pub fn name(self) -> &'static str {
        CAPTURES
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(n, _)| *n)
            .unwrap_or_default()
    }

    pub fn phase(self) -> Phase {
        match self {
            Capture::Link | Capture::Shortcut | Capture::CodeInline => Phase::Inline,
            _ => Phase::Block,
        }
    }

    /// Phase under `config`: overlay tables claim their rows before any inline producer runs.
    pub fn phase_in(self, config: &RenderConfig) -> Phase {
        let table = &config.pipe_table;
        if self == Capture::Table && table.enabled && table.cell == TableCellMode::Overlay {
            return Phase::Claim;
        }
        self.phase()
    }
}
