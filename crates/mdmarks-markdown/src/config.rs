//! Render options, one struct per node category.
//!
//! Every struct has a `Default` carrying the stock icons and highlight names and deserializes with
//! `#[serde(default)]`, so a host only spells out the fields it overrides.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub heading: HeadingConfig,
    pub code: CodeConfig,
    pub dash: DashConfig,
    pub bullet: BulletConfig,
    pub checkbox: CheckboxConfig,
    pub quote: QuoteConfig,
    /// Callouts keyed by name; `raw` is matched case-insensitively against shortcut links.
    pub callouts: BTreeMap<String, CalloutConfig>,
    pub link: LinkConfig,
    pub code_inline: CodeInlineConfig,
    pub pipe_table: PipeTableConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            code: CodeConfig::default(),
            dash: DashConfig::default(),
            bullet: BulletConfig::default(),
            checkbox: CheckboxConfig::default(),
            quote: QuoteConfig::default(),
            callouts: Self::default_callouts(),
            link: LinkConfig::default(),
            code_inline: CodeInlineConfig::default(),
            pipe_table: PipeTableConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Stock callouts: GitHub alerts plus the common Obsidian ones.
    pub fn default_callouts() -> BTreeMap<String, CalloutConfig> {
        let entries = [
            ("note", "[!NOTE]", "󰋽 Note", "RenderMarkdownInfo"),
            ("tip", "[!TIP]", "󰌶 Tip", "RenderMarkdownSuccess"),
            ("important", "[!IMPORTANT]", "󰅾 Important", "RenderMarkdownHint"),
            ("warning", "[!WARNING]", "󰀪 Warning", "RenderMarkdownWarn"),
            ("caution", "[!CAUTION]", "󰳦 Caution", "RenderMarkdownError"),
            ("abstract", "[!ABSTRACT]", "󰨸 Abstract", "RenderMarkdownInfo"),
            ("summary", "[!SUMMARY]", "󰨸 Summary", "RenderMarkdownInfo"),
            ("info", "[!INFO]", "󰋽 Info", "RenderMarkdownInfo"),
            ("todo", "[!TODO]", "󰗡 Todo", "RenderMarkdownInfo"),
            ("success", "[!SUCCESS]", "󰄬 Success", "RenderMarkdownSuccess"),
            ("question", "[!QUESTION]", "󰘥 Question", "RenderMarkdownWarn"),
            ("failure", "[!FAILURE]", "󰅖 Failure", "RenderMarkdownError"),
            ("danger", "[!DANGER]", "󱐌 Danger", "RenderMarkdownError"),
            ("bug", "[!BUG]", "󰨰 Bug", "RenderMarkdownError"),
            ("example", "[!EXAMPLE]", "󰉹 Example", "RenderMarkdownHint"),
            ("quote", "[!QUOTE]", "󱆨 Quote", "RenderMarkdownQuote"),
        ];
        entries
            .into_iter()
            .map(|(name, raw, rendered, highlight)| {
                (
                    name.to_string(),
                    CalloutConfig {
                        raw: raw.to_string(),
                        rendered: rendered.to_string(),
                        highlight: highlight.to_string(),
                    },
                )
            })
            .collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    pub enabled: bool,
    /// Icon per level; deeper levels reuse the last entry.
    pub icons: Vec<String>,
    pub highlights: Vec<String>,
    pub backgrounds: Vec<String>,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icons: strings(&["󰲡 ", "󰲣 ", "󰲥 ", "󰲧 ", "󰲩 ", "󰲫 "]),
            highlights: (1..=6).map(|l| format!("RenderMarkdownH{l}")).collect(),
            backgrounds: (1..=6).map(|l| format!("RenderMarkdownH{l}Bg")).collect(),
        }
    }
}

impl HeadingConfig {
    pub fn icon(&self, level: usize) -> &str {
        clamped(&self.icons, level)
    }

    pub fn highlight(&self, level: usize) -> &str {
        clamped(&self.highlights, level)
    }

    pub fn background(&self, level: usize) -> &str {
        clamped(&self.backgrounds, level)
    }
}

/// Entry for 1-based `level`, clamped to the list bounds.
fn clamped(items: &[String], level: usize) -> &str {
    let idx = level.saturating_sub(1).min(items.len().saturating_sub(1));
    items.get(idx).map(String::as_str).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub enabled: bool,
    pub highlight: String,
    /// Border drawn over an opening fence without a language.
    pub above: String,
    /// Border drawn over the closing fence.
    pub below: String,
    pub min_width: usize,
    pub default_icon: String,
    pub language_icons: BTreeMap<String, String>,
}

impl Default for CodeConfig {
    fn default() -> Self {
        let language_icons = [
            ("bash", "󱆃 "),
            ("c", "󰙱 "),
            ("cpp", "󰙲 "),
            ("go", "󰟓 "),
            ("javascript", "󰌞 "),
            ("js", "󰌞 "),
            ("json", "󰘦 "),
            ("lua", "󰢱 "),
            ("markdown", "󰍔 "),
            ("python", "󰌠 "),
            ("rust", "󱘗 "),
            ("sh", "󱆃 "),
            ("typescript", "󰛦 "),
            ("ts", "󰛦 "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            enabled: true,
            highlight: "RenderMarkdownCode".to_string(),
            above: "▄".to_string(),
            below: "▀".to_string(),
            min_width: 0,
            default_icon: "󰈮 ".to_string(),
            language_icons,
        }
    }
}

impl CodeConfig {
    pub fn icon(&self, language: &str) -> &str {
        self.language_icons
            .get(&language.to_ascii_lowercase())
            .unwrap_or(&self.default_icon)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub enabled: bool,
    pub icon: String,
    pub width: usize,
    pub highlight: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icon: "─".to_string(),
            width: 80,
            highlight: "RenderMarkdownDash".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub enabled: bool,
    /// Bullet per nesting level, cycling when nesting goes deeper.
    pub icons: Vec<String>,
    pub highlight: String,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icons: strings(&["●", "○", "◆", "◇"]),
            highlight: "RenderMarkdownBullet".to_string(),
        }
    }
}

impl BulletConfig {
    /// Bullet for 1-based nesting `level`.
    pub fn icon(&self, level: usize) -> Option<&str> {
        if self.icons.is_empty() {
            return None;
        }
        let idx = level.saturating_sub(1) % self.icons.len();
        self.icons.get(idx).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxComponent {
    pub icon: String,
    pub highlight: String,
}

impl Default for CheckboxComponent {
    fn default() -> Self {
        Self {
            icon: "󰄱 ".to_string(),
            highlight: "RenderMarkdownUnchecked".to_string(),
        }
    }
}

/// A user-defined checkbox state written as a shortcut link, e.g. `- [-] cancelled`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomCheckbox {
    pub raw: String,
    pub rendered: String,
    pub highlight: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckboxConfig {
    pub enabled: bool,
    pub unchecked: CheckboxComponent,
    pub checked: CheckboxComponent,
    pub custom: BTreeMap<String, CustomCheckbox>,
}

impl Default for CheckboxConfig {
    fn default() -> Self {
        let mut custom = BTreeMap::new();
        custom.insert(
            "todo".to_string(),
            CustomCheckbox {
                raw: "[-]".to_string(),
                rendered: "󰥔 ".to_string(),
                highlight: "RenderMarkdownTodo".to_string(),
            },
        );
        Self {
            enabled: true,
            unchecked: CheckboxComponent::default(),
            checked: CheckboxComponent {
                icon: "󰱒 ".to_string(),
                highlight: "RenderMarkdownChecked".to_string(),
            },
            custom,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub enabled: bool,
    pub icon: String,
    pub highlight: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            icon: "▋".to_string(),
            highlight: "RenderMarkdownQuote".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutConfig {
    pub raw: String,
    pub rendered: String,
    pub highlight: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkComponent {
    /// Regular expression matched against the link destination.
    pub pattern: String,
    pub icon: String,
    pub highlight: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiLinkConfig {
    pub icon: String,
    pub highlight: String,
}

impl Default for WikiLinkConfig {
    fn default() -> Self {
        Self {
            icon: "󱗖 ".to_string(),
            highlight: "RenderMarkdownWikiLink".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub enabled: bool,
    pub highlight: String,
    pub hyperlink: String,
    pub image: String,
    pub email: String,
    pub wiki: WikiLinkConfig,
    pub custom: BTreeMap<String, LinkComponent>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        let custom = [
            ("web", "^http", "󰖟 "),
            ("discord", r"discord\.com", "󰙯 "),
            ("github", r"github\.com", "󰊤 "),
            ("gitlab", r"gitlab\.com", "󰮠 "),
            ("reddit", r"reddit\.com", "󰑍 "),
            ("stackoverflow", r"stackoverflow\.com", "󰓌 "),
            ("wikipedia", r"wikipedia\.org", "󰖬 "),
            ("youtube", r"youtube\.com", "󰗃 "),
        ]
        .into_iter()
        .map(|(name, pattern, icon)| {
            (
                name.to_string(),
                LinkComponent {
                    pattern: pattern.to_string(),
                    icon: icon.to_string(),
                    highlight: None,
                },
            )
        })
        .collect();
        Self {
            enabled: true,
            highlight: "RenderMarkdownLink".to_string(),
            hyperlink: "󰌹 ".to_string(),
            image: "󰥶 ".to_string(),
            email: "󰀓 ".to_string(),
            wiki: WikiLinkConfig::default(),
            custom,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeInlineConfig {
    pub enabled: bool,
    pub highlight: String,
}

impl Default for CodeInlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            highlight: "RenderMarkdownCodeInline".to_string(),
        }
    }
}

/// How table cells are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableCellMode {
    /// Pipes redrawn and cells padded so every column lines up.
    #[default]
    Padded,
    /// Pipes redrawn in place; cells keep their source width.
    Raw,
    /// Each row replaced by one overlay with trimmed, aligned cells.
    Overlay,
}

/// Which borders a table gets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Pipes, delimiter row and `above`/`below` borders.
    #[default]
    Full,
    /// Pipes and delimiter row only.
    Normal,
    /// Nothing drawn.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeTableConfig {
    pub enabled: bool,
    pub cell: TableCellMode,
    pub style: TableStyle,
    /// `┌ ┬ ┐ ├ ┼ ┤ └ ┴ ┘ │ ─`
    pub border: [char; 11],
    pub alignment_indicator: char,
    pub head: String,
    pub row: String,
    pub filler: String,
}

impl Default for PipeTableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cell: TableCellMode::Padded,
            style: TableStyle::Full,
            border: ['┌', '┬', '┐', '├', '┼', '┤', '└', '┴', '┘', '│', '─'],
            alignment_indicator: '━',
            head: "RenderMarkdownTableHead".to_string(),
            row: "RenderMarkdownTableRow".to_string(),
            filler: "RenderMarkdownTableFill".to_string(),
        }
    }
}
