use std::collections::HashMap;

use ratatui::style::Modifier;
use ratatui::style::Style;

/// Resolves highlight names carried by marks into terminal styles.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    styles: HashMap<String, Style>,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        let mut theme = Self {
            text_primary: Style::default(),
            styles: HashMap::new(),
        };
        let headings = [
            Style::default().blue(),
            Style::default().cyan(),
            Style::default().green(),
            Style::default().yellow(),
            Style::default().magenta(),
            Style::default().red(),
        ];
        for (i, style) in headings.into_iter().enumerate() {
            let level = i + 1;
            theme.set(format!("RenderMarkdownH{level}"), style.add_modifier(Modifier::BOLD));
            theme.set(format!("RenderMarkdownH{level}Bg"), Style::default());
        }
        theme.set("RenderMarkdownCode", Style::default().on_black());
        theme.set("RenderMarkdownCodeInline", Style::default().cyan());
        theme.set("RenderMarkdownBullet", Style::default().cyan());
        theme.set("RenderMarkdownDash", Style::default().dark_gray());
        theme.set("RenderMarkdownQuote", Style::default().dark_gray());
        theme.set("RenderMarkdownLink", Style::default().cyan().underlined());
        theme.set("RenderMarkdownWikiLink", Style::default().cyan());
        theme.set("RenderMarkdownUnchecked", Style::default().dark_gray());
        theme.set("RenderMarkdownChecked", Style::default().green());
        theme.set("RenderMarkdownTodo", Style::default().yellow());
        theme.set("RenderMarkdownInfo", Style::default().blue());
        theme.set("RenderMarkdownSuccess", Style::default().green());
        theme.set("RenderMarkdownHint", Style::default().magenta());
        theme.set("RenderMarkdownWarn", Style::default().yellow());
        theme.set("RenderMarkdownError", Style::default().red());
        theme.set(
            "RenderMarkdownTableHead",
            Style::default().dark_gray().add_modifier(Modifier::BOLD),
        );
        theme.set("RenderMarkdownTableRow", Style::default().dark_gray());
        theme.set("RenderMarkdownTableFill", Style::default());
        theme
    }
}

impl Theme {
    pub fn set(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), style);
    }

    /// Style for `name`; unknown names fall back to an unstyled look.
    pub fn style(&self, name: Option<&str>) -> Style {
        name.and_then(|n| self.styles.get(n))
            .copied()
            .unwrap_or_default()
    }
}
