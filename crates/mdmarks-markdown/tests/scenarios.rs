use mdmarks_core::context::RenderContext;
use mdmarks_core::mark::Mark;
use mdmarks_core::mark::MarkKind;
use mdmarks_core::node::SyntaxTree;
use mdmarks_core::render::line_to_plain;
use mdmarks_core::theme::Theme;
use mdmarks_markdown::config::CalloutConfig;
use mdmarks_markdown::config::CustomCheckbox;
use mdmarks_markdown::config::RenderConfig;
use mdmarks_markdown::config::TableCellMode;
use mdmarks_markdown::diagnostic::Diagnostic;
use mdmarks_markdown::parse::ParsedDocument;
use mdmarks_markdown::parse::parse;
use mdmarks_markdown::pass::MarkdownRenderer;
use mdmarks_markdown::pass::PassOutput;
use mdmarks_markdown::pass::render_pass;

const TABLE: &str = "\
| Heading 1 | Heading 2 |
| --------- | --------- |
| Item 1    | Item 2    |
";

/// Stock config with single-cell ASCII icons, so rendered widths are easy to state.
fn ascii_config() -> RenderConfig {
    let mut config = RenderConfig::default();
    config.link.hyperlink = "@ ".to_string();
    config.link.image = "! ".to_string();
    config.link.email = "M ".to_string();
    config.link.custom.clear();
    config.link.wiki.icon = "W ".to_string();
    config.bullet.icons = vec!["*".to_string(), "o".to_string()];
    config.checkbox.unchecked.icon = "[ ]".to_string();
    config.checkbox.checked.icon = "[x]".to_string();
    config.quote.icon = ">".to_string();
    for (name, callout) in config.callouts.iter_mut() {
        callout.rendered = format!("! {name}");
    }
    config
}

fn run(source: &str, config: &RenderConfig) -> PassOutput {
    let doc = parse(source);
    let mut context = RenderContext::new();
    render_pass(&doc, config, &mut context)
}

fn plain_lines(source: &str, config: RenderConfig) -> Vec<String> {
    let mut renderer = MarkdownRenderer::new(config);
    renderer
        .lines(source, &Theme::default())
        .iter()
        .map(line_to_plain)
        .collect()
}

fn of_kind(marks: &[Mark], kind: MarkKind) -> Vec<&Mark> {
    marks.iter().filter(|m| m.kind() == kind).collect()
}

#[test]
fn padded_table_gets_full_borders() {
    let output = run(TABLE, &RenderConfig::default());
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let above = of_kind(&output.marks, MarkKind::VirtualLine { above: true });
    assert_eq!(above.len(), 1);
    assert_eq!(above[0].text(), "┌───────────┬───────────┐");
    assert_eq!(above[0].range.start.row, 0);
    assert_eq!(above[0].highlight(), Some("RenderMarkdownTableHead"));

    let below = of_kind(&output.marks, MarkKind::VirtualLine { above: false });
    assert_eq!(below.len(), 1);
    assert_eq!(below[0].text(), "└───────────┴───────────┘");
    assert_eq!(below[0].range.start.row, 2);
}

#[test]
fn padded_table_renders_aligned_rows() {
    let lines = plain_lines(TABLE, RenderConfig::default());
    assert_eq!(
        lines,
        [
            "┌───────────┬───────────┐",
            "│ Heading 1 │ Heading 2 │",
            "├───────────┼───────────┤",
            "│ Item 1    │ Item 2    │",
            "└───────────┴───────────┘",
        ]
    );
}

#[test]
fn delimiter_row_shows_alignment_indicators() {
    let source = "| a | b | c |\n| :-- | :-: | --: |\n| x | y | z |\n";
    let lines = plain_lines(source, RenderConfig::default());
    assert_eq!(lines[2], "├━──┼━─━┼──━┤");
}

#[test]
fn link_icon_widens_padded_column() {
    let source = "\
| Name | Site |
| ---- | ---- |
| a    | [abc](https://x.dev) |
";
    let lines = plain_lines(source, ascii_config());
    assert_eq!(
        lines,
        [
            "┌──────┬───────┐",
            "│ Name │ Site  │",
            "├──────┼───────┤",
            "│ a    │ @ abc │",
            "└──────┴───────┘",
        ]
    );
}

#[test]
fn raw_mode_keeps_pipes_in_place() {
    let source = "\
| Link | Name |
| ---- | ---- |
| [a](https://x.dev) | b |
";
    let mut config = ascii_config();
    config.pipe_table.cell = TableCellMode::Raw;
    let output = run(source, &config);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let pipes: Vec<usize> = output
        .marks
        .iter()
        .filter(|m| m.kind() == MarkKind::Overlay && m.range.start.row == 2)
        .map(|m| m.range.start.col)
        .collect();
    assert_eq!(pipes, [0, 21, 25]);

    let icon = output
        .marks
        .iter()
        .find(|m| m.kind() == MarkKind::Conceal && m.text() == "@ ")
        .expect("link icon");
    assert_eq!((icon.range.start.row, icon.range.start.col), (2, 2));

    let above = of_kind(&output.marks, MarkKind::VirtualLine { above: true });
    assert_eq!(above[0].text(), "┌──────┬──────┐");

    let lines = plain_lines(source, config);
    assert_eq!(lines[3], "│ @ a │ b │");
}

#[test]
fn overlay_mode_replaces_whole_rows() {
    let mut config = RenderConfig::default();
    config.pipe_table.cell = TableCellMode::Overlay;
    let output = run(TABLE, &config);

    let header = output
        .marks
        .iter()
        .find(|m| m.kind() == MarkKind::Overlay && m.range.start.row == 0)
        .expect("header overlay");
    assert!(header.exclusive);
    assert_eq!(header.text(), "│ Heading 1 │ Heading 2 │");
    assert_eq!(header.highlight(), Some("RenderMarkdownTableHead"));

    let lines = plain_lines(TABLE, config);
    assert_eq!(lines[2], "├───────────┼───────────┤");
    assert_eq!(lines[3], "│ Item 1    │ Item 2    │");
}

#[test]
fn normal_style_skips_borders() {
    let mut config = RenderConfig::default();
    config.pipe_table.style = mdmarks_markdown::config::TableStyle::Normal;
    let output = run(TABLE, &config);
    assert!(of_kind(&output.marks, MarkKind::VirtualLine { above: true }).is_empty());
    assert!(of_kind(&output.marks, MarkKind::VirtualLine { above: false }).is_empty());
    assert!(!output.marks.is_empty());
}

#[test]
fn short_rows_are_reported_and_filled() {
    let source = "| a | b |\n| - | - |\n| c |\n";
    let output = run(source, &RenderConfig::default());
    assert_eq!(
        output.diagnostics,
        [Diagnostic::TableColumnMismatch {
            row: 2,
            expected: 2,
            found: 1
        }]
    );
    let lines = plain_lines(source, RenderConfig::default());
    assert_eq!(lines[3], "│ c │   │");
}

#[test]
fn render_is_idempotent() {
    let source = "\
# Title

- item with [link](https://x.dev)
- [x] done

> [!NOTE]
> body

| a | b |
| - | - |
| c | d |
";
    let mut renderer = MarkdownRenderer::new(ascii_config());
    let first = renderer.render(source);
    let second = renderer.render(source);
    assert_eq!(first, second);
    assert_eq!(renderer.context().passes(), 2);
}

#[test]
fn exclusive_marks_never_overlap() {
    let source = "\
## Section

1. first [one](https://a.dev) and [two](https://b.dev)
- [ ] open
- [-] cancelled

```rust
let x = `y`;
```

| [a](u) | `b` |
| --- | --- |
| c | [[wiki|alias]] |
";
    let output = run(source, &ascii_config());
    let exclusive: Vec<&Mark> = output.marks.iter().filter(|m| m.exclusive).collect();
    for (i, a) in exclusive.iter().enumerate() {
        for b in &exclusive[i + 1..] {
            for row in a.range.start.row..=a.range.end.row {
                let (Some((s1, e1)), Some((s2, e2))) =
                    (a.range.cols_on_row(row), b.range.cols_on_row(row))
                else {
                    continue;
                };
                assert!(
                    e1 <= s2 || e2 <= s1,
                    "overlapping exclusive marks: {a:?} and {b:?}"
                );
            }
        }
    }
}

#[test]
fn callout_wins_over_custom_checkbox() {
    let mut config = ascii_config();
    config.checkbox.custom.insert(
        "note".to_string(),
        CustomCheckbox {
            raw: "[!NOTE]".to_string(),
            rendered: "X".to_string(),
            highlight: "RenderMarkdownTodo".to_string(),
        },
    );
    let output = run("- [!NOTE]\n", &config);
    assert!(output.marks.iter().all(|m| m.text() != "X"));
    let callout = output
        .marks
        .iter()
        .find(|m| m.highlight() == Some("RenderMarkdownInfo"))
        .expect("callout mark");
    assert_eq!(callout.kind(), MarkKind::Overlay);
    assert_eq!(callout.text(), "! note ");
}

#[test]
fn callout_colors_its_quote_markers() {
    let mut renderer = MarkdownRenderer::new(ascii_config());
    let output = renderer.render("> [!WARNING]\n> careful\n");
    let markers: Vec<&Mark> = output
        .marks
        .iter()
        .filter(|m| m.kind() == MarkKind::Overlay && m.text() == ">")
        .collect();
    assert_eq!(markers.len(), 2);
    assert!(
        markers
            .iter()
            .all(|m| m.highlight() == Some("RenderMarkdownWarn"))
    );
    assert_eq!(renderer.context().callout_in(0, 1), Some("RenderMarkdownWarn"));
}

#[test]
fn callout_with_title_replaces_first_line() {
    let mut config = ascii_config();
    config.callouts.insert(
        "tip".to_string(),
        CalloutConfig {
            raw: "[!TIP]".to_string(),
            rendered: "T Tip".to_string(),
            highlight: "RenderMarkdownSuccess".to_string(),
        },
    );
    let lines = plain_lines("> [!tip] Read this\n> body\n", config);
    assert_eq!(lines, ["> T Read this", "> body"]);
}

#[test]
fn custom_checkbox_replaces_marker_and_state() {
    let lines = plain_lines("- [-] cancelled\n", ascii_config());
    let rendered = &RenderConfig::default().checkbox.custom["todo"].rendered;
    assert_eq!(lines, [format!("{rendered}cancelled")]);
}

#[test]
fn task_items_use_checkbox_icons_not_bullets() {
    let lines = plain_lines("- [ ] open\n- [x] done\n- plain\n", ascii_config());
    assert_eq!(lines, ["[ ]open", "[x]done", "* plain"]);
}

#[test]
fn wiki_link_shows_alias() {
    let lines = plain_lines("see [[page|Alias]] now\n", ascii_config());
    assert_eq!(lines, ["see W Alias now"]);
}

#[test]
fn inline_link_conceals_destination() {
    let lines = plain_lines("see [docs](https://x.dev) here\n", ascii_config());
    assert_eq!(lines, ["see @ docs here"]);
}

#[test]
fn unknown_capture_is_reported() {
    let source = "~~gone~~\n";
    let mut tree = SyntaxTree::new(source);
    let root = tree.root_id();
    let id = tree.insert(root, "strikethrough", 0..8);
    let doc = ParsedDocument::new(tree, vec![("strikethrough".to_string(), id)]);
    let mut context = RenderContext::new();
    let output = render_pass(&doc, &RenderConfig::default(), &mut context);
    assert!(output.marks.is_empty());
    assert_eq!(
        output.diagnostics,
        [Diagnostic::UnhandledCapture {
            name: "strikethrough".to_string()
        }]
    );
}

#[test]
fn invalid_link_pattern_is_reported_once_per_pass() {
    let mut config = ascii_config();
    config.link.custom.insert(
        "broken".to_string(),
        mdmarks_markdown::config::LinkComponent {
            pattern: "[".to_string(),
            icon: "?".to_string(),
            highlight: None,
        },
    );
    let output = run("[a](https://x.dev) and [b](https://y.dev)\n", &config);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(matches!(
        &output.diagnostics[0],
        Diagnostic::InvalidLinkPattern { pattern, .. } if pattern == "["
    ));
}

#[test]
fn disabled_tables_produce_no_marks() {
    let mut config = RenderConfig::default();
    config.pipe_table.enabled = false;
    assert!(run(TABLE, &config).marks.is_empty());
}

#[test]
fn overlay_table_draws_link_cells_itself() {
    let source = "\
| Name | Site |
| ---- | ---- |
| a    | [abc](https://x.dev) |
";
    let mut config = ascii_config();
    config.pipe_table.cell = TableCellMode::Overlay;
    let output = run(source, &config);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let row: Vec<&Mark> = output
        .marks
        .iter()
        .filter(|m| m.range.start.row == 2)
        .filter(|m| !matches!(m.kind(), MarkKind::VirtualLine { .. }))
        .collect();
    assert_eq!(row.len(), 1, "{row:?}");
    assert_eq!(row[0].kind(), MarkKind::Overlay);
    assert!(row[0].exclusive);
    assert_eq!(row[0].text().trim_end(), "│ a    │ @ abc │");

    let lines = plain_lines(source, config);
    assert_eq!(lines[0], "┌──────┬───────┐");
    assert_eq!(lines[1], "│ Name │ Site  │");
    assert_eq!(lines[3].trim_end(), "│ a    │ @ abc │");
    assert_eq!(lines[4], "└──────┴───────┘");
}

#[test]
fn table_without_outer_pipes_keeps_joints_aligned() {
    let lines = plain_lines("a | b\n--|--\nccc | d\n", RenderConfig::default());
    assert_eq!(
        lines,
        ["────┬──", "a   │ b", "────┼──", "ccc │ d", "────┴──"]
    );
}

#[test]
fn raw_single_dash_delimiter_keeps_its_width() {
    let mut config = RenderConfig::default();
    config.pipe_table.cell = TableCellMode::Raw;
    let lines = plain_lines("| a | b |\n|-|-|\n| c | d |\n", config);
    assert_eq!(lines[0], "┌─┬─┐");
    assert_eq!(lines[2], "├─┼─┤");
    assert_eq!(lines[4], "└─┴─┘");
}

#[test]
fn wide_glyphs_count_as_two_cells() {
    let source = "\
| Key | Value |
| --- | ----- |
| x   | 日本語日本 |
";
    let lines = plain_lines(source, RenderConfig::default());
    assert_eq!(
        lines,
        [
            "┌─────┬────────────┐",
            "│ Key │ Value      │",
            "├─────┼────────────┤",
            "│ x   │ 日本語日本 │",
            "└─────┴────────────┘",
        ]
    );
}

#[test]
fn header_only_table_still_gets_borders() {
    let lines = plain_lines("| a | b |\n| - | - |\n", RenderConfig::default());
    assert_eq!(lines, ["┌───┬───┐", "│ a │ b │", "├───┼───┤", "└───┴───┘"]);
}

#[test]
fn extra_cells_are_hidden() {
    let source = "| a | b |\n| - | - |\n| c | d | e |\n";
    let output = run(source, &RenderConfig::default());
    assert_eq!(
        output.diagnostics,
        [Diagnostic::TableColumnMismatch {
            row: 2,
            expected: 2,
            found: 3
        }]
    );
    let lines = plain_lines(source, RenderConfig::default());
    assert_eq!(lines[3], "│ c │ d │");
}
