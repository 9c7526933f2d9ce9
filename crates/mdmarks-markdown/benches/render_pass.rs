use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use mdmarks_core::context::RenderContext;
use mdmarks_core::theme::Theme;
use mdmarks_markdown::config::RenderConfig;
use mdmarks_markdown::config::TableCellMode;
use mdmarks_markdown::parse::parse;
use mdmarks_markdown::pass::MarkdownRenderer;
use mdmarks_markdown::pass::render_pass;

fn sample_markdown(table_rows: usize) -> String {
    let mut s = String::new();
    s.push_str("# Performance\n\n");
    s.push_str("A paragraph with [a link](https://github.com/x) and `code`.\n\n");

    s.push_str("## Task List\n\n");
    s.push_str("- [x] task list item\n");
    s.push_str("- [ ] task list item\n");
    s.push_str("- [-] cancelled item\n\n");

    s.push_str("> [!NOTE]\n> A callout with a [[wiki|page]] link.\n\n");

    s.push_str("## Table\n\n");
    s.push_str("| Name | Value | Notes |\n");
    s.push_str("|:-----|------:|:------|\n");
    for i in 0..table_rows {
        s.push_str(&format!(
            "| row{i} | {i} | see [docs](https://docs.rs/x{i}) |\n"
        ));
    }
    s.push('\n');

    s.push_str("```rs\n");
    s.push_str("fn main() {}\n");
    s.push_str("```\n");
    s
}

fn bench_parse(c: &mut Criterion) {
    let md = sample_markdown(200);
    c.bench_function("render_pass/parse", |b| {
        b.iter(|| {
            let doc = parse(black_box(&md));
            black_box(doc.captures().len());
        })
    });
}

fn bench_pass(c: &mut Criterion) {
    let md = sample_markdown(200);
    let doc = parse(&md);
    for (name, mode) in [
        ("padded", TableCellMode::Padded),
        ("raw", TableCellMode::Raw),
        ("overlay", TableCellMode::Overlay),
    ] {
        let mut config = RenderConfig::default();
        config.pipe_table.cell = mode;
        let mut context = RenderContext::new();
        c.bench_function(&format!("render_pass/pass/{name}"), |b| {
            b.iter(|| {
                let output = render_pass(black_box(&doc), &config, &mut context);
                black_box(output.marks.len());
            })
        });
    }
}

fn bench_lines(c: &mut Criterion) {
    let theme = Theme::default();
    let md = sample_markdown(200);
    let mut renderer = MarkdownRenderer::new(RenderConfig::default());
    c.bench_function("render_pass/parse+pass+lines", |b| {
        b.iter(|| {
            let lines = renderer.lines(black_box(&md), &theme);
            black_box(lines.len());
        })
    });
}

criterion_group!(benches, bench_parse, bench_pass, bench_lines);
criterion_main!(benches);
