use divan::{Bencher, black_box};
use tagsmith::{Markup, OutputConvention, RenderOptions};

fn main() {
    divan::main();
}

/// A table with `rows` rows of five cells each.
fn build_table(rows: usize, options: RenderOptions) -> Markup {
    let mut table = Markup::with_options("table", options);
    let mut body = table.root_mut().add_class("data").tbody();
    for row in 0..rows {
        let mut tr = body.tr().set("data-row", row);
        for col in 0..5 {
            tr = tr
                .td()
                .add_class("cell")
                .text(format!("r{row} c{col} <&>"))
                .parent()
                .unwrap();
        }
        body = tr.parent().unwrap();
    }
    table
}

#[divan::bench(args = [10, 100, 1000])]
fn build(bencher: Bencher, rows: usize) {
    bencher.bench_local(|| black_box(build_table(black_box(rows), RenderOptions::default())));
}

#[divan::bench(args = [10, 100, 1000])]
fn render_plain(bencher: Bencher, rows: usize) {
    let table = build_table(rows, RenderOptions::default());
    bencher.bench_local(|| {
        let html = black_box(&table).to_html();
        black_box(html);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn render_escaped(bencher: Bencher, rows: usize) {
    let options = RenderOptions::new()
        .with_avoid_xss(true)
        .with_convention(OutputConvention::Html5);
    let table = build_table(rows, options);
    bencher.bench_local(|| {
        let html = black_box(&table).to_html();
        black_box(html);
    });
}
