use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use texmml::context::TexContext;
use texmml::macros::MacroDefinition;
use texmml::types::TagMode;
use texmml::{Document, Settings, parse};

const CASES: [(&str, &str, bool); 8] = [
    ("Scripts", r"x_{i,j}^{2n} + y'' - \sum_{k=1}^{\infty} a_k^2", false),
    ("Fractions", r"\frac{1}{1+\frac{1}{x}} = {a \over b} + \binom{n}{k}", false),
    ("SqrtRoot", r"\sqrt{x} + \sqrt[3]{x^2} + \root\leftroot{2} n \of{y}", false),
    ("Delimiters", r"\left( \frac{a}{b} \middle| c \right) \Big[ x \Big]", false),
    (
        "Matrix",
        r"\begin{pmatrix} a & b & c \\ d & e & f \\ g & h & i \end{pmatrix}",
        true,
    ),
    (
        "Aligned",
        r"\begin{aligned} f(x) &= \sin^2 x + \cos^2 x \\ &= 1 \end{aligned}",
        true,
    ),
    ("Macros", r"\RR \to \abs{\vec v} \pmod{p}", false),
    ("Fonts", r"\mathbf{A} \mathbb{R} \mathcal{L} \boldsymbol{\alpha} \text{ for all } n", false),
];

struct PreparedCase {
    name: &'static str,
    tex: Arc<str>,
    settings: Arc<Settings>,
}

fn build_settings(display_mode: bool) -> Settings {
    Settings::builder()
        .display_mode(display_mode)
        .tags(TagMode::Ams)
        .macros(vec![
            ("RR".to_owned(), MacroDefinition::new(r"\mathbb{R}", 0)),
            ("abs".to_owned(), MacroDefinition::new(r"\left|#1\right|", 1)),
        ])
        .build()
}

fn prepare_cases() -> Vec<PreparedCase> {
    CASES
        .iter()
        .map(|&(name, tex, display_mode)| PreparedCase {
            name,
            tex: Arc::from(tex),
            settings: Arc::new(build_settings(display_mode)),
        })
        .collect()
}

fn bench_parsing(c: &mut Criterion) {
    let ctx = Arc::new(TexContext::default());

    let mut group = c.benchmark_group("texmml_parse");
    for PreparedCase {
        name,
        tex,
        settings,
    } in prepare_cases()
    {
        let ctx = Arc::clone(&ctx);

        // Ensure parsing succeeds once before measuring performance.
        let mut doc = Document::new(settings.as_ref().clone());
        parse(ctx.as_ref(), &mut doc, tex.as_ref()).expect("parsing failed while priming benchmark");

        group.bench_function(name, move |b| {
            b.iter(|| {
                let mut doc = Document::new(settings.as_ref().clone());
                let tree = parse(ctx.as_ref(), &mut doc, tex.as_ref())
                    .expect("parsing failed during benchmark");
                black_box(tree);
            });
        });
    }

    group.finish();
}

fn bench_context(c: &mut Criterion) {
    c.bench_function("texmml_context", |b| {
        b.iter(|| black_box(TexContext::default()));
    });
}

criterion_group!(benches, bench_parsing, bench_context);
criterion_main!(benches);
