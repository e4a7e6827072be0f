use criterion::{criterion_group, criterion_main, Criterion};
use mdl_core::parse;

fn payload(n: usize) -> String {
    let entries: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#""{i}": {{"authors": ["Author {i}", "Coauthor"], "title": "Paper {i}", "date_published": "2017", "published_in": "Venue", "url": "https://example.org/{i}", "recommendation_id": {}}}"#,
                n - i
            )
        })
        .collect();
    format!(r#"{{"recommendations": {{{}}}}}"#, entries.join(","))
}

fn bench_parse(c: &mut Criterion) {
    let text = payload(200);
    c.bench_function("parse_200_recommendations", |b| b.iter(|| parse(&text)));
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
