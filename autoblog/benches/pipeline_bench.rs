//! Benchmarks for the deterministic text analysis run on every post.

use autoblog::models::SeoRequirements;
use autoblog::utils::{extract_headings, scan_placeholders, seo_score, truncate_meta_description};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn article(sections: usize) -> String {
    let body = "AI helps clinicians in healthcare settings every day, from imaging to scheduling. ";
    let mut out = String::from("# AI in Healthcare\n\n");
    for i in 0..sections {
        out.push_str(&format!("## Section {i}\n\n{}\n\n", body.repeat(12)));
        if i % 3 == 0 {
            out.push_str("Adoption reached [PLACEHOLDER]a statistic[PLACEHOLDER].\n\n");
        }
    }
    out
}

fn text_analysis_benchmark(c: &mut Criterion) {
    let content = article(20);
    let seo = SeoRequirements::new().with_keywords(["AI", "healthcare", "clinicians"]);

    c.bench_function("seo_score", |b| {
        b.iter(|| seo_score(black_box(&content), black_box(&seo)));
    });
    c.bench_function("extract_headings", |b| {
        b.iter(|| extract_headings(black_box(&content)));
    });
    c.bench_function("scan_placeholders", |b| {
        b.iter(|| scan_placeholders(black_box(&content), "[PLACEHOLDER]", "[PLACEHOLDER]"));
    });
    c.bench_function("truncate_meta_description", |b| {
        b.iter(|| truncate_meta_description(black_box(&content), 160));
    });
}

criterion_group!(benches, text_analysis_benchmark);
criterion_main!(benches);
