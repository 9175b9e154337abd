// Criterion benchmarks for the TalentAI scoring heuristics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use talent_ai::core::{assess_attrition, calculate_match_score, Analyzer};
use talent_ai::models::ScoringRules;
use uuid::Uuid;

const EMPLOYERS: &[&str] = &["Acme", "Globex", "Initech", "Umbrella", "Hooli", "Stark"];

/// Resume with `roles` employment entries and a few long bullet lines each
fn create_resume(roles: usize) -> String {
    let mut lines = vec![
        "Jordan Smith".to_string(),
        "Software engineer with 9+ years across Python, React, AWS and Kubernetes".to_string(),
    ];

    for i in 0..roles {
        let start = 2000 + i * 2;
        lines.push(format!("{} {}-{}", EMPLOYERS[i % EMPLOYERS.len()], start, start + 2));
        lines.push(format!("Led a team of {} building REST and GraphQL APIs in Docker", 3 + i));
        lines.push("Introduced Agile ceremonies and cut release time in half".to_string());
    }

    lines.join("\n")
}

fn create_requirements(count: usize) -> Vec<String> {
    ["Python", "React", "AWS", "Kubernetes", "Terraform", "Go", "SQL", "Kafka"]
        .iter()
        .cycle()
        .take(count)
        .map(|s| s.to_string())
        .collect()
}

fn bench_match_score(c: &mut Criterion) {
    let rules = ScoringRules::default();
    let resume = create_resume(5);
    let requirements = create_requirements(8);

    c.bench_function("match_score_8_requirements", |b| {
        b.iter(|| calculate_match_score(black_box(&resume), black_box(&requirements), &rules));
    });
}

fn bench_attrition(c: &mut Criterion) {
    let resume = create_resume(10);

    c.bench_function("attrition_10_roles", |b| {
        b.iter(|| assess_attrition(black_box(&resume)));
    });
}

fn bench_analyze_resume(c: &mut Criterion) {
    let analyzer = Analyzer::with_default_rules();
    let requirements = create_requirements(6);
    let id = Uuid::new_v4();

    let mut group = c.benchmark_group("analyze_resume");

    for roles in [1, 5, 20, 100].iter() {
        let resume = create_resume(*roles);

        group.bench_with_input(BenchmarkId::new("roles", roles), roles, |b, _| {
            b.iter(|| {
                let analysis = analyzer.analyze_resume(id, black_box(&resume), black_box(&requirements));
                let risk = analyzer.assess_attrition(id, black_box(&resume));
                black_box((analysis, risk))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match_score, bench_attrition, bench_analyze_resume);

criterion_main!(benches);
