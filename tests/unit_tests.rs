// Unit tests for the TalentAI scoring heuristics

use talent_ai::core::{
    assess_attrition, calculate_match_score, calculate_social_score, count_year_ranges,
    estimate_experience, extract_skills, select_highlights, Analyzer,
};
use talent_ai::models::{ProgressionRate, RetentionPrediction, ScoringRules};
use uuid::Uuid;

fn reqs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_match_score_no_requirements_is_base() {
    let rules = ScoringRules::default();
    assert_eq!(calculate_match_score("anything at all", &[], &rules), 50);
}

#[test]
fn test_match_score_counts_each_requirement_once() {
    let rules = ScoringRules::default();
    let score = calculate_match_score(
        "Python python PYTHON and SQL",
        &reqs(&["Python", "SQL", "Go"]),
        &rules,
    );
    assert_eq!(score, 70);
}

#[test]
fn test_match_score_caps_at_95() {
    let rules = ScoringRules::default();
    let requirements = reqs(&["a", "b", "c", "d", "e", "f", "g"]);
    let score = calculate_match_score("abcdefg", &requirements, &rules);
    assert_eq!(score, 95);
}

#[test]
fn test_match_score_is_monotonic_in_matches() {
    let rules = ScoringRules::default();
    let requirements = reqs(&["Rust", "Go", "SQL", "AWS"]);
    let resumes = ["", "Rust", "Rust Go", "Rust Go SQL", "Rust Go SQL AWS"];

    let scores: Vec<u8> = resumes
        .iter()
        .map(|r| calculate_match_score(r, &requirements, &rules))
        .collect();

    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    assert!(scores.iter().all(|s| (50..=95).contains(s)));
}

#[test]
fn test_match_score_substring_false_positive() {
    // "Java" is contained in "JavaScript"
    let rules = ScoringRules::default();
    assert_eq!(calculate_match_score("JavaScript", &reqs(&["Java"]), &rules), 60);
}

#[test]
fn test_match_score_custom_rules() {
    let rules = ScoringRules {
        base_match_score: 20,
        requirement_bonus: 30,
        max_match_score: 100,
        ..ScoringRules::default()
    };
    assert_eq!(calculate_match_score("rust go sql", &reqs(&["Rust", "Go", "SQL"]), &rules), 100);
}

#[test]
fn test_social_score_examples() {
    assert_eq!(calculate_social_score(0, 0, 0), 0.0);
    assert!((calculate_social_score(10, 20, 100) - 40.0).abs() < 1e-9);
    assert_eq!(calculate_social_score(100, 0, 0), 100.0);
}

#[test]
fn test_social_score_never_exceeds_100() {
    for repos in [0, 1, 25, 60, 1000] {
        for stars in [0, 50, 99] {
            for contributions in [0, 250, 499] {
                let score = calculate_social_score(repos, stars, contributions);
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }
}

#[test]
fn test_experience_first_match_wins() {
    assert_eq!(estimate_experience("10 years ago I had 3 years of Go", 2), 10);
    assert_eq!(estimate_experience("7+ Years of leadership", 2), 7);
    assert_eq!(estimate_experience("1 year", 2), 1);
}

#[test]
fn test_experience_default_without_match() {
    assert_eq!(estimate_experience("Fresh graduate", 2), 2);
    assert_eq!(estimate_experience("", 4), 4);
}

#[test]
fn test_skills_follow_vocabulary_order() {
    let rules = ScoringRules::default();
    let skills = extract_skills("SQL, Docker, Python and react", &rules.skill_vocabulary);
    assert_eq!(skills, vec!["React", "Python", "SQL", "Docker"]);
}

#[test]
fn test_skills_substring_false_positive() {
    let rules = ScoringRules::default();
    let skills = extract_skills("JavaScript only", &rules.skill_vocabulary);
    assert!(skills.contains(&"JavaScript".to_string()));
    assert!(skills.contains(&"Java".to_string()));
}

#[test]
fn test_highlights_keep_long_lines_only() {
    let text = "short\nThis line is definitely long enough\n   \nAnother sufficiently long line here";
    let highlights = select_highlights(text, 20, 5);
    assert_eq!(
        highlights,
        vec![
            "This line is definitely long enough".to_string(),
            "Another sufficiently long line here".to_string(),
        ]
    );
}

#[test]
fn test_highlights_limit() {
    let text = (0..10)
        .map(|i| format!("Highlight number {} with plenty of text", i))
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(select_highlights(&text, 20, 5).len(), 5);
}

#[test]
fn test_attrition_no_ranges() {
    let a = assess_attrition("No dates anywhere");
    assert_eq!(a.risk_score, 0);
    assert_eq!(a.average_tenure_months, 24);
    assert_eq!(a.career_progression_rate, ProgressionRate::Moderate);
    assert_eq!(a.retention_prediction, RetentionPrediction::High);
    assert_eq!(a.risk_factors, vec!["Stable career progression"]);
}

#[test]
fn test_attrition_four_ranges() {
    let text = "A 2010-2012\nB 2012 - 2014\nC 2014-2016\nD 2016-2020";
    assert_eq!(count_year_ranges(text), 4);

    let a = assess_attrition(text);
    assert_eq!(a.risk_score, 60);
    assert!((a.job_hopping_frequency - 0.8).abs() < 1e-9);
    assert_eq!(a.average_tenure_months, 15);
    assert_eq!(a.career_progression_rate, ProgressionRate::Fast);
    assert_eq!(a.retention_prediction, RetentionPrediction::Low);
    assert_eq!(a.risk_factors.len(), 2);
}

#[test]
fn test_attrition_risk_capped() {
    let text = (0..10)
        .map(|i| format!("Job {} {}-{}", i, 2000 + i, 2001 + i))
        .collect::<Vec<_>>()
        .join("\n");
    let a = assess_attrition(&text);
    assert_eq!(a.risk_score, 85);
    assert_eq!(a.average_tenure_months, 6);
}

#[test]
fn test_attrition_medium_band() {
    // 2 ranges -> 30, first value in the medium band
    let a = assess_attrition("2018-2020 and 2020-2022");
    assert_eq!(a.risk_score, 30);
    assert_eq!(a.retention_prediction, RetentionPrediction::Medium);
    assert_eq!(a.career_progression_rate, ProgressionRate::Moderate);
}

#[test]
fn test_analyzer_is_deterministic() {
    let analyzer = Analyzer::with_default_rules();
    let id = Uuid::new_v4();
    let resume = "Senior engineer, 8 years of Rust and PostgreSQL\nAcme 2015-2019\nGlobex 2019-2024";
    let requirements = reqs(&["Rust", "PostgreSQL", "Kafka"]);

    let first = analyzer.analyze_resume(id, resume, &requirements);
    let second = analyzer.analyze_resume(id, resume, &requirements);

    assert_eq!(first.skills_extracted, second.skills_extracted);
    assert_eq!(first.match_score, second.match_score);
    assert_eq!(first.key_highlights, second.key_highlights);
    assert_eq!(first.experience_years, 8);
    assert_eq!(first.match_score, 70);
    assert_eq!(first.languages_detected, vec!["English"]);
    assert_eq!(first.original_language, "en");

    let risk = analyzer.assess_attrition(id, resume);
    assert_eq!(risk.application_id, id);
    assert_eq!(risk.risk_score, 30);
}
