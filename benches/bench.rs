// Criterion benchmarks for Persona Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use persona_match::core::{collect_keywords, parse_age_range, MatchEngine};
use persona_match::models::{Contact, Persona, RemoteMatch};
use serde_json::{json, Value};

fn create_persona() -> Persona {
    Persona {
        id: "persona-1".to_string(),
        name: "Fitness-Focused Professional".to_string(),
        age_range: Some("25-34".to_string()),
        demographics: json!({"industry": "Fitness", "location": "urban"}),
        psychographics: json!({"values": ["health", "discipline", "growth"]}),
        goals: json!(["fitness", "community", "productivity"]),
        pain_points: json!(["burnout", "time pressure"]),
        preferred_channels: json!(["email", "sms"]),
    }
}

fn create_contact(id: usize) -> Contact {
    let interests = match id % 4 {
        0 => json!(["fitness", "travel"]),
        1 => json!(["cooking", "community"]),
        2 => json!({"primary": "productivity", "secondary": ["reading"]}),
        _ => Value::Null,
    };

    Contact {
        id: id.to_string(),
        first_name: format!("Contact {}", id),
        last_name: None,
        email: format!("contact{}@example.com", id),
        age_range: match id % 3 {
            0 => Some("25-34".to_string()),
            1 => Some("35-44".to_string()),
            _ => None,
        },
        interests,
        demographics: json!({"industry": if id % 5 == 0 { "Fitness" } else { "Retail" }}),
        behavior_data: Value::Null,
        notes: if id % 7 == 0 {
            Some("mentioned burnout during onboarding".to_string())
        } else {
            None
        },
        created_at: None,
    }
}

fn bench_parse_age_range(c: &mut Criterion) {
    c.bench_function("parse_age_range", |b| {
        b.iter(|| {
            parse_age_range(black_box(Some("25-34")));
            parse_age_range(black_box(Some("65+")));
            parse_age_range(black_box(Some("Gen Z")));
        });
    });
}

fn bench_collect_keywords(c: &mut Criterion) {
    let blob = json!({
        "values": ["health", "discipline", "growth"],
        "habits": {"morning": "gym, meditation", "evening": ["reading"]},
        "summary": "busy urban professional; values efficiency",
    });

    c.bench_function("collect_keywords_nested", |b| {
        b.iter(|| collect_keywords(black_box(&blob)));
    });
}

fn bench_scoring(c: &mut Criterion) {
    let engine = MatchEngine::with_default_weights();
    let persona = create_persona();

    let mut group = c.benchmark_group("scoring");

    for contact_count in [10, 100, 1000].iter() {
        let contacts: Vec<Contact> = (0..*contact_count).map(create_contact).collect();

        group.bench_with_input(
            BenchmarkId::new("score_contacts", contact_count),
            contact_count,
            |b, _| {
                b.iter(|| engine.score_contacts(black_box(&persona), black_box(&contacts)));
            },
        );
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let engine = MatchEngine::with_default_weights();
    let persona = create_persona();
    let contacts: Vec<Contact> = (0..500).map(create_contact).collect();
    let local = engine.score_contacts(&persona, &contacts);

    let remote: Vec<RemoteMatch> = contacts
        .iter()
        .step_by(2)
        .map(|contact| RemoteMatch {
            contact_id: contact.id.clone(),
            match_score: Some(80.0),
            reasons: json!(["AI: strong fit"]),
        })
        .collect();

    c.bench_function("merge_500_contacts", |b| {
        b.iter(|| {
            engine.merge(
                black_box(&remote),
                black_box(local.clone()),
                black_box(&contacts),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_parse_age_range,
    bench_collect_keywords,
    bench_scoring,
    bench_merge
);

criterion_main!(benches);
