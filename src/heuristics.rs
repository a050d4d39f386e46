use crate::models::KeyPoint;
use once_cell::sync::Lazy;

/// Ordered keyword table for category guessing. First match wins, so
/// History must come before Science: "revolution" contains "evolution"
/// and would otherwise be filed under Science.
static CATEGORY_KEYWORDS: Lazy<Vec<(&'static str, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        ("Mathematics", vec!["math", "algebra", "equation"]),
        ("History", vec!["history", "war", "revolution"]),
        ("Science", vec!["biology", "cell", "evolution"]),
        ("Business", vec!["business", "market", "economy"]),
        ("Psychology", vec!["psychology", "cognitive"]),
    ]
});

/// Guess an academic category from keyword occurrences in the text.
/// Total and deterministic; unmatched text falls back to "General".
pub fn classify_category(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS.iter() {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return category;
        }
    }
    "General"
}

/// Naive key-point extraction: split into sentences, keep the first
/// `max_points` in narrative order. A best-effort fallback when the
/// remote analysis is unavailable, not salience ranking.
pub fn extract_key_points(text: &str, max_points: usize) -> Vec<KeyPoint> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    normalized
        .split(|c| c == '.' || c == '!' || c == '?')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(max_points)
        .map(|s| KeyPoint {
            point: s.to_string(),
            timestamp: None,
            importance: "normal".to_string(),
        })
        .collect()
}
