//! Alternative explanations for trend hypotheses
//!
//! A fixed lookup: decline wording pulls in decline alternatives, growth
//! wording pulls in growth alternatives. At most three are returned, decline
//! first.

use regex::Regex;
use std::sync::OnceLock;

static DECLINE_RE: OnceLock<Regex> = OnceLock::new();
static GROWTH_RE: OnceLock<Regex> = OnceLock::new();

/// Language alternatives and checklists are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Russian
    #[default]
    Ru,
    /// English
    En,
}

impl Language {
    /// `en` selects English; anything else falls back to Russian
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("en") {
            Language::En
        } else {
            Language::Ru
        }
    }
}

/// Maximum alternatives attached to one hypothesis
pub const MAX_ALTERNATIVES: usize = 3;

// Russian stems anchor at a word start and take any ending ("роста",
// "падением"); English words must stand alone ("fallback" is neutral)
fn decline_wording() -> &'static Regex {
    DECLINE_RE.get_or_init(|| {
        Regex::new(r"\b(?:падени|снижени)|\b(?:decline|drop|decrease|fall)\b")
            .expect("decline regex is valid")
    })
}

fn growth_wording() -> &'static Regex {
    GROWTH_RE.get_or_init(|| {
        Regex::new(r"\b(?:рост|увеличени)|\b(?:growth|increase|rise)\b")
            .expect("growth regex is valid")
    })
}

const DECLINE_RU: [&str; 4] = [
    "Сезонное снижение активности",
    "Технические проблемы с tracking",
    "Изменения в методологии измерения",
    "Внешние факторы (экономика, конкуренты)",
];

const DECLINE_EN: [&str; 4] = [
    "Seasonal drop in activity",
    "Technical problems with tracking",
    "Changes in measurement methodology",
    "External factors (economy, competitors)",
];

const GROWTH_RU: [&str; 4] = [
    "Сезонный пик активности",
    "Разовая акция/кампания",
    "Изменения в учете данных",
    "Общий рост рынка",
];

const GROWTH_EN: [&str; 4] = [
    "Seasonal activity peak",
    "One-off promotion or campaign",
    "Changes in data accounting",
    "Overall market growth",
];

/// Alternatives triggered by the wording of `hypothesis`
///
/// ```
/// use traffic_audit::audit::alternatives::{generate_alternatives, Language};
///
/// let alts = generate_alternatives("Падение трафика из-за апдейта", Language::Ru);
/// assert_eq!(alts.len(), 3);
/// assert_eq!(alts[0], "Сезонное снижение активности");
///
/// assert!(generate_alternatives("Traffic was flat", Language::En).is_empty());
/// ```
pub fn generate_alternatives(hypothesis: &str, language: Language) -> Vec<String> {
    let lowered = hypothesis.to_lowercase();

    let (decline, growth) = match language {
        Language::Ru => (&DECLINE_RU, &GROWTH_RU),
        Language::En => (&DECLINE_EN, &GROWTH_EN),
    };

    let mut alternatives: Vec<String> = Vec::new();
    if decline_wording().is_match(&lowered) {
        alternatives.extend(decline.iter().map(|s| s.to_string()));
    }
    if growth_wording().is_match(&lowered) {
        alternatives.extend(growth.iter().map(|s| s.to_string()));
    }
    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}
