//! Fixed review checklists per analysis type

use super::alternatives::Language;

/// Analysis types that have a checklist
pub const CHECKLIST_TYPES: [&str; 4] = ["traffic", "conversion", "seo", "hypothesis"];

const TRAFFIC_RU: [&str; 5] = [
    "Все источники трафика имеют данные из Метрики?",
    "Сумма источников = общий трафик?",
    "Нет ли аномальных скачков (>300%)?",
    "Учтена ли сезонность?",
    "Проверены ли данные за предыдущие периоды?",
];

const TRAFFIC_EN: [&str; 5] = [
    "Do all traffic sources have Metrika data?",
    "Does the sum of sources equal total traffic?",
    "Are there anomalous jumps (>300%)?",
    "Is seasonality accounted for?",
    "Were previous periods checked?",
];

const CONVERSION_RU: [&str; 5] = [
    "Все цели настроены в Метрике?",
    "CR не превышает разумные пределы (<10%)?",
    "Количество конверсий <= количество визитов?",
    "Есть ли данные по всем источникам?",
    "Проверена ли корректность tracking?",
];

const CONVERSION_EN: [&str; 5] = [
    "Are all goals configured in Metrika?",
    "Is CR within reasonable bounds (<10%)?",
    "Are conversions <= visits?",
    "Is there data for every source?",
    "Was tracking correctness verified?",
];

const SEO_RU: [&str; 5] = [
    "Данные взяты из GSC или Вебмастера?",
    "Период совпадает с анализом трафика?",
    "Проверены ли позиции ключевых запросов?",
    "Нет ли дублей запросов?",
    "Учтены ли брендовые vs небрендовые?",
];

const SEO_EN: [&str; 5] = [
    "Is the data taken from GSC or Webmaster?",
    "Does the period match the traffic analysis?",
    "Were positions of key queries checked?",
    "Are there duplicate queries?",
    "Are branded and non-branded queries separated?",
];

const HYPOTHESIS_RU: [&str; 5] = [
    "Гипотеза подкреплена минимум 3 точками данных?",
    "Рассмотрены ли альтернативные объяснения?",
    "Учтены ли внешние факторы?",
    "Можно ли проверить гипотезу A/B тестом?",
    "Указана уверенность в гипотезе?",
];

const HYPOTHESIS_EN: [&str; 5] = [
    "Is the hypothesis backed by at least 3 data points?",
    "Were alternative explanations considered?",
    "Were external factors accounted for?",
    "Can the hypothesis be verified with an A/B test?",
    "Is the confidence in the hypothesis stated?",
];

/// Checklist for `analysis_type`; unknown types get an empty list
///
/// ```
/// use traffic_audit::audit::{checklist, Language};
///
/// assert_eq!(checklist("seo", Language::En).len(), 5);
/// assert!(checklist("weather", Language::Ru).is_empty());
/// ```
pub fn checklist(analysis_type: &str, language: Language) -> Vec<&'static str> {
    let items: &[&'static str] = match (analysis_type, language) {
        ("traffic", Language::Ru) => &TRAFFIC_RU,
        ("traffic", Language::En) => &TRAFFIC_EN,
        ("conversion", Language::Ru) => &CONVERSION_RU,
        ("conversion", Language::En) => &CONVERSION_EN,
        ("seo", Language::Ru) => &SEO_RU,
        ("seo", Language::En) => &SEO_EN,
        ("hypothesis", Language::Ru) => &HYPOTHESIS_RU,
        ("hypothesis", Language::En) => &HYPOTHESIS_EN,
        _ => &[],
    };
    items.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_both_languages() {
        for kind in CHECKLIST_TYPES {
            assert_eq!(
                checklist(kind, Language::Ru).len(),
                checklist(kind, Language::En).len(),
                "{} checklists differ in length",
                kind
            );
            assert!(!checklist(kind, Language::Ru).is_empty());
        }
    }

    #[test]
    fn test_traffic_checklist_in_russian() {
        assert_eq!(
            checklist("traffic", Language::Ru)[1],
            "Сумма источников = общий трафик?"
        );
    }
}
