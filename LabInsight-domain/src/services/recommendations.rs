use std::collections::HashSet;

use crate::config::MAX_RECOMMENDATIONS;
use crate::entities::report::{Category, Metric, RecommendationSet};
use crate::services::catalog::{self, ConditionGroup};

pub const DIETARY_PLAN_TITLE: &str = "Personalized Dietary Recommendations";

const HIGH_CHOLESTEROL: &[&str] = &[
    "Limit saturated and trans fats found in red meat and full-fat dairy",
    "Increase soluble fiber from oats, beans, and fruits",
    "Add fatty fish like salmon to your diet twice weekly",
    "Include plant sterols found in nuts, seeds, and vegetable oils",
];

const HIGH_GLUCOSE: &[&str] = &[
    "Limit refined carbohydrates and added sugars",
    "Choose whole grains over processed grains",
    "Add cinnamon to your diet, which may help lower blood sugar",
    "Include lean proteins with each meal to stabilize blood sugar",
];

const VITAMIN_D: &[&str] = &[
    "Include fatty fish, egg yolks, and mushrooms in your diet",
    "Consider fortified foods like milk, orange juice, and cereals",
    "Spend 15-30 minutes in the sun a few times per week",
    "Include vitamin D-rich dairy alternatives like fortified plant milks",
];

const HIGH_BLOOD_PRESSURE: &[&str] = &[
    "Follow the DASH diet (rich in fruits, vegetables, and low-fat dairy)",
    "Limit sodium intake to less than 2,300mg daily",
    "Include potassium-rich foods like bananas, potatoes, and avocados",
    "Consider including beet juice, which may help lower blood pressure",
];

const ANEMIA: &[&str] = &[
    "Include iron-rich foods like lean red meat, beans, and spinach",
    "Pair iron-rich foods with vitamin C to enhance absorption",
    "Include vitamin B12 sources like meat, eggs, and dairy",
    "Consider adding folate-rich foods like leafy greens and legumes",
];

const KIDNEY: &[&str] = &[
    "Limit sodium intake to less than 2,300mg daily",
    "Keep protein portions moderate to reduce the load on your kidneys",
    "Choose fresh foods over processed foods with phosphorus additives",
    "Drink water steadily throughout the day unless told otherwise by your doctor",
];

const THYROID: &[&str] = &[
    "Include iodine sources such as seafood, dairy, and iodized salt",
    "Add selenium-rich foods like Brazil nuts, eggs, and sunflower seeds",
    "Include zinc sources like shellfish, legumes, and pumpkin seeds",
    "Prefer cooked over raw cruciferous vegetables when eaten in large amounts",
];

/// Returned when no abnormal metric maps to a dietary table
pub const GENERIC_DIETARY: &[&str] = &[
    "Maintain a balanced diet with plenty of fruits and vegetables",
    "Limit processed foods and added sugars",
    "Stay hydrated by drinking 8-10 glasses of water daily",
    "Include a variety of protein sources in your diet",
];

const BASE_LIFESTYLE: &[&str] = &[
    "Maintain a balanced diet rich in vegetables and fruits",
    "Engage in moderate exercise for at least 150 minutes weekly",
    "Ensure adequate hydration by drinking 8-10 glasses of water daily",
];

/// Dietary table for a condition group
pub fn dietary_table(group: ConditionGroup) -> &'static [&'static str] {
    match group {
        ConditionGroup::Cholesterol => HIGH_CHOLESTEROL,
        ConditionGroup::BloodPressure => HIGH_BLOOD_PRESSURE,
        ConditionGroup::Diabetes => HIGH_GLUCOSE,
        ConditionGroup::Kidney => KIDNEY,
        ConditionGroup::Thyroid => THYROID,
        ConditionGroup::VitaminD => VITAMIN_D,
        ConditionGroup::Anemia => ANEMIA,
    }
}

/// Keep the first occurrence of each string, then truncate to `cap`
pub fn dedupe_and_cap<I, S>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|item: &String| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

/// Dietary plan for the abnormal metrics of a report
///
/// Tables are consulted in metric order, each group at most once. If nothing
/// abnormal maps to a table the generic set is used, so the list is never empty.
pub fn derive_dietary_plan(metrics: &[Metric], cap: usize) -> RecommendationSet {
    let mut groups: Vec<ConditionGroup> = Vec::new();
    for metric in metrics.iter().filter(|m| !m.status.is_normal()) {
        if let Some(group) = catalog::find_definition(&metric.name).and_then(|d| d.condition) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
    }

    let selected: Vec<&str> = groups.iter().flat_map(|g| dietary_table(*g).iter().copied()).collect();
    let source = if selected.is_empty() { GENERIC_DIETARY.to_vec() } else { selected };

    RecommendationSet {
        title: DIETARY_PLAN_TITLE.to_string(),
        recommendations: dedupe_and_cap(source, cap.clamp(1, MAX_RECOMMENDATIONS)),
    }
}

fn lifestyle_title(category: Category) -> &'static str {
    match category {
        Category::Diabetes => "Diabetes Management Recommendations",
        Category::Heart => "Heart Health Recommendations",
        Category::Kidney => "Kidney Health Recommendations",
        Category::Thyroid => "Thyroid Health Recommendations",
        Category::Liver => "Liver Health Recommendations",
        Category::General => "General Health Recommendations",
    }
}

fn category_lifestyle(category: Category) -> &'static [&'static str] {
    match category {
        Category::Diabetes => &[
            "Monitor your blood glucose levels regularly",
            "Limit intake of refined carbohydrates and added sugars",
            "Consider adding cinnamon to your diet",
        ],
        Category::Heart => &[
            "Limit saturated and trans fats in your diet",
            "Consider omega-3 fatty acids from fish or supplements",
            "Practice stress reduction techniques like meditation",
        ],
        Category::Kidney => &[
            "Monitor your sodium intake",
            "Maintain healthy blood pressure levels",
            "Avoid excessive protein consumption",
        ],
        Category::Thyroid => &[
            "Ensure adequate iodine in your diet",
            "Consider selenium-rich foods like Brazil nuts",
            "Manage stress to support thyroid function",
        ],
        Category::Liver => &[
            "Limit alcohol consumption",
            "Maintain a healthy weight to reduce fat build-up in the liver",
            "Check with your doctor before taking new supplements or medications",
        ],
        Category::General => &[],
    }
}

/// Line specific to the kind of file that was uploaded, if recognised
pub fn file_type_recommendation(file_type: &str) -> Option<&'static str> {
    let file_type = file_type.to_lowercase();
    if file_type.contains("pdf") {
        Some("Your PDF results show important health indicators - discuss specific findings with your doctor")
    } else if file_type.contains("document") || file_type.contains("doc") {
        Some("Your lab document contains detailed health parameters - schedule a review with your healthcare provider")
    } else if file_type.contains("image") {
        Some("For more accurate analysis, consider providing digital copies of your lab reports")
    } else {
        None
    }
}

/// Category recommendations without the file-specific line
pub fn category_recommendations(category: Category, cap: usize) -> RecommendationSet {
    RecommendationSet {
        title: lifestyle_title(category).to_string(),
        recommendations: dedupe_and_cap(
            BASE_LIFESTYLE.iter().chain(category_lifestyle(category).iter()).copied(),
            cap.clamp(1, MAX_RECOMMENDATIONS),
        ),
    }
}

/// Lifestyle recommendations: base set, category set, then the file-type line
pub fn derive_lifestyle(category: Category, file_type: &str, cap: usize) -> RecommendationSet {
    let items = BASE_LIFESTYLE
        .iter()
        .chain(category_lifestyle(category).iter())
        .copied()
        .chain(file_type_recommendation(file_type));

    RecommendationSet {
        title: lifestyle_title(category).to_string(),
        recommendations: dedupe_and_cap(items, cap.clamp(1, MAX_RECOMMENDATIONS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::report::{MetricStatus, MetricValue};

    fn metric(name: &str, status: MetricStatus) -> Metric {
        Metric {
            name: name.to_string(),
            value: MetricValue::Number(1.0),
            unit: String::new(),
            status,
            reference_range: String::new(),
            change: None,
            description: None,
        }
    }

    fn assert_unique(items: &[String]) {
        let set: HashSet<&String> = items.iter().collect();
        assert_eq!(set.len(), items.len(), "duplicates in {:?}", items);
    }

    #[test]
    fn test_all_normal_uses_generic_set() {
        let metrics = vec![metric("Blood Glucose", MetricStatus::Normal)];
        let plan = derive_dietary_plan(&metrics, MAX_RECOMMENDATIONS);
        assert_eq!(plan.title, DIETARY_PLAN_TITLE);
        assert_eq!(plan.recommendations, GENERIC_DIETARY.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_abnormal_without_table_falls_back_to_generic() {
        let metrics = vec![metric("ALT", MetricStatus::Caution)];
        let plan = derive_dietary_plan(&metrics, MAX_RECOMMENDATIONS);
        assert_eq!(plan.recommendations.len(), GENERIC_DIETARY.len());
    }

    #[test]
    fn test_tables_follow_metric_order() {
        let metrics = vec![
            metric("Blood Glucose", MetricStatus::Attention),
            metric("Total Cholesterol", MetricStatus::Caution),
        ];
        let plan = derive_dietary_plan(&metrics, MAX_RECOMMENDATIONS);
        assert_eq!(plan.recommendations[0], HIGH_GLUCOSE[0]);
        assert_eq!(plan.recommendations[4], HIGH_CHOLESTEROL[0]);
        assert_eq!(plan.recommendations.len(), 7);
    }

    #[test]
    fn test_shared_strings_are_deduplicated() {
        // kidney and blood pressure tables share the sodium line
        let metrics = vec![
            metric("Blood Pressure", MetricStatus::Attention),
            metric("Creatinine", MetricStatus::Caution),
        ];
        let plan = derive_dietary_plan(&metrics, 10);
        assert_unique(&plan.recommendations);
        assert_eq!(plan.recommendations.len(), 7);
    }

    #[test]
    fn test_cap_holds_for_every_abnormal_combination() {
        let names: Vec<&str> = catalog::BASE_METRICS
            .iter()
            .map(|d| d.name)
            .chain(["HbA1c", "LDL Cholesterol", "Creatinine", "TSH", "ALT"])
            .collect();

        for mask in 0u32..(1 << names.len()) {
            let metrics: Vec<Metric> = names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    let status = if mask & (1 << i) != 0 { MetricStatus::Caution } else { MetricStatus::Normal };
                    metric(n, status)
                })
                .collect();

            for cap in [1, 6, MAX_RECOMMENDATIONS] {
                let plan = derive_dietary_plan(&metrics, cap);
                assert!(!plan.recommendations.is_empty());
                assert!(plan.recommendations.len() <= cap);
                assert_unique(&plan.recommendations);
            }
        }
    }

    #[test]
    fn test_lifestyle_set_by_category_and_type() {
        let set = derive_lifestyle(Category::Diabetes, "application/pdf", MAX_RECOMMENDATIONS);
        assert_eq!(set.title, "Diabetes Management Recommendations");
        assert_eq!(set.recommendations.len(), 7);
        assert!(set.recommendations[6].starts_with("Your PDF results"));

        let set = derive_lifestyle(Category::General, "image/png", MAX_RECOMMENDATIONS);
        assert_eq!(set.title, "General Health Recommendations");
        assert_eq!(set.recommendations.len(), 4);
        assert!(set.recommendations[3].contains("digital copies"));

        let set = derive_lifestyle(Category::Heart, "text/csv", 2);
        assert_eq!(set.recommendations.len(), 2);
    }

    #[test]
    fn test_oversized_cap_is_bounded() {
        let metrics = vec![
            metric("Blood Glucose", MetricStatus::Attention),
            metric("Total Cholesterol", MetricStatus::Caution),
            metric("Vitamin D", MetricStatus::Caution),
        ];
        assert_eq!(derive_dietary_plan(&metrics, 50).recommendations.len(), MAX_RECOMMENDATIONS);
        assert!(derive_lifestyle(Category::Liver, "application/pdf", usize::MAX).recommendations.len() <= MAX_RECOMMENDATIONS);
        assert!(category_recommendations(Category::Heart, 100).recommendations.len() <= MAX_RECOMMENDATIONS);
        assert_eq!(derive_dietary_plan(&metrics, 0).recommendations.len(), 1);
    }

    #[test]
    fn test_file_type_recommendation() {
        assert!(file_type_recommendation("application/msword-document").unwrap().contains("lab document"));
        assert!(file_type_recommendation("text/plain").is_none());
    }

    #[test]
    fn test_dedupe_and_cap() {
        let out = dedupe_and_cap(vec!["a", "b", "a", "c", "b", "d"], 3);
        assert_eq!(out, vec!["a", "b", "c"]);
        assert!(dedupe_and_cap(Vec::<String>::new(), 7).is_empty());
    }
}
