use crate::entities::report::{Category, Metric, UploadedFile};
use crate::services::catalog;
use crate::services::text_extractor::extract_text_metrics;

/// Keyword sets in priority order; the first category with a hit wins
const CATEGORY_KEYWORDS: [(Category, &[&str]); 5] = [
    (Category::Diabetes, &["diabetes", "diabetic", "glucose", "hba1c", "insulin", "sugar"]),
    (Category::Heart, &["heart", "cardiac", "cardio", "lipid", "cholesterol"]),
    (Category::Kidney, &["kidney", "renal", "creatinine", "egfr"]),
    (Category::Thyroid, &["thyroid", "tsh"]),
    (Category::Liver, &["liver", "hepatic"]),
];

/// Assign exactly one body-system category from a file name and declared type
///
/// Matching is a case-insensitive substring search; empty input is `General`.
pub fn classify(file_name: &str, file_type: &str) -> Category {
    let haystack = format!("{} {}", file_name, file_type).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// Weight of a recognised metric relative to one keyword mention
const METRIC_WEIGHT: usize = 2;

/// Category of a report's text by keyword frequency
///
/// Each keyword occurrence scores one point and each extracted metric that
/// belongs to a category scores two. The highest score wins, ties go to the
/// earlier category in priority order, and text with no score yields `None`.
pub fn classify_text(text: &str, metrics: &[Metric]) -> Option<Category> {
    let lower = text.to_lowercase();

    let mut best: Option<(Category, usize)> = None;
    for (category, keywords) in CATEGORY_KEYWORDS.iter() {
        let mentions: usize = keywords.iter().map(|k| lower.matches(k).count()).sum();
        let measured = metrics
            .iter()
            .filter(|m| {
                let name = m.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k))
                    || catalog::supplemental_metrics(*category).iter().any(|d| d.name == m.name)
            })
            .count();

        let score = mentions + METRIC_WEIGHT * measured;
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((*category, score));
        }
    }

    best.map(|(category, _)| category)
}

/// Category of an upload: its text when that scores, otherwise its name and type
pub fn classify_upload(file: &UploadedFile) -> Category {
    file.text()
        .and_then(|text| classify_text(text, &extract_text_metrics(text)))
        .unwrap_or_else(|| classify(&file.name, &file.file_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(classify("glucose-report.pdf", ""), Category::Diabetes);
        assert_eq!(classify("cardiac_panel.pdf", ""), Category::Heart);
        assert_eq!(classify("random.pdf", ""), Category::General);
        assert_eq!(classify("Renal-Function.PNG", "image/png"), Category::Kidney);
        assert_eq!(classify("TSH_results.docx", ""), Category::Thyroid);
        assert_eq!(classify("hepatic-panel.pdf", ""), Category::Liver);
    }

    #[test]
    fn test_priority_order() {
        // diabetes beats heart, heart beats kidney
        assert_eq!(classify("lipid-and-glucose.pdf", ""), Category::Diabetes);
        assert_eq!(classify("cholesterol-creatinine.pdf", ""), Category::Heart);
        assert_eq!(classify("thyroid-liver.pdf", ""), Category::Thyroid);
    }

    #[test]
    fn test_empty_input_and_determinism() {
        assert_eq!(classify("", ""), Category::General);
        let first = classify("diabetes-glucose-98.pdf", "application/pdf");
        for _ in 0..10 {
            assert_eq!(classify("diabetes-glucose-98.pdf", "application/pdf"), first);
        }
    }

    #[test]
    fn test_health_does_not_hit_liver_keywords() {
        assert_eq!(classify("annual-health-check.pdf", "application/pdf"), Category::General);
    }

    #[test]
    fn test_text_scoring_picks_most_mentioned_category() {
        let text = "Renal function panel. Creatinine 1.4 mg/dL, eGFR 55. Glucose 92 mg/dL.";
        let metrics = extract_text_metrics(text);
        assert_eq!(classify_text(text, &metrics), Some(Category::Kidney));
    }

    #[test]
    fn test_text_scoring_counts_metrics_and_breaks_ties_by_priority() {
        let text = "ALT 70 U/L AST 45 U/L";
        assert_eq!(classify_text(text, &extract_text_metrics(text)), Some(Category::Liver));

        // one mention each: diabetes comes first
        assert_eq!(classify_text("insulin and thyroid", &[]), Some(Category::Diabetes));
        assert_eq!(classify_text("nothing relevant here", &[]), None);
    }

    #[test]
    fn test_upload_text_overrides_file_name() {
        let file = UploadedFile::new("glucose-98.pdf", "application/pdf")
            .with_content("Thyroid panel: TSH 6.2 mIU/L, T4 4.1");
        assert_eq!(classify_upload(&file), Category::Thyroid);

        let without_text = UploadedFile::new("glucose-98.pdf", "application/pdf");
        assert_eq!(classify_upload(&without_text), Category::Diabetes);

        let unscored = UploadedFile::new("cardiac.pdf", "").with_content("see attached");
        assert_eq!(classify_upload(&unscored), Category::Heart);
    }
}
