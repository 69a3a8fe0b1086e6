//! Static metric definitions grouped by body-system category

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::report::{Category, MetricStatus};

/// How a metric's value is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRange {
    /// `min + floor(r * span)`
    Integer { min: f64, span: f64 },
    /// `min + r * span`, rounded to `precision` decimals
    Decimal { min: f64, span: f64, precision: u32 },
    /// Systolic 110..150 over diastolic 70..90, rendered as "S/D"
    BloodPressure,
}

impl ValueRange {
    /// Decimals kept when rounding a value of this range
    pub fn precision(&self) -> u32 {
        match self {
            ValueRange::Decimal { precision, .. } => *precision,
            _ => 0,
        }
    }
}

/// How a metric's change from baseline is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeRange {
    /// `floor(r * span) + offset`
    Integer { offset: f64, span: f64 },
    /// `min + r * span`, rounded to `precision` decimals
    Decimal { min: f64, span: f64, precision: u32 },
}

/// Dietary table consulted when a metric is abnormal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionGroup {
    Cholesterol,
    BloodPressure,
    Diabetes,
    Kidney,
    Thyroid,
    VitaminD,
    Anemia,
}

/// A measurable metric and the parameters used to simulate it
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub unit: &'static str,
    pub reference_range: &'static str,
    pub description: &'static str,
    pub value_range: ValueRange,
    pub change_range: ChangeRange,
    /// A uniform draw strictly above this is normal
    pub normal_cutoff: f64,
    /// Status used when the draw is not normal
    pub abnormal_status: MetricStatus,
    /// Lowercase file-name keywords that may carry a seed value
    pub keywords: &'static [&'static str],
    pub condition: Option<ConditionGroup>,
}

const fn int(min: f64, span: f64) -> ValueRange {
    ValueRange::Integer { min, span }
}

const fn dec(min: f64, span: f64, precision: u32) -> ValueRange {
    ValueRange::Decimal { min, span, precision }
}

const fn int_change(span: f64, offset: f64) -> ChangeRange {
    ChangeRange::Integer { offset, span }
}

const fn dec_change(min: f64, span: f64, precision: u32) -> ChangeRange {
    ChangeRange::Decimal { min, span, precision }
}

/// Metrics present in every report
pub static BASE_METRICS: [MetricDefinition; 6] = [
    MetricDefinition {
        name: "Blood Glucose",
        unit: "mg/dL",
        reference_range: "70-100 mg/dL",
        description: "Fasting blood glucose levels indicate how effectively your body regulates sugar",
        value_range: int(70.0, 100.0),
        change_range: int_change(20.0, -10.0),
        normal_cutoff: 0.5,
        abnormal_status: MetricStatus::Attention,
        keywords: &["glucose", "sugar"],
        condition: Some(ConditionGroup::Diabetes),
    },
    MetricDefinition {
        name: "Total Cholesterol",
        unit: "mg/dL",
        reference_range: "125-200 mg/dL",
        description: "Total cholesterol measures all cholesterol in your blood, including HDL and LDL",
        value_range: int(150.0, 100.0),
        change_range: int_change(30.0, -15.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["cholesterol", "chol"],
        condition: Some(ConditionGroup::Cholesterol),
    },
    MetricDefinition {
        name: "Blood Pressure",
        unit: "mmHg",
        reference_range: "120/80 mmHg",
        description: "Blood pressure is the force of blood pushing against artery walls",
        value_range: ValueRange::BloodPressure,
        change_range: int_change(10.0, -5.0),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Attention,
        keywords: &[],
        condition: Some(ConditionGroup::BloodPressure),
    },
    MetricDefinition {
        name: "Hemoglobin",
        unit: "g/dL",
        reference_range: "13.5-17.5 g/dL (men), 12.0-15.5 g/dL (women)",
        description: "Hemoglobin is a protein in red blood cells that carries oxygen",
        value_range: dec(12.0, 4.0, 1),
        change_range: dec_change(-1.0, 2.0, 1),
        normal_cutoff: 0.8,
        abnormal_status: MetricStatus::Caution,
        keywords: &["hemoglobin", "hgb", "hb"],
        condition: Some(ConditionGroup::Anemia),
    },
    MetricDefinition {
        name: "Vitamin D",
        unit: "ng/mL",
        reference_range: "20-50 ng/mL",
        description: "Vitamin D is essential for calcium absorption and bone health",
        value_range: int(20.0, 40.0),
        change_range: int_change(10.0, -5.0),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Caution,
        keywords: &["vitamind", "vitd"],
        condition: Some(ConditionGroup::VitaminD),
    },
    MetricDefinition {
        name: "Vitamin B12",
        unit: "pg/mL",
        reference_range: "200-900 pg/mL",
        description: "Vitamin B12 is important for nerve function and red blood cell formation",
        value_range: int(200.0, 600.0),
        change_range: int_change(100.0, -50.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["b12"],
        condition: Some(ConditionGroup::Anemia),
    },
];

static DIABETES_METRICS: [MetricDefinition; 3] = [
    MetricDefinition {
        name: "HbA1c",
        unit: "%",
        reference_range: "4.0-5.6%",
        description: "HbA1c measures average blood glucose levels over the past 2-3 months",
        value_range: dec(4.0, 3.0, 1),
        change_range: dec_change(-0.5, 1.0, 1),
        normal_cutoff: 0.5,
        abnormal_status: MetricStatus::Caution,
        keywords: &["hba1c", "a1c"],
        condition: Some(ConditionGroup::Diabetes),
    },
    MetricDefinition {
        name: "Insulin",
        unit: "μIU/mL",
        reference_range: "5-25 μIU/mL",
        description: "Insulin is a hormone that regulates blood glucose levels",
        value_range: int(5.0, 20.0),
        change_range: int_change(5.0, -2.0),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Caution,
        keywords: &["insulin"],
        condition: Some(ConditionGroup::Diabetes),
    },
    MetricDefinition {
        name: "C-Peptide",
        unit: "ng/mL",
        reference_range: "0.8-3.9 ng/mL",
        description: "C-Peptide is an indicator of how much insulin your pancreas produces",
        value_range: dec(0.8, 3.1, 1),
        change_range: dec_change(-0.3, 0.6, 1),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["c-peptide", "cpeptide"],
        condition: Some(ConditionGroup::Diabetes),
    },
];

static HEART_METRICS: [MetricDefinition; 3] = [
    MetricDefinition {
        name: "LDL Cholesterol",
        unit: "mg/dL",
        reference_range: "<100 mg/dL",
        description: "LDL (bad) cholesterol can build up in your arteries",
        value_range: int(70.0, 80.0),
        change_range: int_change(15.0, -7.0),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Caution,
        keywords: &["ldl"],
        condition: Some(ConditionGroup::Cholesterol),
    },
    MetricDefinition {
        name: "HDL Cholesterol",
        unit: "mg/dL",
        reference_range: ">40 mg/dL (men), >50 mg/dL (women)",
        description: "HDL (good) cholesterol helps remove LDL cholesterol from your arteries",
        value_range: int(35.0, 30.0),
        change_range: int_change(8.0, -4.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Attention,
        keywords: &["hdl"],
        condition: Some(ConditionGroup::Cholesterol),
    },
    MetricDefinition {
        name: "Triglycerides",
        unit: "mg/dL",
        reference_range: "<150 mg/dL",
        description: "Triglycerides are a type of fat in the blood",
        value_range: int(50.0, 100.0),
        change_range: int_change(20.0, -10.0),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Caution,
        keywords: &["triglycerides", "trig"],
        condition: Some(ConditionGroup::Cholesterol),
    },
];

static KIDNEY_METRICS: [MetricDefinition; 3] = [
    MetricDefinition {
        name: "Creatinine",
        unit: "mg/dL",
        reference_range: "0.6-1.2 mg/dL (men), 0.5-1.1 mg/dL (women)",
        description: "Creatinine is a waste product filtered by the kidneys",
        value_range: dec(0.6, 0.8, 2),
        change_range: dec_change(-0.2, 0.4, 2),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["creatinine", "creat"],
        condition: Some(ConditionGroup::Kidney),
    },
    MetricDefinition {
        name: "BUN",
        unit: "mg/dL",
        reference_range: "7-20 mg/dL",
        description: "BUN (Blood Urea Nitrogen) is a waste product filtered by the kidneys",
        value_range: int(7.0, 13.0),
        change_range: int_change(6.0, -3.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["bun"],
        condition: Some(ConditionGroup::Kidney),
    },
    MetricDefinition {
        name: "eGFR",
        unit: "mL/min/1.73m²",
        reference_range: ">60 mL/min/1.73m²",
        description: "eGFR estimates how well your kidneys filter blood",
        value_range: int(60.0, 60.0),
        change_range: int_change(10.0, -5.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["egfr", "gfr"],
        condition: Some(ConditionGroup::Kidney),
    },
];

static THYROID_METRICS: [MetricDefinition; 3] = [
    MetricDefinition {
        name: "TSH",
        unit: "mIU/L",
        reference_range: "0.4-4.0 mIU/L",
        description: "TSH (Thyroid Stimulating Hormone) regulates thyroid hormone production",
        value_range: dec(0.5, 4.0, 2),
        change_range: dec_change(-0.5, 1.0, 2),
        normal_cutoff: 0.6,
        abnormal_status: MetricStatus::Attention,
        keywords: &["tsh"],
        condition: Some(ConditionGroup::Thyroid),
    },
    MetricDefinition {
        name: "T4",
        unit: "μg/dL",
        reference_range: "5.0-12.0 μg/dL",
        description: "T4 (Thyroxine) is the main thyroid hormone in the blood",
        value_range: dec(5.0, 7.0, 1),
        change_range: dec_change(-1.0, 2.0, 1),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["t4"],
        condition: Some(ConditionGroup::Thyroid),
    },
    MetricDefinition {
        name: "T3",
        unit: "ng/dL",
        reference_range: "80-180 ng/dL",
        description: "T3 (Triiodothyronine) is an active thyroid hormone",
        value_range: dec(80.0, 100.0, 0),
        change_range: int_change(30.0, -15.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["t3"],
        condition: Some(ConditionGroup::Thyroid),
    },
];

static LIVER_METRICS: [MetricDefinition; 3] = [
    MetricDefinition {
        name: "ALT",
        unit: "U/L",
        reference_range: "7-56 U/L",
        description: "ALT (Alanine Transaminase) is an enzyme primarily found in the liver",
        value_range: int(10.0, 40.0),
        change_range: int_change(10.0, -5.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["alt"],
        condition: None,
    },
    MetricDefinition {
        name: "AST",
        unit: "U/L",
        reference_range: "10-40 U/L",
        description: "AST (Aspartate Transaminase) is an enzyme found in the liver and other tissues",
        value_range: int(10.0, 30.0),
        change_range: int_change(8.0, -4.0),
        normal_cutoff: 0.7,
        abnormal_status: MetricStatus::Caution,
        keywords: &["ast"],
        condition: None,
    },
    MetricDefinition {
        name: "Albumin",
        unit: "g/dL",
        reference_range: "3.5-5.0 g/dL",
        description: "Albumin is a protein made by the liver",
        value_range: dec(3.5, 1.5, 1),
        change_range: dec_change(-0.3, 0.6, 1),
        normal_cutoff: 0.8,
        abnormal_status: MetricStatus::Caution,
        keywords: &["albumin", "alb"],
        condition: None,
    },
];

/// Category-specific metrics appended after the base set
pub fn supplemental_metrics(category: Category) -> &'static [MetricDefinition] {
    match category {
        Category::Diabetes => &DIABETES_METRICS,
        Category::Heart => &HEART_METRICS,
        Category::Kidney => &KIDNEY_METRICS,
        Category::Thyroid => &THYROID_METRICS,
        Category::Liver => &LIVER_METRICS,
        Category::General => &[],
    }
}

/// Ordered definitions in scope for a category: the base set, then the
/// category's supplemental set
pub fn definitions_for(category: Category) -> Vec<&'static MetricDefinition> {
    BASE_METRICS
        .iter()
        .chain(supplemental_metrics(category).iter())
        .collect()
}

/// Look up a definition by exact metric name across every category
pub fn find_definition(name: &str) -> Option<&'static MetricDefinition> {
    BASE_METRICS
        .iter()
        .chain(Category::ALL.iter().flat_map(|c| supplemental_metrics(*c).iter()))
        .find(|d| d.name == name)
}

/// Numeric interval parsed from a reference range string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceBounds {
    /// `a-b`, inclusive
    Between(f64, f64),
    /// `<b`
    Below(f64),
    /// `>a`
    Above(f64),
}

impl ReferenceBounds {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            ReferenceBounds::Between(low, high) => value >= low && value <= high,
            ReferenceBounds::Below(high) => value < high,
            ReferenceBounds::Above(low) => value > low,
        }
    }
}

static BETWEEN_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)").ok());
static ONE_SIDED_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\s*([<>])\s*(\d+(?:\.\d+)?)").ok());

fn number_in(m: Option<regex::Match<'_>>) -> Option<f64> {
    m.and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Bounds of the first range listed in a reference string
///
/// Sex-specific strings such as `13.5-17.5 g/dL (men), 12.0-15.5 g/dL (women)`
/// use the first entry. Ranges that are not a plain interval (`120/80 mmHg`)
/// yield `None`.
pub fn reference_bounds(reference_range: &str) -> Option<ReferenceBounds> {
    let first = reference_range.split(',').next()?;

    if let Some(caps) = BETWEEN_RE.as_ref().and_then(|re| re.captures(first)) {
        return Some(ReferenceBounds::Between(number_in(caps.get(1))?, number_in(caps.get(2))?));
    }

    let caps = ONE_SIDED_RE.as_ref()?.captures(first)?;
    let bound = number_in(caps.get(2))?;
    match caps.get(1)?.as_str() {
        "<" => Some(ReferenceBounds::Below(bound)),
        _ => Some(ReferenceBounds::Above(bound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_bounds() {
        assert_eq!(reference_bounds("70-100 mg/dL"), Some(ReferenceBounds::Between(70.0, 100.0)));
        assert_eq!(reference_bounds("4.0-5.6%"), Some(ReferenceBounds::Between(4.0, 5.6)));
        assert_eq!(reference_bounds("<150 mg/dL"), Some(ReferenceBounds::Below(150.0)));
        assert_eq!(reference_bounds(">40 mg/dL (men), >50 mg/dL (women)"), Some(ReferenceBounds::Above(40.0)));
        assert_eq!(
            reference_bounds("13.5-17.5 g/dL (men), 12.0-15.5 g/dL (women)"),
            Some(ReferenceBounds::Between(13.5, 17.5))
        );
        assert_eq!(reference_bounds("120/80 mmHg"), None);

        assert!(ReferenceBounds::Between(70.0, 100.0).contains(100.0));
        assert!(!ReferenceBounds::Below(100.0).contains(100.0));
        assert!(!ReferenceBounds::Above(60.0).contains(60.0));
    }

    #[test]
    fn test_every_numeric_range_parses() {
        for category in Category::ALL {
            for def in definitions_for(category) {
                if def.name != "Blood Pressure" {
                    assert!(reference_bounds(def.reference_range).is_some(), "{}", def.reference_range);
                }
            }
        }
    }

    #[test]
    fn test_every_category_has_populated_definitions() {
        for category in Category::ALL {
            let defs = definitions_for(category);
            assert!(!defs.is_empty(), "{} has no metrics", category);
            for def in defs {
                assert!(!def.unit.is_empty(), "{} has no unit", def.name);
                assert!(!def.reference_range.is_empty(), "{} has no range", def.name);
                assert!(!def.description.is_empty(), "{} has no description", def.name);
                assert!(!def.abnormal_status.is_normal());
                assert!(def.normal_cutoff > 0.0 && def.normal_cutoff < 1.0);
            }
        }
    }

    #[test]
    fn test_names_are_unique_within_a_category() {
        for category in Category::ALL {
            let defs = definitions_for(category);
            let names: HashSet<&str> = defs.iter().map(|d| d.name).collect();
            assert_eq!(names.len(), defs.len());
        }
    }

    #[test]
    fn test_supplemental_sets() {
        let names = |c| definitions_for(c).iter().map(|d| d.name).collect::<Vec<_>>();

        assert_eq!(names(Category::General).len(), 6);
        assert_eq!(&names(Category::Diabetes)[6..], ["HbA1c", "Insulin", "C-Peptide"]);
        assert_eq!(&names(Category::Heart)[6..], ["LDL Cholesterol", "HDL Cholesterol", "Triglycerides"]);
        assert_eq!(&names(Category::Kidney)[6..], ["Creatinine", "BUN", "eGFR"]);
        assert_eq!(&names(Category::Thyroid)[6..], ["TSH", "T4", "T3"]);
        assert_eq!(&names(Category::Liver)[6..], ["ALT", "AST", "Albumin"]);
    }

    #[test]
    fn test_find_definition() {
        assert_eq!(find_definition("eGFR").map(|d| d.unit), Some("mL/min/1.73m²"));
        assert!(find_definition("Ferritin").is_none());
    }
}
