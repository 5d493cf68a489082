use std::sync::LazyLock;

use regex::Regex;

use super::LineRule;
use crate::record::Field;

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+years old").unwrap());
static SURGERY_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{2}/\d{2}/\d{4})").unwrap());
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*mm,").unwrap());
static GRADE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bG([1-3])\b").unwrap());
static RECEPTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(ER [0-9]+.*?)(PR [0-9]+)?(,? HER2[^,]*)?").unwrap());
static NPI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"V?NPI:\s*([\d.]+)").unwrap());

/// Rules run against every line that mentions the patient's age. Each is
/// independent; a later matching line overwrites earlier values.
pub const RULES: &[(Field, LineRule)] = &[
    (Field::Age, age),
    (Field::SurgeryDate, surgery_date),
    (Field::TumourSize, tumour_size),
    (Field::TumourGrade, tumour_grade),
    (Field::Diagnosis, diagnosis),
    (Field::ReceptorStatus, receptor_status),
    (Field::Npi, npi),
];

pub fn applies(line: &str) -> bool {
    line.contains("years old")
}

fn first_group(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).map(|c| c[1].to_string())
}

pub fn age(line: &str) -> Option<String> {
    first_group(&AGE_RE, line)
}

pub fn surgery_date(line: &str) -> Option<String> {
    first_group(&SURGERY_DATE_RE, line)
}

pub fn tumour_size(line: &str) -> Option<String> {
    first_group(&SIZE_RE, line)
}

pub fn tumour_grade(line: &str) -> Option<String> {
    first_group(&GRADE_RE, line)
}

/// Case-sensitive; IDC takes precedence over DCIS.
pub fn diagnosis(line: &str) -> Option<String> {
    if line.contains("IDC") {
        Some("IDC".to_string())
    } else if line.contains("DCIS") {
        Some("DCIS".to_string())
    } else {
        None
    }
}

/// Best-effort ER / PR / HER2 capture. Missing groups leave their slot
/// empty, so the joined value can carry doubled spaces.
pub fn receptor_status(line: &str) -> Option<String> {
    let caps = RECEPTOR_RE.captures(line)?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    Some(format!("{} {} {}", group(1), group(2), group(3)).trim().to_string())
}

pub fn npi(line: &str) -> Option<String> {
    first_group(&NPI_RE, line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "Mrs Doe is 61 years old, R WLE + SNB (12/06/2023): 18.5mm, G3 IDC, ER 8, HER2 negative, NPI: 4.36";

    #[test]
    fn every_rule_on_one_line() {
        assert!(applies(LINE));
        assert_eq!(age(LINE).as_deref(), Some("61"));
        assert_eq!(surgery_date(LINE).as_deref(), Some("12/06/2023"));
        assert_eq!(tumour_size(LINE).as_deref(), Some("18.5"));
        assert_eq!(tumour_grade(LINE).as_deref(), Some("3"));
        assert_eq!(diagnosis(LINE).as_deref(), Some("IDC"));
        assert_eq!(receptor_status(LINE).as_deref(), Some("ER 8  , HER2 negative"));
        assert_eq!(npi(LINE).as_deref(), Some("4.36"));
    }

    #[test]
    fn rules_are_independent() {
        let line = "72 years old, DCIS, no measurements";
        assert_eq!(age(line).as_deref(), Some("72"));
        assert_eq!(diagnosis(line).as_deref(), Some("DCIS"));
        assert_eq!(tumour_size(line), None);
        assert_eq!(tumour_grade(line), None);
        assert_eq!(surgery_date(line), None);
        assert_eq!(receptor_status(line), None);
        assert_eq!(npi(line), None);
    }

    #[test]
    fn diagnosis_prefers_idc_and_is_case_sensitive() {
        assert_eq!(diagnosis("IDC with DCIS").as_deref(), Some("IDC"));
        assert_eq!(diagnosis("idc"), None);
    }

    #[test]
    fn grade_needs_word_boundary() {
        assert_eq!(tumour_grade("G4 tumour"), None);
        assert_eq!(tumour_grade("PG2"), None);
        assert_eq!(tumour_grade("grade G1, "), Some("1".to_string()));
    }

    #[test]
    fn receptor_capture_is_partial() {
        assert_eq!(receptor_status("ER 8/8 PR 6/8").as_deref(), Some("ER 8"));
        assert_eq!(receptor_status("ER 7PR 5").as_deref(), Some("ER 7 PR 5"));
    }

    #[test]
    fn vnpi_is_recognised() {
        assert_eq!(npi("VNPI: 5").as_deref(), Some("5"));
        assert_eq!(npi("NPI:3.4").as_deref(), Some("3.4"));
        assert_eq!(npi("NPI 3.4"), None);
    }
}
