use std::sync::LazyLock;

use regex::Regex;

/// Name words, hospital number, optional suffix word (e.g. consultant initial).
static PATIENT_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\-.' ]+ \d{5,7}(?: [A-Za-z]+)?$").unwrap());

/// Non-empty, trimmed lines belonging to one patient. `lines[0]` is always
/// the start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientBlock {
    pub lines: Vec<String>,
}

pub fn is_patient_start(line: &str) -> bool {
    PATIENT_START_RE.is_match(line.trim())
}

/// Split a flat paragraph sequence into per-patient blocks. Anything before
/// the first start line is document header and is dropped.
pub fn segment<S: AsRef<str>>(paragraphs: &[S]) -> Vec<PatientBlock> {
    let mut boundaries: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| is_patient_start(p.as_ref()))
        .map(|(i, _)| i)
        .collect();
    boundaries.push(paragraphs.len());

    boundaries
        .windows(2)
        .map(|w| PatientBlock {
            lines: paragraphs[w[0]..w[1]]
                .iter()
                .map(|p| p.as_ref().trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect()
}
