use super::LineRule;
use crate::record::Field;

pub const RULES: &[(Field, LineRule)] = &[
    (Field::SkinSideEffects, skin),
    (Field::PainSideEffects, pain),
    (Field::FatigueSideEffects, fatigue),
    (Field::HormoneSideEffects, hormone),
];

const HORMONE_PREFIXES: &[&str] = &["on tamoxifen", "on letrozole"];

/// Text after `prefix`, cut at the first `/` (the severity scale).
fn graded(line: &str, prefix: &str) -> Option<String> {
    let rest = line.strip_prefix(prefix)?.trim();
    Some(rest.split('/').next().unwrap_or(rest).to_string())
}

pub fn skin(line: &str) -> Option<String> {
    graded(line, "Skin: ")
}

pub fn pain(line: &str) -> Option<String> {
    graded(line, "Pain: ")
}

pub fn fatigue(line: &str) -> Option<String> {
    graded(line, "Fatigue: ")
}

/// `On tamoxifen, which causes hot flushes` → `causes hot flushes`.
pub fn hormone(line: &str) -> Option<String> {
    let lower = line.to_lowercase();
    if !HORMONE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return None;
    }
    if line.contains("no SE") {
        return Some("None".to_string());
    }
    let tail = line.rsplit("which").next().unwrap_or(line);
    Some(tail.trim().to_string())
}
