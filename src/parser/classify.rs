//! Categorical fields derived from the free-text plan. All of these are
//! total: any input, including `""`, maps to a defined value.

use crate::record::ClinicType;

const BONE_SUPPORT_TERMS: &[&str] = &["zoledronic", "zometa", "alendronic", "adcal", "vitamin d"];

/// Keyword scan in priority order; the first rule that matches wins.
pub fn infer_clinic_type(plan: &str) -> ClinicType {
    let lower = plan.to_lowercase();
    if lower.contains("discharge") {
        ClinicType::Discharge
    } else if lower.contains("review") || lower.contains("follow-up") {
        ClinicType::FollowUp
    } else if lower.contains("consent") || lower.contains("new patient") {
        ClinicType::New
    } else if lower.contains("post rt") {
        ClinicType::PostRtReview
    } else {
        ClinicType::Other
    }
}

/// Caller's selection wins unless it is Auto-detect.
pub fn resolve_clinic_type(selected: ClinicType, plan: &str) -> ClinicType {
    match selected {
        ClinicType::AutoDetect => infer_clinic_type(plan),
        other => other,
    }
}

pub fn hormone_therapy(plan: &str) -> &'static str {
    let lower = plan.to_lowercase();
    if lower.contains("tamoxifen") {
        "Tamoxifen"
    } else if lower.contains("letrozole") {
        "Letrozole"
    } else {
        "None"
    }
}

pub fn bone_support(plan: &str) -> &'static str {
    let lower = plan.to_lowercase();
    if BONE_SUPPORT_TERMS.iter().any(|t| lower.contains(t)) {
        "Yes"
    } else {
        "No"
    }
}

pub fn endocrine_plan(plan: &str) -> &'static str {
    let lower = plan.to_lowercase();
    if lower.contains("stop") && lower.contains("tamoxifen") {
        "Stopped Tamoxifen"
    } else if lower.contains("start") && lower.contains("letrozole") {
        "Started Letrozole"
    } else if lower.contains("switch") {
        "Switched Endocrine"
    } else {
        ""
    }
}
