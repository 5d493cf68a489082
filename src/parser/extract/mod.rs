pub mod narrative;
pub mod pathology;
pub mod radiotherapy;
pub mod side_effects;

use super::classify;
use super::segment::PatientBlock;
use crate::record::{ClinicType, Field, PatientRecord};

/// A single-line extraction rule. `None` leaves the target field untouched.
pub type LineRule = fn(&str) -> Option<String>;

/// Caller-supplied values stamped on every record of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicContext {
    pub clinic_date: String,
    pub clinic_type: ClinicType,
}

fn apply_rules(record: &mut PatientRecord, line: &str, rules: &[(Field, LineRule)]) {
    for (field, rule) in rules {
        if let Some(value) = rule(line) {
            record.set(*field, value);
        }
    }
}

/// Build one record from one patient block. Pure: the same block and
/// context always give the same record.
pub fn extract_record(block: &PatientBlock, ctx: &ClinicContext) -> PatientRecord {
    let mut record = PatientRecord::new(&ctx.clinic_date, ctx.clinic_type.label());

    if let Some(first) = block.lines.first() {
        record.patient_name = narrative::patient_name(first);
    }

    for line in &block.lines {
        if pathology::applies(line) {
            apply_rules(&mut record, line, pathology::RULES);
        }
        if let Some(course) = radiotherapy::final_course(line) {
            course.apply(&mut record);
        }
        if let Some(plan) = narrative::plan_text(line) {
            record.plan = plan;
        }
        apply_rules(&mut record, line, side_effects::RULES);
    }

    let clinic_type = classify::resolve_clinic_type(ctx.clinic_type, &record.plan);
    let therapy = classify::hormone_therapy(&record.plan);
    let bone = classify::bone_support(&record.plan);
    let endocrine = classify::endocrine_plan(&record.plan);
    record.clinic_type = clinic_type.label().to_string();
    record.endocrine_therapy = therapy.to_string();
    record.bone_support = bone.to_string();
    record.endocrine_plan = endocrine.to_string();

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: &[&str]) -> PatientBlock {
        PatientBlock {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn ctx(clinic_type: ClinicType) -> ClinicContext {
        ClinicContext {
            clinic_date: "2024-03-11".to_string(),
            clinic_type,
        }
    }

    #[test]
    fn jane_doe_scenario() {
        let b = block(&[
            "Jane Doe 1234567",
            "Jane is 55 years old, IDC, 22mm, G2 (01/02/2020)",
            "Final radiotherapy 15/03/2020 - 40Gy/15 + 10Gy/5",
            "Plan: continue tamoxifen",
        ]);
        let r = extract_record(&b, &ctx(ClinicType::AutoDetect));
        assert_eq!(r.patient_name, "Jane Doe");
        assert_eq!(r.age, "55");
        assert_eq!(r.diagnosis, "IDC");
        assert_eq!(r.tumour_size, "22");
        assert_eq!(r.tumour_grade, "2");
        assert_eq!(r.surgery_date, "01/02/2020");
        assert_eq!(r.final_rt_date, "15/03/2020 ");
        assert_eq!(r.rt_course, "40Gy/15 + 10Gy/5");
        assert_eq!(r.rt_dose, "40");
        assert_eq!(r.rt_fractions, "15");
        assert_eq!(r.boost_dose, "10");
        assert_eq!(r.boost_fractions, "5");
        assert_eq!(r.endocrine_therapy, "Tamoxifen");
        assert_eq!(r.bone_support, "No");
        assert_eq!(r.endocrine_plan, "");
        assert_eq!(r.plan, "continue tamoxifen");
        assert_eq!(r.clinic_type, "Other");
        assert_eq!(r.clinic_date, "2024-03-11");
        assert_eq!(r.receptor_status, "");
        assert_eq!(r.npi, "");
    }

    #[test]
    fn auto_detect_discharge_beats_other_keywords() {
        let b = block(&["Ann Lee 55555", "Plan: review bloods, then discharge"]);
        let r = extract_record(&b, &ctx(ClinicType::AutoDetect));
        assert_eq!(r.clinic_type, "Discharge");

        let r = extract_record(&b, &ctx(ClinicType::PostRtReview));
        assert_eq!(r.clinic_type, "Post-RT Review");
    }

    #[test]
    fn defaults_when_nothing_matches() {
        let b = block(&["Ann Lee 55555"]);
        let r = extract_record(&b, &ctx(ClinicType::AutoDetect));
        assert_eq!(r.patient_name, "Ann Lee");
        assert_eq!(r.clinic_type, "Other");
        assert_eq!(r.endocrine_therapy, "None");
        assert_eq!(r.bone_support, "No");
        for f in [Field::Age, Field::Diagnosis, Field::Plan, Field::SkinSideEffects, Field::RtDose] {
            assert_eq!(r.get(f), "", "{:?}", f);
        }
    }

    #[test]
    fn later_pathology_line_overwrites() {
        let b = block(&[
            "Ann Lee 55555",
            "Referred at 60 years old, DCIS 10mm, G1",
            "Now 61 years old, re-excision G3",
        ]);
        let r = extract_record(&b, &ctx(ClinicType::New));
        assert_eq!(r.age, "61");
        assert_eq!(r.tumour_grade, "3");
        assert_eq!(r.tumour_size, "10");
        assert_eq!(r.diagnosis, "DCIS");
    }

    #[test]
    fn later_course_plan_and_side_effect_lines_win() {
        let b = block(&[
            "Ann Lee 55555",
            "Final radiotherapy 01/01/2020 - 40Gy/15 + 10Gy/5",
            "Skin: G2/4",
            "Plan: discharge on tamoxifen",
            "Final radiotherapy 15/03/2020 - 26Gy/5",
            "Final radiotherapy date to be confirmed",
            "Skin: G1/4",
            "Plan: review in 6/12, start letrozole",
        ]);
        let r = extract_record(&b, &ctx(ClinicType::AutoDetect));
        assert_eq!(r.final_rt_date, "15/03/2020 ");
        assert_eq!(r.rt_course, "26Gy/5");
        assert_eq!(r.rt_dose, "26");
        assert_eq!(r.rt_fractions, "5");
        assert_eq!(r.boost_dose, "");
        assert_eq!(r.boost_fractions, "");
        assert_eq!(r.skin_side_effects, "G1");
        assert_eq!(r.plan, "review in 6/12, start letrozole");
        assert_eq!(r.clinic_type, "Follow-Up");
        assert_eq!(r.endocrine_therapy, "Letrozole");
        assert_eq!(r.endocrine_plan, "Started Letrozole");
    }

    #[test]
    fn pathology_rules_need_years_old() {
        let b = block(&["Ann Lee 55555", "IDC G2 22mm, NPI: 3.4"]);
        let r = extract_record(&b, &ctx(ClinicType::New));
        assert_eq!(r.diagnosis, "");
        assert_eq!(r.npi, "");
    }

    #[test]
    fn side_effects_and_plan_classifiers() {
        let b = block(&[
            "Bea Ray 7777777 JS",
            "Skin: Grade 1/3",
            "Pain: none/10",
            "Fatigue: mild",
            "On letrozole which causes joint aches",
            "Plan: Stop tamoxifen, start letrozole and Adcal-D3",
        ]);
        let r = extract_record(&b, &ctx(ClinicType::AutoDetect));
        assert_eq!(r.skin_side_effects, "Grade 1");
        assert_eq!(r.pain_side_effects, "none");
        assert_eq!(r.fatigue_side_effects, "mild");
        assert_eq!(r.hormone_side_effects, "causes joint aches");
        assert_eq!(r.endocrine_plan, "Stopped Tamoxifen");
        assert_eq!(r.endocrine_therapy, "Tamoxifen");
        assert_eq!(r.bone_support, "Yes");
    }

    #[test]
    fn extraction_is_idempotent() {
        let b = block(&[
            "Jane Doe 1234567",
            "55 years old, IDC, ER 8, HER2 negative",
            "Plan: follow-up",
        ]);
        let c = ctx(ClinicType::AutoDetect);
        assert_eq!(extract_record(&b, &c), extract_record(&b, &c));
    }
}
