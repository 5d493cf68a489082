use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One patient's row in the audit table. Every field is a string and `""`
/// means "not found"; nothing here is ever null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "Clinic Date", default)]
    pub clinic_date: String,
    #[serde(rename = "Clinic Type", default)]
    pub clinic_type: String,
    #[serde(rename = "Patient Name", default)]
    pub patient_name: String,
    #[serde(rename = "Age", default)]
    pub age: String,
    #[serde(rename = "Diagnosis", default)]
    pub diagnosis: String,
    #[serde(rename = "Surgery Date", default)]
    pub surgery_date: String,
    #[serde(rename = "Tumour Size (mm)", default)]
    pub tumour_size: String,
    #[serde(rename = "Tumour Grade", default)]
    pub tumour_grade: String,
    #[serde(rename = "ER/PR/HER2", default)]
    pub receptor_status: String,
    #[serde(rename = "NPI", default)]
    pub npi: String,
    #[serde(rename = "RT Course & Dose", default)]
    pub rt_course: String,
    #[serde(rename = "RT Dose (Gy)", default)]
    pub rt_dose: String,
    #[serde(rename = "RT Fractions", default)]
    pub rt_fractions: String,
    #[serde(rename = "Boost Dose (Gy)", default)]
    pub boost_dose: String,
    #[serde(rename = "Boost Fractions", default)]
    pub boost_fractions: String,
    #[serde(rename = "Endocrine Therapy", default)]
    pub endocrine_therapy: String,
    #[serde(rename = "Endocrine Plan", default)]
    pub endocrine_plan: String,
    #[serde(rename = "Bone Health Support", default)]
    pub bone_support: String,
    #[serde(rename = "Final RT Date", default)]
    pub final_rt_date: String,
    #[serde(rename = "Skin Side Effects", default)]
    pub skin_side_effects: String,
    #[serde(rename = "Pain Side Effects", default)]
    pub pain_side_effects: String,
    #[serde(rename = "Fatigue Side Effects", default)]
    pub fatigue_side_effects: String,
    #[serde(rename = "Hormone Side Effects", default)]
    pub hormone_side_effects: String,
    #[serde(rename = "Plan", default)]
    pub plan: String,
}

/// Column identifiers, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ClinicDate,
    ClinicType,
    PatientName,
    Age,
    Diagnosis,
    SurgeryDate,
    TumourSize,
    TumourGrade,
    ReceptorStatus,
    Npi,
    RtCourse,
    RtDose,
    RtFractions,
    BoostDose,
    BoostFractions,
    EndocrineTherapy,
    EndocrinePlan,
    BoneSupport,
    FinalRtDate,
    SkinSideEffects,
    PainSideEffects,
    FatigueSideEffects,
    HormoneSideEffects,
    Plan,
}

impl Field {
    pub const ALL: [Field; 24] = [
        Field::ClinicDate,
        Field::ClinicType,
        Field::PatientName,
        Field::Age,
        Field::Diagnosis,
        Field::SurgeryDate,
        Field::TumourSize,
        Field::TumourGrade,
        Field::ReceptorStatus,
        Field::Npi,
        Field::RtCourse,
        Field::RtDose,
        Field::RtFractions,
        Field::BoostDose,
        Field::BoostFractions,
        Field::EndocrineTherapy,
        Field::EndocrinePlan,
        Field::BoneSupport,
        Field::FinalRtDate,
        Field::SkinSideEffects,
        Field::PainSideEffects,
        Field::FatigueSideEffects,
        Field::HormoneSideEffects,
        Field::Plan,
    ];

    /// Spreadsheet header, matching the serde renames above.
    pub fn header(self) -> &'static str {
        match self {
            Field::ClinicDate => "Clinic Date",
            Field::ClinicType => "Clinic Type",
            Field::PatientName => "Patient Name",
            Field::Age => "Age",
            Field::Diagnosis => "Diagnosis",
            Field::SurgeryDate => "Surgery Date",
            Field::TumourSize => "Tumour Size (mm)",
            Field::TumourGrade => "Tumour Grade",
            Field::ReceptorStatus => "ER/PR/HER2",
            Field::Npi => "NPI",
            Field::RtCourse => "RT Course & Dose",
            Field::RtDose => "RT Dose (Gy)",
            Field::RtFractions => "RT Fractions",
            Field::BoostDose => "Boost Dose (Gy)",
            Field::BoostFractions => "Boost Fractions",
            Field::EndocrineTherapy => "Endocrine Therapy",
            Field::EndocrinePlan => "Endocrine Plan",
            Field::BoneSupport => "Bone Health Support",
            Field::FinalRtDate => "Final RT Date",
            Field::SkinSideEffects => "Skin Side Effects",
            Field::PainSideEffects => "Pain Side Effects",
            Field::FatigueSideEffects => "Fatigue Side Effects",
            Field::HormoneSideEffects => "Hormone Side Effects",
            Field::Plan => "Plan",
        }
    }

    /// SQL column name.
    pub fn column(self) -> &'static str {
        match self {
            Field::ClinicDate => "clinic_date",
            Field::ClinicType => "clinic_type",
            Field::PatientName => "patient_name",
            Field::Age => "age",
            Field::Diagnosis => "diagnosis",
            Field::SurgeryDate => "surgery_date",
            Field::TumourSize => "tumour_size",
            Field::TumourGrade => "tumour_grade",
            Field::ReceptorStatus => "receptor_status",
            Field::Npi => "npi",
            Field::RtCourse => "rt_course",
            Field::RtDose => "rt_dose",
            Field::RtFractions => "rt_fractions",
            Field::BoostDose => "boost_dose",
            Field::BoostFractions => "boost_fractions",
            Field::EndocrineTherapy => "endocrine_therapy",
            Field::EndocrinePlan => "endocrine_plan",
            Field::BoneSupport => "bone_support",
            Field::FinalRtDate => "final_rt_date",
            Field::SkinSideEffects => "skin_side_effects",
            Field::PainSideEffects => "pain_side_effects",
            Field::FatigueSideEffects => "fatigue_side_effects",
            Field::HormoneSideEffects => "hormone_side_effects",
            Field::Plan => "plan",
        }
    }
}

impl PatientRecord {
    /// Fresh record carrying only the caller-supplied clinic date and type.
    pub fn new(clinic_date: &str, clinic_type: &str) -> Self {
        PatientRecord {
            clinic_date: clinic_date.to_string(),
            clinic_type: clinic_type.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ClinicDate => &self.clinic_date,
            Field::ClinicType => &self.clinic_type,
            Field::PatientName => &self.patient_name,
            Field::Age => &self.age,
            Field::Diagnosis => &self.diagnosis,
            Field::SurgeryDate => &self.surgery_date,
            Field::TumourSize => &self.tumour_size,
            Field::TumourGrade => &self.tumour_grade,
            Field::ReceptorStatus => &self.receptor_status,
            Field::Npi => &self.npi,
            Field::RtCourse => &self.rt_course,
            Field::RtDose => &self.rt_dose,
            Field::RtFractions => &self.rt_fractions,
            Field::BoostDose => &self.boost_dose,
            Field::BoostFractions => &self.boost_fractions,
            Field::EndocrineTherapy => &self.endocrine_therapy,
            Field::EndocrinePlan => &self.endocrine_plan,
            Field::BoneSupport => &self.bone_support,
            Field::FinalRtDate => &self.final_rt_date,
            Field::SkinSideEffects => &self.skin_side_effects,
            Field::PainSideEffects => &self.pain_side_effects,
            Field::FatigueSideEffects => &self.fatigue_side_effects,
            Field::HormoneSideEffects => &self.hormone_side_effects,
            Field::Plan => &self.plan,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::ClinicDate => &mut self.clinic_date,
            Field::ClinicType => &mut self.clinic_type,
            Field::PatientName => &mut self.patient_name,
            Field::Age => &mut self.age,
            Field::Diagnosis => &mut self.diagnosis,
            Field::SurgeryDate => &mut self.surgery_date,
            Field::TumourSize => &mut self.tumour_size,
            Field::TumourGrade => &mut self.tumour_grade,
            Field::ReceptorStatus => &mut self.receptor_status,
            Field::Npi => &mut self.npi,
            Field::RtCourse => &mut self.rt_course,
            Field::RtDose => &mut self.rt_dose,
            Field::RtFractions => &mut self.rt_fractions,
            Field::BoostDose => &mut self.boost_dose,
            Field::BoostFractions => &mut self.boost_fractions,
            Field::EndocrineTherapy => &mut self.endocrine_therapy,
            Field::EndocrinePlan => &mut self.endocrine_plan,
            Field::BoneSupport => &mut self.bone_support,
            Field::FinalRtDate => &mut self.final_rt_date,
            Field::SkinSideEffects => &mut self.skin_side_effects,
            Field::PainSideEffects => &mut self.pain_side_effects,
            Field::FatigueSideEffects => &mut self.fatigue_side_effects,
            Field::HormoneSideEffects => &mut self.hormone_side_effects,
            Field::Plan => &mut self.plan,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Master Table dedup key: (patient name, surgery date, clinic date).
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.patient_name, &self.surgery_date, &self.clinic_date)
    }
}

/// Clinic type as selected by the caller. `AutoDetect` defers to the plan text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClinicType {
    AutoDetect,
    New,
    FollowUp,
    PostRtReview,
    Discharge,
    Other,
}

impl ClinicType {
    pub const ALL: [ClinicType; 6] = [
        ClinicType::AutoDetect,
        ClinicType::New,
        ClinicType::FollowUp,
        ClinicType::PostRtReview,
        ClinicType::Discharge,
        ClinicType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClinicType::AutoDetect => "Auto-detect",
            ClinicType::New => "New",
            ClinicType::FollowUp => "Follow-Up",
            ClinicType::PostRtReview => "Post-RT Review",
            ClinicType::Discharge => "Discharge",
            ClinicType::Other => "Other",
        }
    }
}

impl fmt::Display for ClinicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClinicType {
    type Err = String;

    /// Accepts the display labels case-insensitively, plus kebab forms
    /// (`post-rt-review`) for shell convenience.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        ClinicType::ALL
            .into_iter()
            .find(|t| normalize_label(t.label()) == wanted)
            .ok_or_else(|| {
                let labels: Vec<&str> = ClinicType::ALL.iter().map(|t| t.label()).collect();
                format!("unknown clinic type '{}' (expected one of: {})", s, labels.join(", "))
            })
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect()
}
