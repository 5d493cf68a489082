use std::sync::LazyLock;

use regex::Regex;

use crate::record::PatientRecord;

const PREFIX: &str = "Final radiotherapy";
const DASHES: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

static DOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+\.?\d*)Gy/(\d+)").unwrap());
static BOOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\s*(\d+\.?\d*)Gy/(\d+)").unwrap());

/// Values pulled from a `Final radiotherapy <date> - <course>` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalCourse {
    pub final_date: String,
    pub course: String,
    pub dose: Option<(String, String)>,
    pub boost: Option<(String, String)>,
}

impl FinalCourse {
    /// Overwrites all six RT fields; a missing dose or boost clears them.
    pub fn apply(self, record: &mut PatientRecord) {
        let (dose, fractions) = self.dose.unwrap_or_default();
        let (boost_dose, boost_fractions) = self.boost.unwrap_or_default();
        record.final_rt_date = self.final_date;
        record.rt_course = self.course;
        record.rt_dose = dose;
        record.rt_fractions = fractions;
        record.boost_dose = boost_dose;
        record.boost_fractions = boost_fractions;
    }
}

/// The date keeps its trailing whitespace; only the segment between the
/// first and second dash is treated as the course narrative.
pub fn final_course(line: &str) -> Option<FinalCourse> {
    if !line.starts_with(PREFIX) {
        return None;
    }
    let mut parts = line.split(DASHES);
    let head = parts.next()?;
    let course = parts.next()?.trim().to_string();

    Some(FinalCourse {
        final_date: head.replace(PREFIX, "").trim_start().to_string(),
        dose: dose_fractions(&course),
        boost: boost_fractions(&course),
        course,
    })
}

/// First `<dose>Gy/<fractions>` in the course text.
pub fn dose_fractions(course: &str) -> Option<(String, String)> {
    DOSE_RE
        .captures(course)
        .map(|c| (c[1].to_string(), c[2].to_string()))
}

/// Boost course, written as `+ <dose>Gy/<fractions>`.
pub fn boost_fractions(course: &str) -> Option<(String, String)> {
    BOOST_RE
        .captures(course)
        .map(|c| (c[1].to_string(), c[2].to_string()))
}
