pub mod classify;
pub mod extract;
pub mod segment;

use tracing::{debug, warn};

use crate::record::PatientRecord;
use extract::ClinicContext;

/// Two-pass pipeline: paragraphs → patient blocks → records, in block order.
pub fn parse_paragraphs<S: AsRef<str>>(paragraphs: &[S], ctx: &ClinicContext) -> Vec<PatientRecord> {
    let blocks = segment::segment(paragraphs);
    debug!(
        paragraphs = paragraphs.len(),
        blocks = blocks.len(),
        "segmented clinic document"
    );

    blocks
        .iter()
        .map(|block| {
            let record = extract::extract_record(block, ctx);
            if record.patient_name.is_empty() {
                warn!(start_line = %block.lines[0], "no hospital number token; patient name left empty");
            }
            record
        })
        .collect()
}
