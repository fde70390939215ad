//! Flat CSV of raw responses, in catalog order.
//!
//! Columns match the response sheet, so an export can be fed back in.

use crate::Response;
use anyhow::Result;

pub fn responses_to_csv(responses: &[Response]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["area", "question", "answer", "observation"])?;
    for r in responses {
        writer.write_record([
            r.area.as_str(),
            r.prompt.as_str(),
            &r.answer.to_string(),
            r.observation.as_str(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
