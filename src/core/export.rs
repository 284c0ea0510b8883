use crate::domain::model::{LocationType, Sample};
use crate::domain::plate::PlateGeometry;
use crate::utils::error::{IceError, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct PlateMapRow<'a> {
    sample_id: Option<i64>,
    label: &'a str,
    cell_code: Option<String>,
    well: Option<String>,
    tube_barcode: Option<&'a str>,
    addgene_id: Option<&'a str>,
    depositor: &'a str,
}

impl<'a> PlateMapRow<'a> {
    fn from_sample(sample: &'a Sample, geometry: PlateGeometry) -> Self {
        let code = sample.code.filter(|code| geometry.contains(*code));
        Self {
            sample_id: sample.id,
            label: &sample.label,
            cell_code: code.map(|code| code.to_string()),
            well: code.map(|code| code.coordinate().well_name()),
            tube_barcode: sample
                .find_location(&LocationType::Tube)
                .map(|node| node.display.as_str()),
            addgene_id: sample
                .find_location(&LocationType::AddGene)
                .map(|node| node.display.as_str()),
            depositor: &sample.depositor.email,
        }
    }
}

/// Writes one CSV row per sample. Codes outside `geometry` are left blank.
pub fn write_plate_map<W: Write>(writer: W, samples: &[Sample], geometry: PlateGeometry) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for sample in samples {
        csv_writer.serialize(PlateMapRow::from_sample(sample, geometry))?;
    }
    csv_writer.flush()?;
    tracing::debug!("Exported {} samples to plate map", samples.len());
    Ok(())
}

pub fn plate_map_csv(samples: &[Sample], geometry: PlateGeometry) -> Result<String> {
    let mut buffer = Vec::new();
    write_plate_map(&mut buffer, samples, geometry)?;
    String::from_utf8(buffer).map_err(|e| IceError::ValidationError {
        message: format!("Plate map is not valid UTF-8: {}", e),
    })
}
