use crate::domain::model::{PartRef, SampleRequest, SampleRequestType};
use crate::utils::error::{IceError, Result};

pub const GROWTH_TEMPERATURES: [u8; 2] = [30, 37];

/// Standard growth media offered for plated requests. `Other` takes free text.
pub const PLATE_DESCRIPTIONS: &[&str] = &[
    "LB",
    "LB Apr50",
    "LB Carb100",
    "LB Chlor25",
    "LB Gent30 Kan50 Rif100",
    "LB Kan50",
    "LB Kan50 Rif100 Tet 5",
    "LB Spect100",
    "YPD 1000",
    "CSM -HIS",
    "CSM -HIS -LEU -URA",
    "CSM -LEU",
    "CSM -TRP",
    "CSM -URA",
    "1/2 MS Hygro50",
    "Other",
];

pub const OTHER_PLATE_DESCRIPTION: &str = "Other";

/// User input for an "add to cart" request before it is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    pub request_type: Option<SampleRequestType>,
    pub growth_temperature: u8,
    pub plate_description: Option<String>,
    pub plate_description_text: Option<String>,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            request_type: None,
            growth_temperature: GROWTH_TEMPERATURES[0],
            plate_description: Some(PLATE_DESCRIPTIONS[0].to_string()),
            plate_description_text: None,
        }
    }
}

impl RequestForm {
    /// Mirrors the disabled state of the submit button.
    pub fn is_complete(&self) -> bool {
        self.resolved_description().is_some() && self.request_type.is_some()
    }

    fn resolved_description(&self) -> Option<String> {
        let chosen = self.plate_description.as_deref()?;
        if chosen == OTHER_PLATE_DESCRIPTION {
            self.plate_description_text
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        } else {
            Some(chosen.to_string())
        }
    }

    pub fn build(&self, part_id: i64) -> Result<SampleRequest> {
        let request_type = self.request_type.ok_or_else(|| IceError::ValidationError {
            message: "Select a sample type".to_string(),
        })?;

        if !GROWTH_TEMPERATURES.contains(&self.growth_temperature) {
            return Err(IceError::ValidationError {
                message: format!(
                    "Growth temperature must be one of {:?}, got {}",
                    GROWTH_TEMPERATURES, self.growth_temperature
                ),
            });
        }

        if let Some(chosen) = self.plate_description.as_deref() {
            if !PLATE_DESCRIPTIONS.contains(&chosen) {
                return Err(IceError::ValidationError {
                    message: format!("Unknown plate description: {}", chosen),
                });
            }
        }

        let plate_description = self.resolved_description().ok_or_else(|| IceError::ValidationError {
            message: "Describe the plate when choosing Other".to_string(),
        })?;

        Ok(SampleRequest {
            request_type,
            growth_temperature: self.growth_temperature,
            part_data: PartRef { id: part_id },
            plate_description,
        })
    }
}
