//! Regulation summaries derived from district records

use serde::{Deserialize, Serialize};

use super::types::{Setbacks, ZoningDistrict};

/// FAR at or above which a sky exposure plane applies
const SKY_EXPOSURE_FAR: f64 = 3.0;
const SKY_EXPOSURE_PLANE: &str = "60 ft above street line, then 2.7 to 1 slope";

const COMMERCIAL_USES: &[&str] = &["Commercial", "Retail", "Office", "Mixed-Use", "Restaurant"];
const COMMUNITY_USES: &[&str] = &[
    "Community Facility",
    "Civic",
    "Educational",
    "Institutional",
    "Religious",
    "Cultural",
    "Governmental",
];

/// Height and bulk controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightAndBulk {
    #[serde(rename = "maxFAR")]
    pub max_far: f64,
    pub max_height: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sky_exposure_plane: Option<String>,
}

/// Regulations summary for one district code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningRegulations {
    /// District code
    pub id: String,
    /// "<code> - <description>"
    pub name: String,
    pub general_provisions: Vec<String>,
    pub height_and_bulk: HeightAndBulk,
    /// Setbacks phrased as minimums ("10 ft minimum")
    pub setbacks: Setbacks,
    pub parking_requirements: String,
    pub source: String,
}

impl ZoningRegulations {
    /// Derive the summary from a district record
    #[must_use]
    pub fn from_district(district: &ZoningDistrict) -> Self {
        let minimum = |s: &str| format!("{s} minimum");

        Self {
            id: district.district.clone(),
            name: format!("{} - {}", district.district, district.description),
            general_provisions: provisions(district),
            height_and_bulk: HeightAndBulk {
                max_far: district.far,
                max_height: district.max_height.clone(),
                sky_exposure_plane: (district.far >= SKY_EXPOSURE_FAR)
                    .then(|| SKY_EXPOSURE_PLANE.to_string()),
            },
            setbacks: Setbacks::new(
                minimum(&district.setbacks.front),
                minimum(&district.setbacks.side),
                minimum(&district.setbacks.rear),
            ),
            parking_requirements: district.parking_requirements.clone(),
            source: district.source.clone(),
        }
    }
}

fn provisions(district: &ZoningDistrict) -> Vec<String> {
    let allows = |set: &[&str]| district.allowed_uses.iter().any(|u| set.contains(&u.as_str()));

    let mut out = vec![format!(
        "Permitted uses: {}",
        district.allowed_uses.join(", ")
    )];

    if allows(COMMUNITY_USES) {
        out.push("Community facilities are permitted as-of-right".into());
    }
    if allows(COMMERCIAL_USES) {
        out.push("Commercial uses are permitted".into());
    } else {
        out.push("Commercial uses are not permitted".into());
    }
    if let Some(overlays) = &district.overlays {
        for overlay in overlays {
            out.push(format!("Subject to {overlay} overlay requirements"));
        }
    }
    out
}
