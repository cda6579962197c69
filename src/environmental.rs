//! Environmental data generators
//!
//! Climate, solar and flood-risk summaries for a coordinate. All values are
//! illustrative: palette entries are picked by a coordinate seed and the
//! remaining figures are fixed reference values or simple latitude formulas.
//! Identical coordinates always produce identical output.

use serde::{Deserialize, Serialize};

use crate::zoning::{coordinate_key, Coordinate};

/// Latitude used when a coordinate is unusable (New York City)
pub const REFERENCE_LATITUDE: f64 = 40.7128;

/// Earth's axial tilt in degrees
const AXIAL_TILT: f64 = 23.44;

const CLIMATES: [&str; 4] = ["Humid subtropical", "Mediterranean", "Continental", "Arid"];
const WINDS: [&str; 4] = ["SW", "NE", "NW", "SE"];
const FLOOD_ZONES: [&str; 4] = ["Zone X", "Zone A", "Zone B", "Zone C"];
const SOILS: [&str; 4] = ["Sandy loam", "Clay", "Silt", "Loam"];

/// Seed derived from a coordinate for palette selection
#[must_use]
pub fn environment_seed(coord: Coordinate) -> u64 {
    coordinate_key(coord).unsigned_abs()
}

#[allow(clippy::cast_possible_truncation)]
fn pick<const N: usize>(palette: &[&'static str; N], seed: u64) -> &'static str {
    palette[(seed % N as u64) as usize]
}

/// Climate classification for a seed
#[must_use]
pub fn climate_classification(seed: u64) -> &'static str {
    pick(&CLIMATES, seed)
}

/// Prevailing wind direction for a seed
#[must_use]
pub fn prevailing_wind(seed: u64) -> &'static str {
    pick(&WINDS, seed)
}

/// FEMA-style flood zone for a seed
#[must_use]
pub fn flood_zone(seed: u64) -> &'static str {
    pick(&FLOOD_ZONES, seed)
}

/// Soil type for a seed
#[must_use]
pub fn soil_type(seed: u64) -> &'static str {
    pick(&SOILS, seed)
}

/// Annual sun hours for a seed
#[must_use]
pub fn annual_sun_hours(seed: u64) -> u32 {
    // seed % 1000 < 1000, fits in u32
    2000 + u32::try_from(seed % 1000).unwrap_or(0)
}

fn usable_latitude(coord: Coordinate) -> f64 {
    if coord.lat.is_finite() {
        coord.lat.clamp(-90.0, 90.0)
    } else {
        REFERENCE_LATITUDE
    }
}

/// Seasonal average temperatures (degrees F)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageTemperatures {
    pub annual: f64,
    pub summer: f64,
    pub winter: f64,
}

/// Climate summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateData {
    pub climate: String,
    pub climate_zone: String,
    pub annual_sun_hours: u32,
    /// Inches per year
    pub annual_precipitation: f64,
    pub average_temperatures: AverageTemperatures,
    pub prevailing_winds: String,
    pub heating_degree_days: u32,
    pub cooling_degree_days: u32,
}

/// ASHRAE climate zone from absolute latitude
fn ashrae_zone(lat: f64) -> &'static str {
    match lat.abs() {
        l if l < 25.0 => "ASHRAE 1A",
        l if l < 30.0 => "ASHRAE 2A",
        l if l < 36.0 => "ASHRAE 3A",
        l if l < 41.0 => "ASHRAE 4A",
        l if l < 45.0 => "ASHRAE 5A",
        l if l < 50.0 => "ASHRAE 6A",
        l if l < 60.0 => "ASHRAE 7",
        _ => "ASHRAE 8",
    }
}

/// Climate summary for a coordinate
#[must_use]
pub fn climate(coord: Coordinate) -> ClimateData {
    let seed = environment_seed(coord);
    ClimateData {
        climate: climate_classification(seed).to_string(),
        climate_zone: ashrae_zone(usable_latitude(coord)).to_string(),
        annual_sun_hours: annual_sun_hours(seed),
        annual_precipitation: 49.9,
        average_temperatures: AverageTemperatures {
            annual: 55.7,
            summer: 76.5,
            winter: 35.2,
        },
        prevailing_winds: prevailing_wind(seed).to_string(),
        heating_degree_days: 4750,
        cooling_degree_days: 1289,
    }
}

/// Sun position summary for one solstice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolsticeDay {
    /// Local solar time, "HH:MM"
    pub sunrise_time: String,
    /// Local solar time, "HH:MM"
    pub sunset_time: String,
    pub daylight_hours: f64,
    /// Degrees above the horizon at solar noon
    pub noon_sun_angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolsticeData {
    pub summer: SolsticeDay,
    pub winter: SolsticeDay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvPotential {
    /// kWh per kW installed per year
    pub annual_production: u32,
    pub optimal_orientation: String,
    /// Years
    pub payback_period: f64,
}

/// Solar exposure summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarData {
    /// Percent
    pub solar_exposure: u32,
    /// kWh/m²/day
    pub annual_solar_radiation: f64,
    /// Degrees
    pub optimal_roof_angle: f64,
    pub solstice_data: SolsticeData,
    pub pv_potential: PvPotential,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Hours of daylight at a latitude for a solar declination (degrees)
fn daylight_hours(lat: f64, declination: f64) -> f64 {
    let cos_hour_angle = -(lat.to_radians().tan() * declination.to_radians().tan());
    let hour_angle = cos_hour_angle.clamp(-1.0, 1.0).acos().to_degrees();
    2.0 * hour_angle / 15.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clock(hours: f64) -> String {
    let minutes = (hours * 60.0).round().clamp(0.0, 24.0 * 60.0) as u32;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn solstice_day(lat: f64, declination: f64) -> SolsticeDay {
    let daylight = daylight_hours(lat, declination);
    SolsticeDay {
        sunrise_time: clock(12.0 - daylight / 2.0),
        sunset_time: clock(12.0 + daylight / 2.0),
        daylight_hours: round1(daylight),
        noon_sun_angle: round1((90.0 - (lat - declination).abs()).clamp(0.0, 90.0)),
    }
}

/// Solar summary for a coordinate
#[must_use]
pub fn solar(coord: Coordinate) -> SolarData {
    let lat = usable_latitude(coord);
    // Seasons flip south of the equator.
    let (summer_decl, winter_decl) = if lat >= 0.0 {
        (AXIAL_TILT, -AXIAL_TILT)
    } else {
        (-AXIAL_TILT, AXIAL_TILT)
    };

    SolarData {
        solar_exposure: 75,
        annual_solar_radiation: 4.2,
        optimal_roof_angle: lat.abs().round(),
        solstice_data: SolsticeData {
            summer: solstice_day(lat, summer_decl),
            winter: solstice_day(lat, winter_decl),
        },
        pv_potential: PvPotential {
            annual_production: 1350,
            optimal_orientation: if lat >= 0.0 { "South" } else { "North" }.to_string(),
            payback_period: 8.5,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalFlooding {
    pub events: u32,
    /// ISO date of the most recent event
    pub last_event: String,
    /// Feet
    pub max_recorded_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeaLevelRiseImpact {
    pub current: String,
    pub by2050: String,
    pub by2100: String,
}

/// Flood risk summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodRiskData {
    pub flood_zone: String,
    pub flood_zone_description: String,
    /// Feet above sea level, when a base flood elevation is published
    pub base_flood_elevation: Option<f64>,
    /// Percent chance per year
    pub annual_flood_risk: f64,
    pub historical_flooding: HistoricalFlooding,
    pub sea_level_rise_impact: SeaLevelRiseImpact,
    pub recommended_actions: Vec<String>,
}

/// Flood risk summary for a coordinate
#[must_use]
pub fn flood_risk(coord: Coordinate) -> FloodRiskData {
    let zone = flood_zone(environment_seed(coord));
    let (description, annual_risk) = match zone {
        "Zone A" => ("Special flood hazard area (1% annual chance)", 1.0),
        "Zone B" => ("Moderate flood hazard area (0.2% annual chance)", 0.5),
        _ => ("Area of minimal flood hazard", 0.2),
    };

    let mut actions = vec![
        "Standard stormwater management practices".to_string(),
        "Consider raised electrical systems".to_string(),
        "Implement permeable surfaces to reduce runoff".to_string(),
    ];
    if zone == "Zone A" {
        actions.push("Elevate lowest floor above base flood elevation".to_string());
        actions.push("Obtain flood insurance".to_string());
    }

    FloodRiskData {
        flood_zone: zone.to_string(),
        flood_zone_description: description.to_string(),
        base_flood_elevation: None,
        annual_flood_risk: annual_risk,
        historical_flooding: HistoricalFlooding {
            events: 2,
            last_event: "2012-10-29".to_string(),
            max_recorded_depth: 0.5,
        },
        sea_level_rise_impact: SeaLevelRiseImpact {
            current: "None".to_string(),
            by2050: "Minimal".to_string(),
            by2100: "Moderate".to_string(),
        },
        recommended_actions: actions,
    }
}
