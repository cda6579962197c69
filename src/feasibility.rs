//! Construction cost and feasibility estimation
//!
//! Simple formula-based estimates: a per-square-foot base cost scaled by
//! location and building type, soft costs and contingency on top, and a
//! revenue model producing NOI, ROI and payback. Three scenarios bracket
//! the base case.

use serde::{Deserialize, Serialize};

use crate::error::FeasibilityError;

/// Location label used when none is given
pub const DEFAULT_LOCATION: &str = "National Average";

/// Building type used when none is given
pub const DEFAULT_BUILDING_TYPE: &str = "Residential";

const QUALITY_LEVELS: [&str; 4] = [
    "Basic (Code minimum)",
    "Standard (Market rate)",
    "Premium (High-end finishes)",
    "Luxury (Custom details)",
];

const SOFT_COST_RATE: f64 = 0.25;
const CONTINGENCY_RATE: f64 = 0.10;
const OPERATING_COST_RATE: f64 = 0.35;
const CAP_RATE: f64 = 0.05;

/// Calculator inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInputs {
    /// Gross building area in square feet
    pub building_size: f64,
    /// 0 = basic .. 3 = luxury
    pub quality_level: u8,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
}

impl CostInputs {
    /// Create inputs with default location and building type
    #[must_use]
    pub fn new(building_size: f64, quality_level: u8) -> Self {
        Self {
            building_size,
            quality_level,
            location: None,
            building_type: None,
        }
    }

    /// Set the location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the building type
    #[must_use]
    pub fn with_building_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }

    fn validate(&self) -> Result<(), FeasibilityError> {
        if !self.building_size.is_finite() || self.building_size <= 0.0 {
            return Err(FeasibilityError::InvalidBuildingSize(self.building_size));
        }
        if usize::from(self.quality_level) >= QUALITY_LEVELS.len() {
            return Err(FeasibilityError::InvalidQualityLevel(self.quality_level));
        }
        Ok(())
    }
}

/// Inputs echoed back with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInputs {
    pub building_size: f64,
    pub quality_level: String,
    pub location: String,
    pub building_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub base_cost_per_sq_ft: f64,
    pub adjusted_cost_per_sq_ft: f64,
    pub total_construction_cost: f64,
    pub soft_costs: f64,
    pub contingency: f64,
    pub total_project_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub estimated_annual_revenue: f64,
    pub annual_operating_costs: f64,
    pub net_operating_income: f64,
    pub property_value: f64,
    /// Percent
    pub roi: f64,
    /// Years
    pub payback_period: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub total_cost: f64,
    pub roi: f64,
    pub payback_period: f64,
}

impl Scenario {
    fn scaled(&self, cost: f64, roi: f64, payback: f64) -> Self {
        Self {
            total_cost: self.total_cost * cost,
            roi: self.roi * roi,
            payback_period: self.payback_period * payback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenarios {
    pub base: Scenario,
    pub optimistic: Scenario,
    pub conservative: Scenario,
}

/// Full estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub inputs: ResolvedInputs,
    pub costs: CostBreakdown,
    pub financials: Financials,
    pub scenarios: Scenarios,
}

fn location_multiplier(location: &str) -> f64 {
    match location {
        "New York" => 1.5,
        "San Francisco" => 1.7,
        "Chicago" => 1.2,
        _ => 1.0,
    }
}

fn type_multiplier(building_type: &str) -> f64 {
    match building_type {
        "Commercial" => 1.2,
        "Mixed-Use" => 1.15,
        _ => 1.0,
    }
}

/// Estimate costs and returns for a building
///
/// # Errors
///
/// Returns `FeasibilityError` if the building size is not a positive finite
/// number or the quality level is outside 0-3.
pub fn calculate_costs(inputs: &CostInputs) -> Result<CostEstimate, FeasibilityError> {
    inputs.validate()?;

    let location = inputs.location.as_deref().unwrap_or(DEFAULT_LOCATION);
    let building_type = inputs
        .building_type
        .as_deref()
        .unwrap_or(DEFAULT_BUILDING_TYPE);
    let size = inputs.building_size;
    let location_mult = location_multiplier(location);

    let base_cost_per_sq_ft = 250.0 + f64::from(inputs.quality_level) * 50.0;
    let adjusted_cost_per_sq_ft = base_cost_per_sq_ft * location_mult * type_multiplier(building_type);
    let total_construction_cost = size * adjusted_cost_per_sq_ft;
    let soft_costs = total_construction_cost * SOFT_COST_RATE;
    let contingency = total_construction_cost * CONTINGENCY_RATE;
    let total_project_cost = total_construction_cost + soft_costs + contingency;

    // Keyed off the defaulted type: an omitted type earns the residential rate
    let rent_per_sq_ft = if building_type == "Residential" { 30.0 } else { 45.0 };
    let estimated_annual_revenue = size * rent_per_sq_ft * location_mult;
    let annual_operating_costs = estimated_annual_revenue * OPERATING_COST_RATE;
    let net_operating_income = estimated_annual_revenue - annual_operating_costs;
    let roi = net_operating_income / total_project_cost * 100.0;
    let payback_period = total_project_cost / net_operating_income;

    let base = Scenario {
        total_cost: total_project_cost,
        roi,
        payback_period,
    };

    Ok(CostEstimate {
        inputs: ResolvedInputs {
            building_size: size,
            quality_level: QUALITY_LEVELS[usize::from(inputs.quality_level)].to_string(),
            location: location.to_string(),
            building_type: building_type.to_string(),
        },
        costs: CostBreakdown {
            base_cost_per_sq_ft,
            adjusted_cost_per_sq_ft,
            total_construction_cost,
            soft_costs,
            contingency,
            total_project_cost,
        },
        financials: Financials {
            estimated_annual_revenue,
            annual_operating_costs,
            net_operating_income,
            property_value: net_operating_income / CAP_RATE,
            roi,
            payback_period,
        },
        scenarios: Scenarios {
            base,
            optimistic: base.scaled(0.95, 1.2, 0.85),
            conservative: base.scaled(1.1, 0.8, 1.25),
        },
    })
}

/// National cost index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalIndex {
    pub average: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalIndex {
    pub region: String,
    pub index: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityIndex {
    pub city: String,
    pub index: f64,
    pub trend: String,
}

/// Construction cost indices relative to the national average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostIndices {
    pub national: NationalIndex,
    pub regional: Vec<RegionalIndex>,
    pub cities: Vec<CityIndex>,
}

/// Current construction cost indices
#[must_use]
pub fn cost_indices() -> CostIndices {
    let regional = [
        ("Northeast", 1.35, "+3.2% YoY"),
        ("Midwest", 0.95, "+1.8% YoY"),
        ("South", 0.85, "+2.1% YoY"),
        ("West", 1.25, "+3.5% YoY"),
    ];
    let cities = [
        ("New York", 1.5, "+3.8% YoY"),
        ("Chicago", 1.2, "+2.0% YoY"),
        ("Los Angeles", 1.3, "+3.2% YoY"),
        ("Houston", 0.9, "+1.5% YoY"),
        ("Miami", 1.1, "+2.7% YoY"),
        ("San Francisco", 1.7, "+4.1% YoY"),
        ("Denver", 1.15, "+3.0% YoY"),
        ("Seattle", 1.25, "+3.5% YoY"),
    ];

    CostIndices {
        national: NationalIndex {
            average: 1.0,
            trend: "+2.5% YoY".into(),
        },
        regional: regional
            .iter()
            .map(|&(region, index, trend)| RegionalIndex {
                region: region.into(),
                index,
                trend: trend.into(),
            })
            .collect(),
        cities: cities
            .iter()
            .map(|&(city, index, trend)| CityIndex {
                city: city.into(),
                index,
                trend: trend.into(),
            })
            .collect(),
    }
}
