//! Builtin Michigan region
//!
//! Synthetic, illustrative zoning data for six Michigan cities plus a
//! state-wide archetype palette. None of it reflects real ordinances.
//!
//! Locality boundaries are checked in this order:
//!
//! ```text
//! Detroit -> Dearborn Heights -> Dearborn -> Ann Arbor -> Grand Rapids -> Lansing
//! ```
//!
//! Dearborn and Dearborn Heights share one box split at 42.33 N, and the
//! Detroit box overlaps everything in that box east of 83.3 W. Detroit is
//! declared first, so it takes the overlap; only the strip between 83.32 W
//! and 83.3 W reaches the Dearborn rule sets through the region. The full
//! rule sets still apply when a locality is resolved directly.

use super::district::{LocalityRule, LocalityRules};
use super::palette::DistrictPalette;
use super::region::{LocalityBoundary, Region};
use super::types::{AreaPredicate, AreaTest, BoundingBox, Setbacks, ZoningDistrict};

/// Region name of the builtin Michigan region
pub const MICHIGAN: &str = "Michigan";

const GENERIC_SOURCE: &str = "Michigan Zoning (Mock)";
const SINGLE_FAMILY: &[&str] = &["Single-Family Residential"];
const TWO_PER_UNIT: &str = "2 spaces per dwelling unit";

/// Shorthand for a box given as lat range and lng range
fn area(south: f64, north: f64, west: f64, east: f64) -> AreaPredicate {
    AreaPredicate::within(BoundingBox::new(north, south, east, west))
}

fn setbacks(front: u32, side: u32, rear: u32) -> Setbacks {
    Setbacks::new(format!("{front} ft"), format!("{side} ft"), format!("{rear} ft"))
}

/// Build the Michigan region
#[must_use]
pub fn michigan() -> Region {
    let dearborn_box = BoundingBox::new(42.38, 42.28, -83.15, -83.32);

    Region {
        name: MICHIGAN.into(),
        bounding_box: BoundingBox::new(48.3, 41.7, -82.1, -90.4),
        locality_boundaries: vec![
            LocalityBoundary::new("Detroit", area(42.25, 42.45, -83.3, -82.9)),
            LocalityBoundary::new(
                "Dearborn Heights",
                AreaPredicate::within(dearborn_box).and(AreaTest::NorthOf { lat: 42.33 }),
            ),
            LocalityBoundary::new("Dearborn", AreaPredicate::within(dearborn_box)),
            LocalityBoundary::new("Ann Arbor", area(42.22, 42.33, -83.8, -83.67)),
            LocalityBoundary::new("Grand Rapids", area(42.9, 43.0, -85.75, -85.57)),
            LocalityBoundary::new("Lansing", area(42.7, 42.8, -84.65, -84.5)),
        ],
        localities: vec![
            detroit(),
            dearborn_heights(),
            dearborn(),
            ann_arbor(),
            grand_rapids(),
            lansing(),
        ],
        generic_fallback: generic_palette(),
    }
}

fn detroit() -> LocalityRules {
    const SOURCE: &str = "Detroit Zoning Ordinance (Mock)";

    LocalityRules::new(
        "Detroit",
        ZoningDistrict::new(
            "R1",
            "Single-Family Residential District",
            "35 ft",
            0.5,
            setbacks(20, 5, 30),
            &["Single-Family Residential", "Religious", "Educational"],
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "downtown",
        area(42.32, 42.34, -83.06, -83.03),
        ZoningDistrict::new(
            "B4",
            "General Business District",
            "80 ft",
            4.0,
            setbacks(0, 0, 10),
            &["Commercial", "Office", "Retail", "Residential", "Mixed-Use"],
            "1 space per 1,000 sq ft",
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "midtown",
        area(42.34, 42.36, -83.07, -83.05),
        ZoningDistrict::new(
            "SD1",
            "Special Development District - Midtown",
            "120 ft",
            5.0,
            setbacks(0, 0, 15),
            &["Mixed-Use", "Residential", "Commercial", "Educational", "Cultural"],
            "1 space per unit or 1,000 sq ft",
            SOURCE,
        ),
    ))
}

fn dearborn() -> LocalityRules {
    const SOURCE: &str = "Dearborn Zoning Ordinance (Mock)";

    LocalityRules::new(
        "Dearborn",
        ZoningDistrict::new(
            "RA",
            "Residential A District",
            "30 ft",
            0.4,
            setbacks(25, 5, 35),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "downtown",
        area(42.32, 42.33, -83.18, -83.16),
        ZoningDistrict::new(
            "BC",
            "Business Center District",
            "60 ft",
            3.0,
            setbacks(0, 0, 10),
            &["Commercial", "Office", "Retail", "Mixed-Use"],
            "1 space per 300 sq ft",
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "research campus",
        area(42.31, 42.32, -83.23, -83.21),
        ZoningDistrict::new(
            "IR",
            "Industrial Research District",
            "75 ft",
            2.0,
            setbacks(50, 30, 50),
            &["Research", "Office", "Light Manufacturing"],
            "1 space per 500 sq ft",
            SOURCE,
        ),
    ))
}

fn dearborn_heights() -> LocalityRules {
    const SOURCE: &str = "Dearborn Heights Zoning Ordinance (Mock)";
    let north = AreaTest::NorthOf { lat: 42.35 };
    let central = AreaTest::LatitudeBand {
        south: 42.33,
        north: 42.35,
    };

    LocalityRules::new(
        "Dearborn Heights",
        ZoningDistrict::new(
            "R-1D",
            "Single-Family Residential District",
            "30 ft",
            0.45,
            setbacks(20, 5, 25),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "telegraph corridor",
        AreaPredicate::from(north).and(AreaTest::LongitudeBand {
            west: -83.29,
            east: -83.27,
        }),
        ZoningDistrict::new(
            "C-2",
            "General Commercial District",
            "45 ft",
            1.5,
            setbacks(10, 10, 20),
            &["Retail", "Office", "Restaurant", "Service", "Automotive"],
            "1 space per 250 sq ft",
            SOURCE,
        )
        .with_overlays(&["Corridor Improvement"]),
    ))
    .with_rule(LocalityRule::new(
        "north residential",
        north,
        ZoningDistrict::new(
            "R-1B",
            "Single-Family Residential District",
            "30 ft",
            0.35,
            setbacks(25, 5, 35),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "city center",
        AreaPredicate::from(central).and(AreaTest::LongitudeBand {
            west: -83.28,
            east: -83.26,
        }),
        ZoningDistrict::new(
            "CBD",
            "Central Business District",
            "50 ft",
            2.0,
            setbacks(5, 5, 15),
            &["Retail", "Office", "Civic", "Mixed-Use", "Restaurant"],
            "1 space per 300 sq ft",
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "central residential",
        central,
        ZoningDistrict::new(
            "R-1C",
            "Single-Family Residential District",
            "30 ft",
            0.4,
            setbacks(20, 5, 30),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "ford road corridor",
        area(42.315, 42.325, -83.3, -83.25),
        ZoningDistrict::new(
            "C-1",
            "Local Business District",
            "35 ft",
            1.0,
            setbacks(15, 10, 20),
            &["Retail", "Office", "Personal Service", "Restaurant"],
            "1 space per 200 sq ft",
            SOURCE,
        ),
    ))
}

fn ann_arbor() -> LocalityRules {
    const SOURCE: &str = "Ann Arbor Zoning Ordinance (Mock)";

    LocalityRules::new(
        "Ann Arbor",
        ZoningDistrict::new(
            "R1A",
            "Single-Family Dwelling District",
            "30 ft",
            0.35,
            setbacks(40, 8, 30),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "downtown",
        area(42.27, 42.29, -83.75, -83.74),
        ZoningDistrict::new(
            "D1",
            "Downtown Core District",
            "180 ft",
            6.0,
            setbacks(0, 0, 0),
            &["Mixed-Use", "Commercial", "Office", "Residential", "Retail"],
            "Varies by use",
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "university",
        area(42.275, 42.285, -83.74, -83.73),
        ZoningDistrict::new(
            "PL",
            "Public Land District",
            "120 ft",
            4.0,
            setbacks(10, 10, 10),
            &["Educational", "Institutional", "Recreational", "Cultural"],
            "Determined by Planning Commission",
            SOURCE,
        ),
    ))
}

fn grand_rapids() -> LocalityRules {
    const SOURCE: &str = "Grand Rapids Zoning Ordinance (Mock)";

    LocalityRules::new(
        "Grand Rapids",
        ZoningDistrict::new(
            "LDR",
            "Low Density Residential",
            "35 ft",
            0.4,
            setbacks(25, 7, 25),
            &["Single-Family Residential", "Two-Family Residential"],
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "downtown",
        area(42.96, 42.98, -85.68, -85.66),
        ZoningDistrict::new(
            "TN-CC",
            "Traditional Neighborhood - City Center",
            "160 ft",
            5.0,
            setbacks(0, 0, 10),
            &["Mixed-Use", "Commercial", "Office", "Residential", "Entertainment"],
            "1 space per 1,000 sq ft",
            SOURCE,
        ),
    ))
    .with_rule(LocalityRule::new(
        "medical mile",
        area(42.97, 42.98, -85.66, -85.65),
        ZoningDistrict::new(
            "IC",
            "Institutional Campus",
            "150 ft",
            4.0,
            setbacks(10, 10, 20),
            &["Medical", "Research", "Educational", "Office"],
            "1 space per 500 sq ft",
            SOURCE,
        ),
    ))
}

fn lansing() -> LocalityRules {
    const SOURCE: &str = "Lansing Zoning Ordinance (Mock)";

    LocalityRules::new(
        "Lansing",
        ZoningDistrict::new(
            "A",
            "Residential District",
            "35 ft",
            0.5,
            setbacks(25, 8, 30),
            SINGLE_FAMILY,
            TWO_PER_UNIT,
            SOURCE,
        ),
    )
    .with_rule(LocalityRule::new(
        "downtown",
        area(42.73, 42.74, -84.56, -84.55),
        ZoningDistrict::new(
            "F-1",
            "Commercial District",
            "100 ft",
            4.0,
            setbacks(0, 0, 10),
            &["Office", "Commercial", "Retail", "Restaurant", "Entertainment"],
            "1 space per 500 sq ft",
            SOURCE,
        ),
    ))
    // Lies wholly inside the downtown box, so downtown always wins here.
    .with_rule(LocalityRule::new(
        "capitol complex",
        area(42.733, 42.738, -84.56, -84.55),
        ZoningDistrict::new(
            "G-1",
            "Governmental District",
            "150 ft",
            5.0,
            setbacks(10, 10, 20),
            &["Governmental", "Office", "Institutional"],
            "1 space per 500 sq ft",
            SOURCE,
        ),
    ))
}

/// State-wide archetypes for Michigan points outside the named cities
fn generic_palette() -> DistrictPalette {
    let entries: [(&str, &str, &str, f64, &[&str]); 5] = [
        (
            "R-1",
            "Single-Family Residential District",
            "35 ft",
            0.4,
            &["Single-Family Residential"],
        ),
        (
            "R-2",
            "Multiple-Family Residential District",
            "45 ft",
            0.6,
            &["Multiple-Family Residential", "Townhouses", "Duplexes"],
        ),
        (
            "C-1",
            "Local Business District",
            "40 ft",
            1.0,
            &["Retail", "Office", "Personal Service"],
        ),
        (
            "C-2",
            "General Business District",
            "50 ft",
            2.0,
            &["Commercial", "Retail", "Office", "Restaurant", "Entertainment"],
        ),
        (
            "I-1",
            "Light Industrial District",
            "60 ft",
            1.5,
            &["Light Manufacturing", "Warehouse", "Research", "Office"],
        ),
    ];

    let districts = entries
        .iter()
        .enumerate()
        .map(|(i, (code, description, height, far, uses))| {
            // The two residential archetypes are parked per unit.
            let parking = if i < 2 {
                TWO_PER_UNIT
            } else {
                "1 space per 300 sq ft"
            };
            ZoningDistrict::new(
                *code,
                *description,
                *height,
                *far,
                setbacks(25, 8, 30),
                uses,
                parking,
                GENERIC_SOURCE,
            )
        })
        .collect();

    DistrictPalette::builtin("michigan", districts)
}
