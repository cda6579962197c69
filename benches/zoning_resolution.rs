//! Performance benchmarks for zoning resolution.
//!
//! Run with: `cargo bench`
//!
//! Performance targets:
//! - Locality rule match: <1us
//! - Palette fallback: <500ns
//! - Site record assembly: <5us
//! - Catalog hot reload: <1ms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use site_scout::site::{decode_site_id, SiteIdentity, SiteQuery, SiteRecordBuilder};
use site_scout::zoning::{
    AreaPredicate, BoundingBox, Coordinate, DistrictPalette, LocalityBoundary, LocalityRule,
    LocalityRules, Region, RegionCatalog, Setbacks, ZoningDistrict, ZoningResolver,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn district(code: &str) -> ZoningDistrict {
    ZoningDistrict::new(
        code,
        "Benchmark district",
        "40 ft",
        1.0,
        Setbacks::new("10 ft", "5 ft", "10 ft"),
        &["Residential"],
        "1 space per unit",
        "Benchmark",
    )
}

/// Build a region with `locality_count` localities laid out on a grid,
/// each carrying four rules.
fn build_region(locality_count: usize) -> Region {
    let mut boundaries = Vec::with_capacity(locality_count);
    let mut localities = Vec::with_capacity(locality_count);

    for i in 0..locality_count {
        let name = format!("town-{i}");
        let south = 10.0 + (i / 10) as f64 * 0.1;
        let west = 10.0 + (i % 10) as f64 * 0.1;
        let bbox = BoundingBox::new(south + 0.1, south, west + 0.1, west);
        boundaries.push(LocalityBoundary::new(name.clone(), AreaPredicate::within(bbox)));

        let mut rules = LocalityRules::new(name, district("DEF"));
        for r in 0..4 {
            let offset = f64::from(r) * 0.02;
            let rule_box = BoundingBox::new(
                south + offset + 0.02,
                south + offset,
                west + offset + 0.02,
                west + offset,
            );
            rules = rules.with_rule(LocalityRule::new(
                format!("rule-{r}"),
                AreaPredicate::within(rule_box),
                district(&format!("Z{r}")),
            ));
        }
        localities.push(rules);
    }

    Region {
        name: "Bench".into(),
        bounding_box: BoundingBox::new(60.0, 10.0, 60.0, 10.0),
        locality_boundaries: boundaries,
        localities,
        generic_fallback: DistrictPalette::new("bench", vec![district("G1"), district("G2")])
            .expect("non-empty palette"),
    }
}

fn build_catalog(locality_count: usize) -> RegionCatalog {
    RegionCatalog {
        regions: vec![build_region(locality_count)],
        ..RegionCatalog::builtin()
    }
}

// ============================================================================
// Builtin Catalog Benchmarks
// ============================================================================

fn bench_builtin_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_resolution");
    let resolver = ZoningResolver::builtin();

    group.bench_function("locality_rule", |b| {
        let coord = Coordinate::new(42.33, -83.045);
        b.iter(|| black_box(resolver.resolve_detailed(black_box(coord))));
    });

    group.bench_function("locality_default", |b| {
        let coord = Coordinate::new(42.40, -83.10);
        b.iter(|| black_box(resolver.resolve_detailed(black_box(coord))));
    });

    group.bench_function("region_palette", |b| {
        let coord = Coordinate::new(44.0, -85.0);
        b.iter(|| black_box(resolver.resolve_detailed(black_box(coord))));
    });

    group.bench_function("global_palette", |b| {
        let coord = Coordinate::new(51.5, -0.12);
        b.iter(|| black_box(resolver.resolve_detailed(black_box(coord))));
    });

    group.finish();
}

// ============================================================================
// Scaling Benchmarks
// ============================================================================

fn bench_locality_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("locality_scaling");

    for locality_count in [10, 100, 1000].iter() {
        let resolver = ZoningResolver::new(build_catalog(*locality_count));
        // Last locality on the grid, so every boundary is tested first
        let last = locality_count - 1;
        let coord = Coordinate::new(
            10.0 + (last / 10) as f64 * 0.1 + 0.05,
            10.0 + (last % 10) as f64 * 0.1 + 0.05,
        );

        group.bench_with_input(
            BenchmarkId::new("last_locality", locality_count),
            locality_count,
            |b, _| {
                b.iter(|| black_box(resolver.resolve(black_box(coord))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("no_locality", locality_count),
            locality_count,
            |b, _| {
                let coord = Coordinate::new(55.0, 55.0);
                b.iter(|| black_box(resolver.resolve(black_box(coord))));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Site Benchmarks
// ============================================================================

fn bench_site_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("site_records");
    let resolver = ZoningResolver::builtin();
    let builder = SiteRecordBuilder::default();
    let coord = Coordinate::new(42.33, -83.045);

    group.bench_function("build_record", |b| {
        b.iter(|| {
            let identity = SiteIdentity {
                id: "42.33,-83.045".into(),
                address: "Lat: 42.33, Lng: -83.045".into(),
                coordinates: coord,
                geocode_fallback: false,
            };
            black_box(builder.build(identity, coord, resolver.resolve_detailed(coord)))
        });
    });

    group.bench_function("site_id_round_trip", |b| {
        let query = SiteQuery::by_address("2 Woodward Ave, Detroit, MI 48226");
        b.iter(|| {
            let id = query.site_id().expect("address query");
            black_box(decode_site_id(&id).expect("decodable id"))
        });
    });

    group.finish();
}

// ============================================================================
// Hot Reload Benchmarks
// ============================================================================

fn bench_hot_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_reload");
    let resolver = ZoningResolver::builtin();

    group.bench_function("swap_builtin", |b| {
        b.iter(|| black_box(resolver.reload(RegionCatalog::builtin())));
    });

    group.bench_function("validate_builtin", |b| {
        let catalog = RegionCatalog::builtin();
        b.iter(|| black_box(catalog.validate()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_builtin_resolution,
    bench_locality_scaling,
    bench_site_records,
    bench_hot_reload
);
criterion_main!(benches);
