use std::path::PathBuf;

use mobomojo::catalog::{load_catalog, Catalog, CatalogSource, Category, Component};
use mobomojo::compat::{CompatibilityEngine, ViolationKind};
use mobomojo::Configuration;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_catalog() -> Catalog {
    load_catalog(&fixture_path("catalog.json")).expect("Failed to load fixture catalog")
}

fn part<'a>(catalog: &'a Catalog, id: &str) -> &'a Component {
    catalog
        .find(id)
        .unwrap_or_else(|| panic!("Fixture component '{}' missing", id))
}

fn build_of(catalog: &Catalog, ids: &[&str]) -> Configuration {
    let mut build = Configuration::new();
    for id in ids {
        build.set(part(catalog, id).clone()).expect("Fixture part should be placeable");
    }
    build
}

#[test]
fn test_every_component_passes_against_empty_build() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let empty = Configuration::new();

    for component in catalog.components() {
        let issues = engine.evaluate(component, &empty);
        assert!(
            issues.is_empty(),
            "{} should have no issues in an empty build, got {:?}",
            component.id,
            issues
        );
    }
}

#[test]
fn test_attributeless_parts_never_conflict() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let bare = [
        "cpu-bare",
        "mb-bare",
        "ram-bare",
        "gpu-bare",
        "psu-bare",
        "case-bare",
        "cooler-bare",
    ];

    for candidate in bare {
        let others: Vec<&str> = bare.iter().copied().filter(|id| *id != candidate).collect();
        let build = build_of(&catalog, &others);
        let issues = engine.evaluate(part(&catalog, candidate), &build);
        assert!(
            issues.is_empty(),
            "{} should be unconstrained, got {:?}",
            candidate,
            issues
        );
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let build = build_of(
        &catalog,
        &["mb-am5-atx", "ram-ddr5", "gpu-340", "psu-400", "case-330"],
    );
    let candidate = part(&catalog, "cpu-am4-65");

    let first = engine.evaluate(candidate, &build);
    assert_eq!(first.len(), 3, "Expected socket, memory and power issues: {:?}", first);
    for _ in 0..5 {
        assert_eq!(engine.evaluate(candidate, &build), first);
    }
}

#[test]
fn test_summarize_never_flags_self() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();

    for component in catalog.components() {
        if component.category().is_none() {
            continue;
        }
        let build = build_of(&catalog, &[component.id.as_str()]);
        let summary = engine.summarize(&build);
        assert!(
            summary.is_compatible(),
            "{} alone should be compatible, got {:?}",
            component.id,
            summary.violations
        );
    }
}

#[test]
fn test_socket_conflict_is_mirrored() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let cpu = part(&catalog, "cpu-am4-65");
    let board = part(&catalog, "mb-am5-atx");

    let cpu_issues = engine.check(cpu, &build_of(&catalog, &["mb-am5-atx"]));
    let board_issues = engine.check(board, &build_of(&catalog, &["cpu-am4-65"]));

    assert!(cpu_issues.iter().any(|v| v.kind == ViolationKind::Socket));
    assert!(board_issues.iter().any(|v| v.kind == ViolationKind::Socket));
    assert_eq!(cpu_issues[0].message, "Incompatible socket with B650 ATX Board");
    assert_eq!(board_issues[0].message, "Incompatible socket with AMD Ryzen 5 5600");
}

#[test]
fn test_power_budget_arithmetic() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    // 65 + 220 + 150 = 435
    let build = build_of(&catalog, &["cpu-am5-65", "gpu-340"]);

    let issues = engine.evaluate(part(&catalog, "psu-400"), &build);
    assert_eq!(
        issues,
        vec!["May be insufficient wattage for current build (400W available, 435W estimated)"]
    );
    assert!(engine.evaluate(part(&catalog, "psu-500"), &build).is_empty());

    // Same budget seen from the processor side
    let build = build_of(&catalog, &["gpu-340", "psu-400"]);
    assert_eq!(
        engine.evaluate(part(&catalog, "cpu-am5-65"), &build),
        vec!["PSU Budget 400W may be insufficient (400W)"]
    );
    let build = build_of(&catalog, &["gpu-340", "psu-500"]);
    assert!(engine.evaluate(part(&catalog, "cpu-am5-65"), &build).is_empty());
}

#[test]
fn test_gpu_clearance_arithmetic() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let build = build_of(&catalog, &["case-330"]);

    assert_eq!(
        engine.evaluate(part(&catalog, "gpu-340"), &build),
        vec!["Too long for Compact Case (max 330mm)"]
    );
    assert!(engine.evaluate(part(&catalog, "gpu-300"), &build).is_empty());

    let build = build_of(&catalog, &["gpu-340"]);
    assert_eq!(
        engine.evaluate(part(&catalog, "case-330"), &build),
        vec!["GPU Long Card 340 is too long (max 330mm)"]
    );
}

#[test]
fn test_memory_family_asymmetry() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();

    // LGA1700 defers to the motherboard's declared standard
    let build = build_of(&catalog, &["mb-lga1700-ddr4", "ram-ddr5"]);
    assert_eq!(
        engine.evaluate(part(&catalog, "cpu-lga1700"), &build),
        vec!["Requires DDR4 RAM for B760M DDR4 Board"]
    );

    // AM5 demands DDR5 no matter which board is installed
    let build = build_of(&catalog, &["mb-bare", "ram-ddr4"]);
    assert_eq!(
        engine.evaluate(part(&catalog, "cpu-am5-65"), &build),
        vec!["This CPU requires DDR5 RAM (DDR4 16GB Kit is DDR4)"]
    );
}

#[test]
fn test_total_price_exact() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();

    assert_eq!(engine.summarize(&Configuration::new()).total_price, 0);
    assert_eq!(
        engine.summarize(&build_of(&catalog, &["ssd-1"])).total_price,
        3500
    );

    let full = build_of(
        &catalog,
        &[
            "cpu-am5-65",
            "mb-am5-atx",
            "ram-ddr5",
            "gpu-300",
            "ssd-1",
            "psu-500",
            "case-big",
            "cooler-165",
        ],
    );
    assert_eq!(full.len(), 8);
    let summary = engine.summarize(&full);
    assert_eq!(summary.total_price, 78_500);
    assert!(
        summary.is_compatible(),
        "Full reference build should be compatible: {:?}",
        summary.violations
    );
}

#[test]
fn test_removing_motherboard_clears_socket_conflict() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let mut build = build_of(&catalog, &["cpu-am4-65", "mb-am5-atx", "ssd-1"]);

    let before = engine.summarize(&build);
    assert_eq!(
        before.violations.get(&Category::Cpu),
        Some(&vec!["Incompatible socket with B650 ATX Board".to_string()])
    );

    build.clear(Category::Motherboard);
    let after = engine.summarize(&build);
    assert!(after.violations.get(&Category::Cpu).is_none());
    assert!(after.is_compatible());
    assert_eq!(after.total_price, 6500 + 3500);
}

#[test]
fn test_adding_a_part_can_flag_others() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let mut build = build_of(&catalog, &["gpu-340", "cooler-165"]);
    assert!(engine.summarize(&build).is_compatible());

    build.set(part(&catalog, "case-330").clone()).unwrap();
    let summary = engine.summarize(&build);
    assert_eq!(
        summary.violations.keys().copied().collect::<Vec<_>>(),
        vec![Category::Gpu, Category::Case, Category::Cooler]
    );
    assert_eq!(
        summary.violations[&Category::Case],
        vec![
            "GPU Long Card 340 is too long (max 330mm)",
            "CPU Cooler Tall Tower Cooler is too tall (max 155mm)",
        ]
    );
}

#[test]
fn test_unclassified_component_is_unconstrained() {
    let catalog = fixture_catalog();
    let engine = CompatibilityEngine::default();
    let build = build_of(&catalog, &["cpu-am5-65", "psu-400", "case-330"]);

    let strip = part(&catalog, "misc-rgb");
    assert!(strip.category().is_none());
    assert!(engine.evaluate(strip, &build).is_empty());
    assert!(Configuration::new().set(strip.clone()).is_err());
}

#[test]
fn test_free_functions_use_default_rules() {
    let catalog = fixture_catalog();
    let build = build_of(&catalog, &["case-330"]);
    assert_eq!(
        mobomojo::evaluate(part(&catalog, "gpu-340"), &build),
        CompatibilityEngine::default().evaluate(part(&catalog, "gpu-340"), &build)
    );
    assert_eq!(mobomojo::summarize(&build).total_price, 4000);
}
