//! End-to-end tests for the synchronic families.
//!
//! Each test builds small in-memory spaces with hand-picked vectors, runs
//! the engine over a single grain and checks individual records.

use compound_shift::{
    Engine, EngineConfig, Grain, GrainSeries, MeasureFamily, MemorySpace, NoAlignment, Score,
    ScoreSheet, Slice, Target,
};

// ============================================================================
// Helpers
// ============================================================================

fn single_slice(pairs: Vec<(&str, Vec<f32>)>) -> Vec<GrainSeries<MemorySpace>> {
    let space = MemorySpace::from_pairs(pairs).unwrap();
    let slice = Slice { label: "1900".into(), space };
    vec![GrainSeries::new(Grain::Fine, "", vec![slice]).unwrap()]
}

fn run(family: MeasureFamily, config: &EngineConfig, grains: &[GrainSeries<MemorySpace>]) -> ScoreSheet {
    let targets = vec![Target::from_phrase("modifier head", "nn").unwrap()];
    let engine = Engine::new(config, &targets).unwrap();
    engine.run(family, grains, &NoAlignment).unwrap()
}

fn score(sheet: &ScoreSheet, measure: &str) -> Score {
    sheet
        .get("modifier head", Grain::Fine, "1900", measure)
        .unwrap_or_else(|| panic!("no record for {measure}"))
}

// ============================================================================
// 1. Symmetric compound: cpd-modif == cpd-head, modif-head == 0
// ============================================================================

#[test]
fn test_symmetric_compound() {
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.0, 0.0]),
        ("head::nn", vec![0.0, 1.0, 0.0]),
        ("modifier_head::nn", vec![1.0, 1.0, 0.0]),
    ]);
    let sheet = run(MeasureFamily::SynchronicCosine, &EngineConfig::default(), &grains);

    let cm = score(&sheet, "cpd-modif").value().unwrap();
    let ch = score(&sheet, "cpd-head").value().unwrap();
    assert_eq!(cm, ch);
    assert!((cm - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert_eq!(score(&sheet, "modif-head").value(), Some(0.0));

    // The compound lies exactly on the pooled constituents
    let cmh = score(&sheet, "cpd-const").value().unwrap();
    assert!((cmh - 1.0).abs() < 1e-9);

    let add = score(&sheet, "cpd-add").value().unwrap();
    let mult = score(&sheet, "cpd-mult").value().unwrap();
    let comb = score(&sheet, "cpd-comb").value().unwrap();
    assert!((add - 2.0 * cm).abs() < 1e-12);
    assert!((mult - cm * cm).abs() < 1e-12);
    assert!((comb - (add + mult)).abs() < 1e-12);
}

// ============================================================================
// 2. Head absent from the space
// ============================================================================

#[test]
fn test_absent_head_cosines() {
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.0, 0.0]),
        ("modifier_head::nn", vec![1.0, 1.0, 0.0]),
    ]);
    let sheet = run(MeasureFamily::SynchronicCosine, &EngineConfig::default(), &grains);

    for measure in ["cpd-head", "modif-head", "cpd-const", "cpd-add", "cpd-mult", "cpd-comb"] {
        assert!(score(&sheet, measure).is_missing(), "{measure} should be missing");
    }
    assert!(score(&sheet, "cpd-modif").is_present());
}

#[test]
fn test_absent_head_neighbors() {
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.1, 0.0]),
        ("modifier_head::nn", vec![0.8, 0.6, 0.1]),
        ("alpha::nn", vec![0.9, 0.3, 0.2]),
        ("beta::nn", vec![0.4, 0.8, 0.3]),
        ("gamma::nn", vec![0.2, 0.3, 0.9]),
    ]);
    let config = EngineConfig { k: 2, ..Default::default() };
    let sheet = run(MeasureFamily::SynchronicNeighbor, &config, &grains);

    assert_eq!(sheet.len(), 14);
    for measure in [
        "syn-nn-overlap-ch-k2",
        "syn-nn-overlap-cmh-k2",
        "syn-nn-overlap-mh-k2",
        "syn-nn-overlap-add-k2",
        "syn-nn-so-ch-k2",
        "syn-nn-so-cmh-k2",
        "syn-nn-so-mh-k2",
        "syn-nn-so-comb-k2",
    ] {
        assert!(score(&sheet, measure).is_missing(), "{measure} should be missing");
    }
    assert!(score(&sheet, "syn-nn-overlap-cm-k2").is_present());
    assert!(score(&sheet, "syn-nn-so-cm-k2").is_present());
}

// ============================================================================
// 3. Neighbor overlap values
// ============================================================================

#[test]
fn test_overlap_counts_shared_neighbors() {
    // modifier and compound both sit next to alpha and beta
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.0, 0.0]),
        ("head::nn", vec![0.0, 0.0, 1.0]),
        ("modifier_head::nn", vec![1.0, 0.2, 0.0]),
        ("alpha::nn", vec![1.0, 0.1, 0.0]),
        ("beta::nn", vec![0.9, 0.3, 0.0]),
        ("gamma::nn", vec![0.0, 0.2, 1.0]),
    ]);
    let config = EngineConfig { k: 2, ..Default::default() };
    let sheet = run(MeasureFamily::SynchronicNeighbor, &config, &grains);

    // nns(c) = {alpha, beta}, nns(m) = {alpha, compound}
    assert_eq!(score(&sheet, "syn-nn-overlap-cm-k2").value(), Some(0.5));
    // nns(h) = {gamma, ...}, disjoint from the compound's
    assert_eq!(score(&sheet, "syn-nn-overlap-ch-k2").value(), Some(0.0));
}

#[test]
fn test_overlap_distance_framing() {
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.0, 0.0]),
        ("head::nn", vec![0.0, 0.0, 1.0]),
        ("modifier_head::nn", vec![1.0, 0.2, 0.0]),
        ("alpha::nn", vec![1.0, 0.1, 0.0]),
        ("beta::nn", vec![0.9, 0.3, 0.0]),
        ("gamma::nn", vec![0.0, 0.2, 1.0]),
    ]);
    let config = EngineConfig {
        k: 2,
        overlap_framing: compound_shift::Framing::Distance,
        ..Default::default()
    };
    let sheet = run(MeasureFamily::SynchronicNeighbor, &config, &grains);
    assert_eq!(score(&sheet, "syn-nn-overlap-cm-k2").value(), Some(0.5));
    assert_eq!(score(&sheet, "syn-nn-overlap-ch-k2").value(), Some(1.0));
}

// ============================================================================
// 4. Zero-norm compound vector
// ============================================================================

#[test]
fn test_zero_compound_vector_is_missing() {
    let grains = single_slice(vec![
        ("modifier::nn", vec![1.0, 0.1, 0.0]),
        ("head::nn", vec![0.1, 1.0, 0.0]),
        ("modifier_head::nn", vec![0.0, 0.0, 0.0]),
        ("alpha::nn", vec![0.9, 0.3, 0.2]),
        ("beta::nn", vec![0.4, 0.8, 0.3]),
        ("gamma::nn", vec![0.2, 0.3, 0.9]),
    ]);
    let config = EngineConfig { k: 2, ..Default::default() };
    let sheet = run(MeasureFamily::SynchronicNeighbor, &config, &grains);

    assert_eq!(sheet.len(), 14);
    for measure in [
        "syn-nn-overlap-cm-k2",
        "syn-nn-overlap-ch-k2",
        "syn-nn-overlap-cmh-k2",
        "syn-nn-so-cm-k2",
        "syn-nn-so-ch-k2",
        "syn-nn-so-cmh-k2",
    ] {
        assert!(score(&sheet, measure).is_missing(), "{measure} should be missing");
    }
    assert!(score(&sheet, "syn-nn-overlap-mh-k2").is_present());
    assert!(score(&sheet, "syn-nn-so-mh-k2").is_present());
}
