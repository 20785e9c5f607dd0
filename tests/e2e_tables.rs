//! End-to-end test of the on-disk pipeline:
//!   word2vec text models + target list → engine → wide TSV tables.

use std::path::Path;

use compound_shift::model::load_targets;
use compound_shift::space::{LoadOptions, load_grain};
use compound_shift::{
    Engine, EngineConfig, Grain, MeasureFamily, NoAlignment, ScoreSheet, write_new_file, write_records_jsonl,
    write_tables,
};
use pretty_assertions::assert_eq;

const MODEL: &str = "\
4 2
green::nn 1.0 0.0
house::nn 0.0 1.0
green_house::nn 1.0 1.0
stop::nn 0.5 0.5
";

fn seed_models(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("1850_d2-w5.txt"), MODEL).unwrap();
    std::fs::write(dir.join("1860_d2-w5.txt"), MODEL).unwrap();
    std::fs::write(dir.join("notes.md"), "not a model").unwrap();
}

fn compute(root: &Path, config: &EngineConfig) -> ScoreSheet {
    let targets_path = root.join("targets.tsv");
    std::fs::write(&targets_path, "green house\t17\nbus stop\t4\n").unwrap();
    let targets = load_targets(&targets_path, &config.pos_tag).unwrap();

    let grain = load_grain(&root.join("models").join("run2"), Grain::Fine, &LoadOptions::default()).unwrap();
    assert_eq!(grain.run_tag, "-run2");
    assert_eq!(grain.slices().len(), 2);

    let engine = Engine::new(config, &targets).unwrap();
    engine.run(MeasureFamily::SynchronicCosine, &[grain], &NoAlignment).unwrap()
}

#[test]
fn test_tables_are_written_per_grain_and_measure() {
    let root = tempfile::tempdir().unwrap();
    seed_models(&root.path().join("models").join("run2"));
    let config = EngineConfig::default();
    let sheet = compute(root.path(), &config);

    let out = root.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let report = write_tables(&sheet, &out, &config.model_tag).unwrap();
    assert_eq!(report.written.len(), 7);
    assert!(report.skipped.is_empty());

    let text = std::fs::read_to_string(out.join("fine_w2v_modif-head-run2.tsv")).unwrap();
    assert_eq!(
        text,
        "compound\t1850\t1860\n\
         bus stop\t\t\n\
         green house\t0.0\t0.0\n"
    );
}

#[test]
fn test_existing_tables_are_left_alone() {
    let root = tempfile::tempdir().unwrap();
    seed_models(&root.path().join("models").join("run2"));
    let config = EngineConfig::default();
    let sheet = compute(root.path(), &config);

    let out = root.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let kept = out.join("fine_w2v_cpd-head-run2.tsv");
    std::fs::write(&kept, "hand edited\n").unwrap();

    let first = write_tables(&sheet, &out, &config.model_tag).unwrap();
    assert_eq!(first.skipped, vec![kept.clone()]);
    assert_eq!(first.written.len(), 6);
    assert_eq!(std::fs::read_to_string(&kept).unwrap(), "hand edited\n");

    // A second run finds every table and writes nothing
    let snapshot = std::fs::read_to_string(out.join("fine_w2v_cpd-modif-run2.tsv")).unwrap();
    let second = write_tables(&sheet, &out, &config.model_tag).unwrap();
    assert!(second.written.is_empty());
    assert_eq!(second.skipped.len(), 7);
    assert_eq!(std::fs::read_to_string(out.join("fine_w2v_cpd-modif-run2.tsv")).unwrap(), snapshot);
}

#[test]
fn test_existing_records_file_is_left_alone() {
    let root = tempfile::tempdir().unwrap();
    seed_models(&root.path().join("models").join("run2"));
    let sheet = compute(root.path(), &EngineConfig::default());

    let path = root.path().join("records.jsonl");
    std::fs::write(&path, "earlier run\n").unwrap();
    assert!(!write_new_file(&path, |w| write_records_jsonl(&sheet, w)).unwrap());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier run\n");

    let fresh = root.path().join("fresh.jsonl");
    assert!(write_new_file(&fresh, |w| write_records_jsonl(&sheet, w)).unwrap());
    let lines = std::fs::read_to_string(&fresh).unwrap();
    assert_eq!(lines.lines().count(), sheet.len());
}

#[test]
fn test_empty_grain_directory_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("coarse");
    std::fs::create_dir_all(&dir).unwrap();
    let err = load_grain(&dir, Grain::Coarse, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, compound_shift::Error::EmptyGrain { grain: Grain::Coarse, .. }));
}
