use cc_results::*;
use cc_sim::{EngineSetup, Mode, SimulationEngine};

#[test]
fn save_and_load_export() {
    let temp_dir = std::env::temp_dir().join(format!("cc_results_test_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = HistoryStore::new(temp_dir.clone()).unwrap();

    let mut engine = SimulationEngine::new(EngineSetup::default()).unwrap();
    engine.set_mode(Mode::Cruise);
    engine.request_perturbation(5.0);
    for _ in 0..25 {
        engine.tick();
    }
    let samples = engine.snapshot_history();
    let manifest = ExportManifest::new(
        "smoke",
        *engine.params(),
        engine.snapshot_state(),
        &samples,
    );

    let dir = store.save(&manifest, &samples).unwrap();
    assert!(store.has_export(&manifest.export_id));
    assert!(dir.join("history.csv").exists());

    let loaded = store.load_manifest(&manifest.export_id).unwrap();
    assert_eq!(loaded.export_id, manifest.export_id);
    assert_eq!(loaded.sample_count, 25);
    assert_eq!(loaded.final_state.mode, Mode::Cruise);

    let history = store.load_history(&manifest.export_id).unwrap();
    assert_eq!(history.len(), 25);
    assert_eq!(history[0].perturbation_magnitude, 5.0);

    let csv = std::fs::read_to_string(dir.join("history.csv")).unwrap();
    assert_eq!(csv.lines().count(), 26);

    let listed = store.list_exports().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].export_id, manifest.export_id);

    let _ = std::fs::remove_dir_all(&temp_dir);
}

#[test]
fn missing_export_is_reported() {
    let temp_dir = std::env::temp_dir().join(format!("cc_results_missing_{}", std::process::id()));
    let store = HistoryStore::new(temp_dir.clone()).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::ExportNotFound { .. })
    ));
    let _ = std::fs::remove_dir_all(&temp_dir);
}
