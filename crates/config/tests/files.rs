use gridcell_config::{CellProfiles, ConfigError};
use gridcell_engine::popup::{ElementId, PopupRegion};
use gridcell_engine::{CellOptions, CellState};

fn sample() -> CellProfiles {
    CellProfiles::default()
        .with_column(
            "phone",
            CellOptions::new().with_mask("(999) 999-9999").with_debounce_ms(250),
        )
        .with_column(
            "due",
            CellOptions::new()
                .with_initial_state(CellState::Load)
                .with_popup(PopupRegion::new(ElementId(3)).with_descendant(ElementId(4))),
        )
}

#[test]
fn save_and_load_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cells.toml");

    sample().save_to(&path).unwrap();
    let loaded = CellProfiles::load_from(&path).unwrap();
    assert_eq!(loaded, sample());
}

#[test]
fn save_and_load_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.json");

    sample().save_to(&path).unwrap();
    let loaded = CellProfiles::load_from(&path).unwrap();
    assert_eq!(loaded.options_for("phone").debounce, 250);
    assert_eq!(loaded, sample());
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.yaml");
    std::fs::write(&path, "defaults: {}").unwrap();

    let err = CellProfiles::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CellProfiles::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
