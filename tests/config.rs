use neuroscope::{ConfigError, VisualizerConfig};

#[test]
fn yaml_and_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = VisualizerConfig {
        title: "Lab rig".into(),
        columns: 3,
        export_size: (640, 480),
        ..Default::default()
    };
    for name in ["cfg.yaml", "cfg.json"] {
        let path = dir.path().join(name);
        cfg.save(&path).unwrap();
        let back = VisualizerConfig::load(&path).unwrap();
        assert_eq!(back.title, "Lab rig");
        assert_eq!(back.columns, 3);
        assert_eq!(back.export_size, (640, 480));
        assert_eq!(back.min_plot_size, (250.0, 250.0));
    }
    let json = std::fs::read_to_string(dir.path().join("cfg.json")).unwrap();
    assert!(json.trim_start().starts_with('{'));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    match VisualizerConfig::load(&path) {
        Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected: {:?}", other.err()),
    }
}

#[test]
fn malformed_yaml_is_rejected() {
    assert!(matches!(
        VisualizerConfig::from_yaml_str("columns: [1, 2"),
        Err(ConfigError::Yaml(_))
    ));
}
