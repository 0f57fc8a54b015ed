//! Integration test: the full pipeline against the JSON Schema engine,
//! with schema and documents on disk.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use docbridge_core::{
    format_results, BridgeError, DataFormat, InputSource, ValidationInput, Validator, ValidatorOptions,
};

const CONFIG_SCHEMA: &str = r#"{
    "$defs": {
        "Config": {
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"],
            "additionalProperties": false
        }
    }
}"#;

const DEPLOYMENT_SCHEMA: &str = r#"{
    "$defs": {
        "Deployment": {
            "type": "object",
            "properties": {
                "replicas": { "type": "integer", "minimum": 1 },
                "containers": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "image": { "type": "string" } },
                        "required": ["image"]
                    }
                }
            },
            "required": ["replicas"]
        }
    }
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn config_validator(dir: &Path) -> Validator {
    Validator::new(write(dir, "schema.json", CONFIG_SCHEMA), "#Config").unwrap()
}

#[test]
fn test_valid_json_document() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let result = validator
        .validate(ValidationInput::bytes(&br#"{"name": "test"}"#[..], DataFormat::Json).named("config.json"))
        .unwrap();
    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert_eq!(format_results(&[result]), "config.json: ok\n");
}

#[test]
fn test_invalid_yaml_document() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let result = validator
        .validate(ValidationInput::bytes(&b"wrong: \"field\"\n"[..], DataFormat::Yaml).named("config.yaml"))
        .unwrap();
    assert!(!result.valid);
    assert!(!result.errors.is_empty());
    for error in &result.errors {
        assert!(!error.message.is_empty());
        assert_eq!(error.path, "");
    }
    assert!(format_results(&[result]).starts_with("FAIL: config.yaml\n"));
}

#[test]
fn test_sources_are_equivalent() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    for content in [r#"{"name": "test"}"#, r#"{"name": 42, "extra": true}"#] {
        let file = write(dir.path(), "doc.json", content);
        let from_file = validator
            .validate(ValidationInput::file(&file, DataFormat::Json).named("doc"))
            .unwrap();
        let from_reader = validator
            .validate(ValidationInput::reader(Cursor::new(content.as_bytes()), DataFormat::Json).named("doc"))
            .unwrap();
        let from_bytes = validator
            .validate(ValidationInput::bytes(content.as_bytes(), DataFormat::Json).named("doc"))
            .unwrap();
        assert_eq!(from_file, from_reader);
        assert_eq!(from_reader, from_bytes);
    }
}

#[test]
fn test_repeated_validation_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());
    let doc = br#"{"name": 5, "other": []}"#;

    let first = validator
        .validate(ValidationInput::bytes(&doc[..], DataFormat::Json))
        .unwrap();
    for _ in 0..3 {
        let again = validator
            .validate(ValidationInput::bytes(&doc[..], DataFormat::Json))
            .unwrap();
        assert_eq!(format_results(&[again.clone()]), format_results(&[first.clone()]));
        assert_eq!(again, first);
    }
}

#[test]
fn test_type_violation_reports_field() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let result = validator
        .validate(ValidationInput::bytes(&br#"{"name": 5}"#[..], DataFormat::Json))
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "name");
    assert_eq!((result.errors[0].line, result.errors[0].column), (1, 2));
}

#[test]
fn test_yaml_violation_reports_source_line() {
    let dir = tempfile::tempdir().unwrap();
    let validator = Validator::new(write(dir.path(), "deployment.json", DEPLOYMENT_SCHEMA), "#Deployment").unwrap();
    let doc = "# rollout\nreplicas: 2\ncontainers:\n  - image: nginx\n  - image: 7\n";

    let result = validator
        .validate(ValidationInput::bytes(doc.as_bytes(), DataFormat::Yaml).named("deploy.yaml"))
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!((result.errors[0].line, result.errors[0].column), (5, 5));
    assert!(format_results(&[result]).starts_with("FAIL: deploy.yaml\n  line 5, field \"containers.image\": "));
}

#[test]
fn test_missing_definition_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", r#"{"$defs": {"Other": {"type": "string"}}}"#);

    match Validator::new(&schema, "#Config") {
        Err(BridgeError::DefinitionNotFound { path, definition }) => {
            assert_eq!(path, schema);
            assert_eq!(definition, "#Config");
        }
        other => panic!("expected DefinitionNotFound, got {other:?}"),
    }
}

#[test]
fn test_broken_schema_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "schema.json", "broken syntax");
    assert!(matches!(
        Validator::new(&schema, "#Config"),
        Err(BridgeError::SchemaCompile { .. })
    ));

    assert!(matches!(
        Validator::new(dir.path().join("absent.json"), "#Config"),
        Err(BridgeError::SchemaRead { .. })
    ));
}

#[test]
fn test_malformed_json_is_invalid_result() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());
    let file = write(dir.path(), "invalid.json", r#"{"name": "test""#);

    let result = validator
        .validate(ValidationInput::file(&file, DataFormat::Json).named("invalid.json"))
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    let error = &result.errors[0];
    assert_eq!((error.line, error.column, error.path.as_str()), (0, 0, ""));
    assert!(error.message.starts_with("failed to parse: parsing JSON: "));
}

#[test]
fn test_malformed_yaml_is_invalid_result() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let result = validator
        .validate(ValidationInput::bytes(&b"name: [unclosed\n"[..], DataFormat::Yaml))
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("failed to parse: parsing YAML: "));
}

#[test]
fn test_empty_json_buffer_is_invalid_result() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let result = validator
        .validate(ValidationInput::bytes(Vec::<u8>::new(), DataFormat::Json))
        .unwrap();
    assert!(!result.valid);
    assert!(result.errors[0].message.starts_with("failed to parse"));
}

#[test]
fn test_absent_sources_are_process_errors() {
    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());

    let no_buffer = ValidationInput {
        source: InputSource::Bytes(None),
        format: DataFormat::Json,
        name: "buffer".into(),
    };
    assert!(matches!(validator.validate(no_buffer), Err(BridgeError::MissingData)));

    let no_reader = ValidationInput {
        source: InputSource::Reader(None),
        format: DataFormat::Yaml,
        name: "stream".into(),
    };
    assert!(matches!(validator.validate(no_reader), Err(BridgeError::MissingReader)));

    let missing = ValidationInput::file("/nonexistent/file.yaml", DataFormat::Yaml);
    assert!(matches!(validator.validate(missing), Err(BridgeError::ReadFile { .. })));
}

#[test]
fn test_list_index_segments() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "deployment.json", DEPLOYMENT_SCHEMA);
    let doc = "replicas: 2\ncontainers:\n  - image: nginx\n  - name: sidecar\n";

    let dropping = Validator::new(&schema, "#Deployment").unwrap();
    let result = dropping
        .validate(ValidationInput::bytes(doc.as_bytes(), DataFormat::Yaml))
        .unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "containers");

    let keeping = Validator::with_options(
        &schema,
        "#Deployment",
        ValidatorOptions::default().keep_index_segments(true),
    )
    .unwrap();
    let result = keeping
        .validate(ValidationInput::bytes(doc.as_bytes(), DataFormat::Yaml))
        .unwrap();
    assert_eq!(result.errors[0].path, "containers[1]");
}

#[test]
fn test_each_violation_reported() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(dir.path(), "deployment.json", DEPLOYMENT_SCHEMA);
    let validator = Validator::new(&schema, "#Deployment").unwrap();

    let result = validator
        .validate(ValidationInput::bytes(
            &br#"{"replicas": 0, "containers": [{"image": 1}]}"#[..],
            DataFormat::Json,
        ))
        .unwrap();
    let mut paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, ["containers.image", "replicas"]);
}

#[test]
fn test_validator_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Validator>();

    let dir = tempfile::tempdir().unwrap();
    let validator = config_validator(dir.path());
    std::thread::scope(|scope| {
        for i in 0..4 {
            let validator = &validator;
            scope.spawn(move || {
                let doc = format!(r#"{{"name": "worker-{i}"}}"#);
                let result = validator
                    .validate(ValidationInput::bytes(doc.into_bytes(), DataFormat::Json))
                    .unwrap();
                assert!(result.valid);
            });
        }
    });
}

#[test]
fn test_schema_files_are_not_reread_after_construction() {
    let dir = tempfile::tempdir().unwrap();
    let common = write(
        dir.path(),
        "common.json",
        r#"{"$defs": {"Port": {"type": "integer", "minimum": 1}}}"#,
    );
    let schema = write(
        dir.path(),
        "service.json",
        r#"{
            "$defs": {
                "Service": {
                    "type": "object",
                    "properties": { "port": { "$ref": "common.json#/$defs/Port" } }
                }
            }
        }"#,
    );
    let validator = Validator::new(&schema, "#Service").unwrap();
    let validate = || {
        validator
            .validate(ValidationInput::bytes(&br#"{"port": 0}"#[..], DataFormat::Json).named("svc.json"))
            .unwrap()
    };

    let before = validate();
    assert!(!before.valid);
    assert_eq!(before.errors[0].path, "port");

    std::fs::write(&common, r#"{"$defs": {"Port": {"type": "integer"}}}"#).unwrap();
    assert_eq!(validate(), before);

    std::fs::remove_file(&common).unwrap();
    std::fs::remove_file(&schema).unwrap();
    assert_eq!(validate(), before);
}

#[test]
fn test_escaped_labels_render_plainly() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "labels.json",
        r#"{"$defs": {"Labels": {"type": "object", "additionalProperties": {"type": "integer"}}}}"#,
    );
    let validator = Validator::new(&schema, "#Labels").unwrap();

    let result = validator
        .validate(ValidationInput::bytes(
            &br#"{"team\"lead": "x", "dir\\name": "y"}"#[..],
            DataFormat::Json,
        ))
        .unwrap();
    let mut paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, [r"dir\name", r#"team"lead"#]);
}
