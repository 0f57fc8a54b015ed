//! Integration test: compile schema files from disk, including external
//! `$ref`s resolved next to the schema file.

use std::path::Path;

use docbridge_engine::{Engine, EngineError, JsonSchemaEngine, JsonSchemaError};

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

fn check(engine: &JsonSchemaEngine, schema_path: &str, definition: &str, doc: &str) -> Result<(), JsonSchemaError> {
    let source = std::fs::read(schema_path).unwrap();
    let schema = engine.compile(&source, schema_path).unwrap();
    let def = engine.lookup(&schema, definition).unwrap();
    let data = engine.extract_json("doc.json", doc.as_bytes()).unwrap();
    engine.validate_concrete(&engine.unify(&def, &data))
}

#[test]
fn test_external_ref_resolves_from_schema_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "common.json",
        r#"{"$defs": {"Port": {"type": "integer", "minimum": 1, "maximum": 65535}}}"#,
    );
    let schema_path = write(
        dir.path(),
        "service.json",
        r#"{
            "$defs": {
                "Service": {
                    "type": "object",
                    "properties": { "port": { "$ref": "common.json#/$defs/Port" } },
                    "required": ["port"]
                }
            }
        }"#,
    );

    let engine = JsonSchemaEngine::new();
    check(&engine, &schema_path, "#Service", r#"{"port": 8080}"#).unwrap();

    let err = check(&engine, &schema_path, "#Service", r#"{"port": 0}"#).unwrap_err();
    let errors = err.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path(), vec!["#Service", "port"]);
}

#[test]
fn test_missing_external_ref_leaves_definition_unusable() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write(
        dir.path(),
        "service.json",
        r#"{"$defs": {"Service": {"$ref": "missing.json#/$defs/Nope"}}}"#,
    );

    let engine = JsonSchemaEngine::new();
    let source = std::fs::read(&schema_path).unwrap();
    let usable = engine
        .compile(&source, &schema_path)
        .ok()
        .and_then(|schema| engine.lookup(&schema, "#Service"));
    assert!(usable.is_none());
}

#[test]
fn test_yaml_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = write(
        dir.path(),
        "schema.yaml",
        "$defs:\n  Config:\n    type: object\n    properties:\n      replicas:\n        type: integer\n        minimum: 1\n",
    );

    let engine = JsonSchemaEngine::new();
    check(&engine, &schema_path, "#Config", r#"{"replicas": 3}"#).unwrap();
    let err = check(&engine, &schema_path, "#Config", r#"{"replicas": 0}"#).unwrap_err();
    assert_eq!(err.errors()[0].path(), vec!["#Config", "replicas"]);
}
