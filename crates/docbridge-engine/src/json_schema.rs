//! # JSON Schema Engine
//!
//! An [`Engine`] backed by the `jsonschema` crate (Draft 2020-12 unless the
//! schema declares its own `$schema`).
//!
//! ## Definitions
//!
//! Definition names follow the `#Name` convention and resolve to
//! `/$defs/Name`, falling back to `/definitions/Name`. A name of the form
//! `#/json/pointer` resolves to that pointer, `#` (or the empty string) to
//! the document root, and any other name is treated as a dot-separated
//! path inside the document.
//!
//! ## Schema Resolution
//!
//! Internal `$ref`s (`#/$defs/...`) are resolved by the jsonschema crate
//! natively. External `$ref`s are resolved only against files that sit
//! next to the schema file; the engine never touches the network.
//!
//! ## Values
//!
//! A [`Value`] is a bag of constraints and documents. Unification merges
//! bags; checking happens only in `validate_concrete`, where a value with
//! no document is incomplete and two unequal documents conflict.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use parking_lot::RwLock;
use serde_json::Value as Json;
use thiserror::Error;

use crate::locate::{locate, Syntax};
use crate::traits::{Diagnostic, Engine, EngineError, Position};
use crate::yaml::yaml_to_json_value;

/// Top-level keys carried from the schema root into a definition's
/// compiled schema so that internal `$ref`s keep resolving.
const SCOPE_KEYS: [&str; 4] = ["$schema", "$id", "$defs", "definitions"];

/// Retriever that resolves external `$ref` URIs to files next to the
/// schema file.
///
/// This prevents the jsonschema crate from making network requests.
struct LocalSchemaRetriever {
    base_dir: Option<PathBuf>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Json, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let without_fragment = uri_str.split('#').next().unwrap_or(uri_str);
        let filename = without_fragment
            .rsplit('/')
            .next()
            .unwrap_or(without_fragment);

        let base_dir = self.base_dir.as_ref().ok_or_else(|| {
            format!("cannot resolve external reference '{uri_str}': schema has no base directory")
        })?;
        let path = base_dir.join(filename);
        let content = std::fs::read(&path).map_err(|e| {
            format!(
                "cannot resolve external reference '{uri_str}' from {}: {e}",
                path.display()
            )
        })?;

        tracing::debug!(uri = uri_str, path = %path.display(), "resolved external schema reference");
        Ok(parse_schema_text(&content, &path.display().to_string())?)
    }
}

/// Error produced by the JSON Schema engine.
#[derive(Error, Debug)]
pub enum JsonSchemaError {
    /// Schema or document text is not well-formed JSON/YAML.
    #[error("{label}: {message}")]
    Syntax {
        /// Filename or document label.
        label: String,
        /// Parser message.
        message: String,
        /// Where the parser stopped, if it reported a location.
        position: Option<Position>,
    },

    /// The schema document is well-formed but not a valid JSON Schema.
    #[error("{filename}: invalid schema: {reason}")]
    InvalidSchema {
        /// Schema filename.
        filename: String,
        /// Reason reported by the schema compiler.
        reason: String,
    },

    /// A definition was checked without any document unified into it.
    #[error("incomplete value: {definition} has no concrete data")]
    Incomplete {
        /// The definition that stayed abstract.
        definition: String,
    },

    /// Two different documents were unified into the same value.
    #[error("conflicting values: documents '{first}' and '{second}' differ")]
    Conflict {
        /// Label of the first document.
        first: String,
        /// Label of the first document that disagrees with it.
        second: String,
    },

    /// The document violates one or more constraints.
    #[error("{0}")]
    Violations(Violations),
}

impl Diagnostic for JsonSchemaError {
    fn positions(&self) -> Vec<Position> {
        match self {
            Self::Syntax {
                position: Some(position),
                ..
            } => vec![*position],
            _ => Vec::new(),
        }
    }

    fn path(&self) -> Vec<String> {
        match self {
            Self::Incomplete { definition } => vec![definition.clone()],
            _ => Vec::new(),
        }
    }
}

impl EngineError for JsonSchemaError {
    fn errors(&self) -> Vec<&dyn Diagnostic> {
        match self {
            Self::Violations(violations) => violations
                .iter()
                .map(|v| v as &dyn Diagnostic)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A single constraint violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Field path: the definition label, then one segment per field.
    /// Array elements are `[index]`; labels that are not plain
    /// identifiers are quoted.
    pub path: Vec<String>,
    /// JSON Pointer to the violating value in the document.
    pub instance_path: String,
    /// Where the violating value sits in the document text. `None` for
    /// the document root or a value that could not be located.
    pub position: Option<Position>,
    /// JSON Pointer within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Diagnostic for Violation {
    fn positions(&self) -> Vec<Position> {
        self.position.into_iter().collect()
    }

    fn path(&self) -> Vec<String> {
        self.path.clone()
    }
}

/// Collection of violations, in the order the validator produced them.
#[derive(Debug, Clone)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterate over the violations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let joined = v.path.join(".");
            if joined.is_empty() {
                write!(f, "{v}")?;
            } else {
                write!(f, "{joined}: {v}")?;
            }
        }
        Ok(())
    }
}

/// A parsed and compiled schema document.
///
/// Each definition is compiled on its first lookup and cached; later
/// lookups of the same name return the cached constraint without touching
/// the filesystem.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    filename: String,
    root: Arc<Json>,
    base_dir: Option<PathBuf>,
    constraints: Arc<RwLock<HashMap<String, Arc<Constraint>>>>,
}

impl SchemaDocument {
    /// The filename the schema was compiled under.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The schema document as JSON.
    pub fn root(&self) -> &Json {
        &self.root
    }
}

/// A compiled definition, ready to be applied to documents.
pub struct Constraint {
    definition: String,
    pointer: String,
    validator: Validator,
}

impl Constraint {
    /// The definition name this constraint was looked up by.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// JSON Pointer of the definition inside the schema document.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("definition", &self.definition)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Document {
    label: String,
    data: Json,
    source: String,
    syntax: Syntax,
}

/// An engine value: the constraints and documents unified so far.
#[derive(Debug, Clone, Default)]
pub struct Value {
    constraints: Vec<Arc<Constraint>>,
    documents: Vec<Arc<Document>>,
}

impl Value {
    fn constraint(constraint: Arc<Constraint>) -> Self {
        Self {
            constraints: vec![constraint],
            documents: Vec::new(),
        }
    }

    fn document(label: &str, data: Json, source: &[u8], syntax: Syntax) -> Self {
        Self {
            constraints: Vec::new(),
            documents: vec![Arc::new(Document {
                label: label.to_string(),
                data,
                source: String::from_utf8_lossy(source).into_owned(),
                syntax,
            })],
        }
    }

    /// The constraints carried by this value.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().map(|c| c.as_ref())
    }

    /// The concrete data of the first document, if any.
    pub fn data(&self) -> Option<&Json> {
        self.documents.first().map(|d| &d.data)
    }

    /// Returns true if no document has been unified into this value.
    pub fn is_abstract(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Schema engine backed by the `jsonschema` crate.
///
/// ## Thread Safety
///
/// The engine and every value it produces are `Send + Sync`; compiled
/// validators can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaEngine {
    _private: (),
}

impl JsonSchemaEngine {
    /// Create a fresh engine context.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build `ValidationOptions` with a local-only retriever.
    fn build_options(&self, root: &Json, base_dir: Option<&Path>) -> ValidationOptions {
        let mut opts = jsonschema::options();
        if root.get("$schema").is_none() {
            opts.with_draft(jsonschema::Draft::Draft202012);
        }
        opts.with_retriever(LocalSchemaRetriever {
            base_dir: base_dir.map(Path::to_path_buf),
        });
        opts
    }
}

impl Engine for JsonSchemaEngine {
    type Schema = SchemaDocument;
    type Value = Value;
    type Error = JsonSchemaError;

    fn compile(&self, source: &[u8], filename: &str) -> Result<SchemaDocument, JsonSchemaError> {
        let root = parse_schema_text(source, filename)?;
        let base_dir = Path::new(filename).parent().map(Path::to_path_buf);

        // Compile the whole document once so schema errors surface here,
        // not on the first lookup.
        self.build_options(&root, base_dir.as_deref())
            .build(&root)
            .map_err(|e| JsonSchemaError::InvalidSchema {
                filename: filename.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(filename, "compiled schema document");
        Ok(SchemaDocument {
            filename: filename.to_string(),
            root: Arc::new(root),
            base_dir,
            constraints: Arc::default(),
        })
    }

    fn lookup(&self, schema: &SchemaDocument, path: &str) -> Option<Value> {
        if let Some(cached) = schema.constraints.read().get(path) {
            return Some(Value::constraint(Arc::clone(cached)));
        }

        let pointer = definition_pointer(&schema.root, path)?;
        let subschema = scoped_subschema(&schema.root, &pointer);

        let validator = match self
            .build_options(&schema.root, schema.base_dir.as_deref())
            .build(&subschema)
        {
            Ok(validator) => validator,
            Err(e) => {
                tracing::warn!(
                    filename = %schema.filename,
                    definition = path,
                    error = %e,
                    "definition exists but does not compile"
                );
                return None;
            }
        };

        tracing::debug!(filename = %schema.filename, definition = path, %pointer, "compiled definition");
        let constraint = Arc::clone(
            schema
                .constraints
                .write()
                .entry(path.to_string())
                .or_insert_with(|| {
                    Arc::new(Constraint {
                        definition: path.to_string(),
                        pointer,
                        validator,
                    })
                }),
        );
        Some(Value::constraint(constraint))
    }

    fn extract_json(&self, label: &str, data: &[u8]) -> Result<Value, JsonSchemaError> {
        let json: Json = serde_json::from_slice(data).map_err(|e| json_syntax_error(label, &e))?;
        Ok(Value::document(label, json, data, Syntax::Json))
    }

    fn extract_yaml(&self, label: &str, data: &[u8]) -> Result<Value, JsonSchemaError> {
        let json = parse_yaml(data, label)?;
        Ok(Value::document(label, json, data, Syntax::Yaml))
    }

    fn unify(&self, a: &Value, b: &Value) -> Value {
        let mut unified = a.clone();
        unified.constraints.extend(b.constraints.iter().cloned());
        unified.documents.extend(b.documents.iter().cloned());
        unified
    }

    fn validate_concrete(&self, value: &Value) -> Result<(), JsonSchemaError> {
        let Some(first) = value.documents.first() else {
            let definition = value
                .constraints
                .first()
                .map(|c| c.definition.clone())
                .unwrap_or_else(|| "value".to_string());
            return Err(JsonSchemaError::Incomplete { definition });
        };

        if let Some(other) = value.documents.iter().skip(1).find(|d| d.data != first.data) {
            return Err(JsonSchemaError::Conflict {
                first: first.label.clone(),
                second: other.label.clone(),
            });
        }

        let mut violations = Vec::new();
        for constraint in &value.constraints {
            for error in constraint.validator.iter_errors(&first.data) {
                let instance_path = error.instance_path.to_string();
                violations.push(Violation {
                    path: field_path(&constraint.definition, &first.data, &instance_path),
                    position: locate(&first.source, first.syntax, &instance_path),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                    instance_path,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                document = %first.label,
                count = violations.len(),
                "document violates schema constraints"
            );
            Err(JsonSchemaError::Violations(Violations { violations }))
        }
    }
}

/// Parse schema text as YAML when the filename says so, JSON otherwise.
fn parse_schema_text(source: &[u8], filename: &str) -> Result<Json, JsonSchemaError> {
    if filename.ends_with(".yaml") || filename.ends_with(".yml") {
        parse_yaml(source, filename)
    } else {
        serde_json::from_slice(source).map_err(|e| json_syntax_error(filename, &e))
    }
}

fn parse_yaml(data: &[u8], label: &str) -> Result<Json, JsonSchemaError> {
    let yaml: serde_yaml::Value = serde_yaml::from_slice(data).map_err(|e| JsonSchemaError::Syntax {
        label: label.to_string(),
        message: e.to_string(),
        position: e
            .location()
            .map(|loc| Position::new(loc.line(), loc.column())),
    })?;
    yaml_to_json_value(&yaml).map_err(|message| JsonSchemaError::Syntax {
        label: label.to_string(),
        message,
        position: None,
    })
}

fn json_syntax_error(label: &str, e: &serde_json::Error) -> JsonSchemaError {
    let position = (e.line() > 0).then(|| Position::new(e.line(), e.column()));
    JsonSchemaError::Syntax {
        label: label.to_string(),
        message: e.to_string(),
        position,
    }
}

/// Map a definition name to the JSON Pointer of an existing value.
fn definition_pointer(root: &Json, path: &str) -> Option<String> {
    let candidates: Vec<String> = if path.is_empty() || path == "#" {
        vec![String::new()]
    } else if let Some(pointer) = path.strip_prefix('#').filter(|p| p.starts_with('/')) {
        vec![pointer.to_string()]
    } else if let Some(name) = path.strip_prefix('#') {
        let token = escape_pointer_token(name);
        vec![format!("/$defs/{token}"), format!("/definitions/{token}")]
    } else {
        vec![path
            .split('.')
            .map(|segment| format!("/{}", escape_pointer_token(segment)))
            .collect()]
    };

    candidates
        .into_iter()
        .find(|pointer| root.pointer(pointer).is_some())
}

/// Build a schema that applies the value at `pointer` while keeping the
/// root's `$defs`/`definitions` in scope.
fn scoped_subschema(root: &Json, pointer: &str) -> Json {
    if pointer.is_empty() {
        return root.clone();
    }

    let mut wrapper = serde_json::Map::new();
    if let Some(object) = root.as_object() {
        for key in SCOPE_KEYS {
            if let Some(value) = object.get(key) {
                wrapper.insert(key.to_string(), value.clone());
            }
        }
    }
    wrapper.insert(
        "$ref".to_string(),
        Json::String(format!("#{}", encode_fragment(pointer))),
    );
    Json::Object(wrapper)
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Percent-encode a JSON Pointer for use as a URI fragment.
fn encode_fragment(pointer: &str) -> String {
    let mut encoded = String::with_capacity(pointer.len());
    for byte in pointer.bytes() {
        let keep = byte.is_ascii_alphanumeric() || b"-._~/$!&'()*+,;=:@".contains(&byte);
        if keep {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Translate a JSON Pointer into the document into engine path segments,
/// led by the definition label.
fn field_path(definition: &str, data: &Json, instance_path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    if !definition.is_empty() {
        segments.push(definition.to_string());
    }

    let mut current = Some(data);
    for raw in instance_path.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Json::Array(items)) => {
                current = token.parse::<usize>().ok().and_then(|i| items.get(i));
                segments.push(format!("[{token}]"));
            }
            Some(Json::Object(map)) => {
                current = map.get(&token);
                segments.push(quote_label(&token));
            }
            _ => {
                current = None;
                segments.push(quote_label(&token));
            }
        }
    }
    segments
}

/// Quote a field label unless it is a plain identifier.
fn quote_label(label: &str) -> String {
    let mut chars = label.chars();
    let is_identifier = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        None => false,
    };
    if is_identifier {
        label.to_string()
    } else {
        Json::String(label.to_string()).to_string()
    }
}
