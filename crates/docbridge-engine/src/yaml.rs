//! YAML to JSON data-model conversion.

use serde_json::Value as Json;
use serde_yaml::Value as Yaml;

/// Convert a parsed YAML tree into the JSON data model.
///
/// Tags are dropped and scalar mapping keys are stringified. Anything with
/// no JSON equivalent (non-scalar keys, non-finite floats) is an error.
pub(crate) fn yaml_to_json_value(yaml: &Yaml) -> Result<Json, String> {
    Ok(match yaml {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => number(n)?,
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(items) => Json::Array(
            items
                .iter()
                .map(yaml_to_json_value)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => Json::Object(
            map.iter()
                .map(|(k, v)| Ok((mapping_key(k)?, yaml_to_json_value(v)?)))
                .collect::<Result<_, String>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}

fn number(n: &serde_yaml::Number) -> Result<Json, String> {
    if let Some(i) = n.as_i64() {
        return Ok(Json::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Json::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Json::Number)
        .ok_or_else(|| format!("YAML number {n} has no JSON representation"))
}

fn mapping_key(key: &Yaml) -> Result<String, String> {
    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        other => Err(format!("unsupported YAML map key: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_nested_mapping() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(
            r#"
name: api
replicas: 3
ratio: 0.5
enabled: true
ports:
  - 80
  - 443
"#,
        )
        .unwrap();
        let json_value = yaml_to_json_value(&yaml_value).unwrap();

        assert_eq!(json_value["name"], "api");
        assert_eq!(json_value["replicas"], 3);
        assert_eq!(json_value["ratio"], 0.5);
        assert_eq!(json_value["enabled"], true);
        assert_eq!(json_value["ports"][1], 443);
    }

    #[test]
    fn stringifies_scalar_keys() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: enabled").unwrap();
        let json_value = yaml_to_json_value(&yaml_value).unwrap();
        assert_eq!(json_value["1"], "one");
        assert_eq!(json_value["true"], "enabled");
    }

    #[test]
    fn drops_tags() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str("port: !custom 8080").unwrap();
        assert_eq!(yaml_to_json_value(&yaml_value).unwrap()["port"], 8080);
    }

    #[test]
    fn rejects_non_finite_floats() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str("ratio: .nan").unwrap();
        assert!(yaml_to_json_value(&yaml_value).is_err());
    }

    #[test]
    fn rejects_sequence_keys() {
        let yaml_value: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: value").unwrap();
        let err = yaml_to_json_value(&yaml_value).unwrap_err();
        assert!(err.contains("unsupported YAML map key"), "got: {err}");
    }
}
