use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types that can be requested as structured output.
///
/// Automatically implemented for any type that implements
/// `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a JSON schema in the strict form structured-output mode
    /// expects:
    /// 1. `additionalProperties: false` on every object schema
    /// 2. ALL properties listed in `required`, even nullable ones
    /// 3. Fully inlined schemas (no `$ref` references)
    fn structured_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        strictify(&mut value);
        inline_refs(&mut value);

        if let serde_json::Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

fn strictify(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );

                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), serde_json::Value::Array(all_keys));
                }
            }

            for (_, v) in map.iter_mut() {
                strictify(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                strictify(item);
            }
        }
        _ => {}
    }
}

fn inline_refs(value: &mut serde_json::Value) {
    let Some(defs) = value
        .as_object()
        .and_then(|map| map.get("definitions"))
        .cloned()
    else {
        return;
    };
    resolve_node(value, &defs);
}

/// Replace `$ref` nodes with their definition and collapse the one-element
/// `allOf` wrappers schemars emits around referenced types. A node may need
/// several substitution rounds before its children can be walked.
fn resolve_node(node: &mut serde_json::Value, defs: &serde_json::Value) {
    loop {
        let map = match node {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Array(items) => {
                for item in items {
                    resolve_node(item, defs);
                }
                return;
            }
            _ => return,
        };

        let referenced = map
            .get("$ref")
            .and_then(serde_json::Value::as_str)
            .and_then(|path| path.strip_prefix("#/definitions/"))
            .and_then(|name| defs.get(name))
            .cloned();
        if let Some(definition) = referenced {
            *node = definition;
            continue;
        }

        if let Some(wrapped) = map.get_mut("allOf").and_then(serde_json::Value::as_array_mut) {
            if wrapped.len() == 1 {
                let inner = wrapped.remove(0);
                *node = inner;
                continue;
            }
        }

        for child in map.values_mut() {
            resolve_node(child, defs);
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct SkillVerdict {
        matched: Vec<String>,
        score: i64,
        notes: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct ExtractedPerson {
        name: String,
        title: String,
        company: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct PeopleList {
        people: Vec<ExtractedPerson>,
    }

    #[test]
    fn object_schemas_forbid_extra_properties() {
        let schema = SkillVerdict::structured_schema();
        assert_eq!(
            schema.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false))
        );
    }

    #[test]
    fn nullable_fields_are_still_required() {
        let schema = SkillVerdict::structured_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert!(required.contains(&"matched"));
        assert!(required.contains(&"score"));
        assert!(required.contains(&"notes"));
    }

    #[test]
    fn nested_types_are_inlined() {
        let schema = PeopleList::structured_schema();
        let obj = schema.as_object().unwrap();

        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));

        let items = &schema["properties"]["people"]["items"];
        assert!(items.get("$ref").is_none());
        assert_eq!(
            items.get("type"),
            Some(&serde_json::Value::String("object".to_string()))
        );
    }
}
