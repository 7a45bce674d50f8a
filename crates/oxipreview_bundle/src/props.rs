use log::trace;
use serde_json::{Map, Value};

/// Example value for one required prop.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExampleValue {
    Text(String),
    Handler(String),
    Flag(bool),
}

impl ExampleValue {
    fn for_prop(name: &str) -> Self {
        let value = match name {
            "title" | "label" | "text" => Self::Text(format!("Example {}", name)),
            "children" => Self::Text("Preview content".to_string()),
            _ if is_prefixed(name, "on") => Self::Handler(name.to_string()),
            _ if ["is", "has", "show"].iter().any(|prefix| is_prefixed(name, prefix)) => {
                Self::Flag(false)
            }
            _ => Self::Text(format!("Sample {}", name)),
        };
        trace!("Example value for prop '{}': {:?}", name, value);
        value
    }

    fn to_js(&self) -> String {
        match self {
            Self::Text(text) => Value::String(text.clone()).to_string(),
            Self::Handler(name) => format!(
                "(...args) => console.log({}, ...args)",
                Value::String(format!("[preview] {}", name))
            ),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

/// `name` is `prefix` followed by an uppercase letter, like `onClick` or `isOpen`
fn is_prefixed(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix).is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// JavaScript object literal passed to the previewed component.
///
/// Explicit props are serialized as JSON and used verbatim. Otherwise every
/// required prop gets an example value; optional props are left out.
pub fn example_props_source(explicit: Option<&Map<String, Value>>, required: &[String]) -> String {
    if let Some(props) = explicit {
        return Value::Object(props.clone()).to_string();
    }
    if required.is_empty() {
        return "{}".to_string();
    }

    let fields: Vec<String> = required
        .iter()
        .map(|name| {
            format!("  {}: {}", Value::String(name.clone()), ExampleValue::for_prop(name).to_js())
        })
        .collect();
    format!("{{\n{},\n}}", fields.join(",\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_required_props_is_empty_object() {
        assert_eq!(example_props_source(None, &[]), "{}");
    }

    #[test]
    fn test_inferred_values() {
        let source = example_props_source(
            None,
            &names(&["title", "onClick", "children", "isOpen", "variant"]),
        );
        assert_eq!(
            source,
            "{\n  \"title\": \"Example title\",\n  \
             \"onClick\": (...args) => console.log(\"[preview] onClick\", ...args),\n  \
             \"children\": \"Preview content\",\n  \
             \"isOpen\": false,\n  \
             \"variant\": \"Sample variant\",\n}"
        );
    }

    #[test]
    fn test_prefix_needs_uppercase_boundary() {
        assert_eq!(ExampleValue::for_prop("once"), ExampleValue::Text("Sample once".to_string()));
        assert_eq!(ExampleValue::for_prop("island"), ExampleValue::Text("Sample island".to_string()));
        assert_eq!(ExampleValue::for_prop("onChange"), ExampleValue::Handler("onChange".to_string()));
        assert_eq!(ExampleValue::for_prop("showIcon"), ExampleValue::Flag(false));
    }

    #[test]
    fn test_explicit_props_are_serialized_verbatim() {
        let props = json!({ "title": "</script><b>\"hi\"</b>", "count": 3 });
        let source = example_props_source(props.as_object(), &names(&["title", "onClick"]));
        assert_eq!(source, props.to_string());
        assert!(!source.contains("onClick"));
    }

    #[test]
    fn test_names_are_escaped() {
        let source = example_props_source(None, &names(&["data-\"x\""]));
        assert!(source.contains(r#""data-\"x\"": "Sample data-\"x\"""#));
    }
}
