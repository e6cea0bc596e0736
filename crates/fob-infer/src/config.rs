use serde::{Deserialize, Serialize};

/// Host environment whose globals are predeclared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `window` and `self` alias the root object.
    #[default]
    Browser,
    /// `global` aliases the root object; `exports` and `module.exports` exist.
    Node,
}

/// Options of an [`Inference`](crate::Inference) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferOptions {
    /// Maximum iterations of any single loop.
    pub max_loops: usize,
    /// Maximum nesting of script function calls.
    pub max_call_depth: usize,
    /// Fail on unresolved references instead of creating placeholders.
    pub strict: bool,
    /// Keep diagnostics for unsupported constructs and warnings.
    pub debug: bool,
    pub environment: Environment,
    /// Default for [`TableOptions::missing`](crate::TableOptions).
    pub include_missing: bool,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            max_loops: 1000,
            max_call_depth: 64,
            strict: false,
            debug: false,
            environment: Environment::Browser,
            include_missing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: InferOptions =
            serde_json::from_str(r#"{ "maxLoops": 5, "environment": "node" }"#).expect("json");
        assert_eq!(options.max_loops, 5);
        assert_eq!(options.environment, Environment::Node);
        assert_eq!(options.max_call_depth, 64);
        assert!(!options.strict);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(InferOptions::default()).expect("json");
        assert_eq!(json["maxLoops"], 1000);
        assert_eq!(json["includeMissing"], false);
        assert_eq!(json["environment"], "browser");
    }
}
