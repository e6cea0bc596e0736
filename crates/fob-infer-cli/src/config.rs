//! Layered engine configuration.
//!
//! Priority: CLI flags > `FOB_INFER_*` environment variables > config file >
//! engine defaults.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
    value::Uncased,
};
use fob_infer::{Environment, InferOptions};
use serde::Serialize;

use crate::cli::InferArgs;
use crate::error::{ConfigError, Result};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fob-infer.json";

/// Prefix of environment overrides, e.g. `FOB_INFER_MAX_LOOPS=50`.
pub const ENV_PREFIX: &str = "FOB_INFER_";

/// Flags the user actually passed. Unset fields do not shadow lower layers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_loops: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_call_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<Environment>,
}

impl From<&InferArgs> for Overrides {
    fn from(args: &InferArgs) -> Self {
        Self {
            max_loops: args.max_loops,
            max_call_depth: args.max_call_depth,
            strict: args.strict.then_some(true),
            debug: args.debug.then_some(true),
            environment: args.environment.map(Into::into),
        }
    }
}

/// Load the engine options for a command.
pub fn load_options(args: &InferArgs) -> Result<InferOptions> {
    let mut figment = Figment::new().merge(Serialized::defaults(InferOptions::default()));

    let config_file = match &args.config {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.clone()).into()),
        Some(path) => Some(path.clone()),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            default_path.exists().then(|| default_path.to_path_buf())
        }
    };

    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "loading config file");
        figment = figment.merge(Json::file(path));
    }

    figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .map(|key| Uncased::from(camel_case(key.as_str())))
            .lowercase(false),
    );

    figment = figment.merge(Serialized::defaults(Overrides::from(args)));

    figment.extract().map_err(|e| {
        ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {DEFAULT_CONFIG_FILE} syntax and {ENV_PREFIX}* variables"),
        }
        .into()
    })
}

/// `MAX_LOOPS` -> `maxLoops`
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EnvironmentArg;
    use figment::Jail;

    #[test]
    fn env_keys_become_camel_case() {
        assert_eq!(camel_case("MAX_LOOPS"), "maxLoops");
        assert_eq!(camel_case("MAX_CALL_DEPTH"), "maxCallDepth");
        assert_eq!(camel_case("STRICT"), "strict");
    }

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|_jail| {
            let options = load_options(&InferArgs::default()).map_err(|e| e.to_string())?;
            assert_eq!(options, InferOptions::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_then_flags() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"{ "maxLoops": 5, "maxCallDepth": 8, "environment": "node" }"#,
            )?;
            jail.set_env("FOB_INFER_MAX_LOOPS", 7);
            jail.set_env("FOB_INFER_INCLUDE_MISSING", true);

            let options = load_options(&InferArgs::default()).map_err(|e| e.to_string())?;
            assert_eq!(options.max_loops, 7);
            assert_eq!(options.max_call_depth, 8);
            assert_eq!(options.environment, Environment::Node);
            assert!(options.include_missing);

            let args = InferArgs {
                max_loops: Some(3),
                strict: true,
                environment: Some(EnvironmentArg::Browser),
                ..InferArgs::default()
            };
            let options = load_options(&args).map_err(|e| e.to_string())?;
            assert_eq!(options.max_loops, 3);
            assert!(options.strict);
            assert_eq!(options.environment, Environment::Browser);
            assert_eq!(options.max_call_depth, 8);
            Ok(())
        });
    }

    #[test]
    fn explicit_config_must_exist() {
        Jail::expect_with(|_jail| {
            let args = InferArgs {
                config: Some("nowhere.json".into()),
                ..InferArgs::default()
            };
            assert!(matches!(
                load_options(&args),
                Err(crate::error::CliError::Config(ConfigError::NotFound(_)))
            ));
            Ok(())
        });
    }

    #[test]
    fn bad_values_are_reported() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.json", r#"{ "maxLoops": "many" }"#)?;
            let args = InferArgs {
                config: Some("custom.json".into()),
                ..InferArgs::default()
            };
            assert!(matches!(
                load_options(&args),
                Err(crate::error::CliError::Config(ConfigError::InvalidValue { .. }))
            ));
            Ok(())
        });
    }
}
