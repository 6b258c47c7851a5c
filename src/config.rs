use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};

/// Options for one compile call.
///
/// Loadable from YAML; every field is optional there.
///
/// ```yaml
/// runtimeHost: https://cdn.ampproject.org
/// storyVersion: "1.0"
/// lang: en
/// pretty: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Origin serving the AMP runtime and extensions
    pub runtime_host: String,
    /// Version of the `amp-story` extension
    pub story_version: String,
    /// `lang` attribute of the `<html>` element
    pub lang: String,
    /// Indent the output
    pub pretty: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            runtime_host: "https://cdn.ampproject.org".to_string(),
            story_version: "1.0".to_string(),
            lang: "en".to_string(),
            pretty: false,
        }
    }
}

impl CompileOptions {
    pub fn from_yaml_str(yaml: &str) -> StoryResult<Self> {
        let options: CompileOptions =
            serde_yaml::from_str(yaml).map_err(|e| StoryError::ConfigError(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> StoryResult<()> {
        if self.runtime_host.trim().is_empty() {
            return Err(StoryError::ConfigError("runtimeHost must not be empty".into()));
        }
        if self.story_version.trim().is_empty() {
            return Err(StoryError::ConfigError("storyVersion must not be empty".into()));
        }
        if self.lang.trim().is_empty() {
            return Err(StoryError::ConfigError("lang must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let o = CompileOptions::default();
        assert_eq!(o.runtime_host, "https://cdn.ampproject.org");
        assert_eq!(o.story_version, "1.0");
        assert_eq!(o.lang, "en");
        assert!(!o.pretty);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let o = CompileOptions::from_yaml_str("pretty: true\nlang: fr\n").unwrap();
        assert!(o.pretty);
        assert_eq!(o.lang, "fr");
        assert_eq!(o.story_version, "1.0");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = CompileOptions::from_yaml_str("runtimeHost: \"\"").unwrap_err();
        assert!(matches!(err, StoryError::ConfigError(_)));
    }

    #[test]
    fn unparseable_yaml_is_a_config_error() {
        let err = CompileOptions::from_yaml_str("pretty: [").unwrap_err();
        assert!(matches!(err, StoryError::ConfigError(_)));
    }
}
