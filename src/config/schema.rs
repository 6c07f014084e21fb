//! Configuration schema types for `unibuild.toml`
//!
//! Defines the structure and validation rules for unibuild project configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::executor::Scene;

/// Top-level configuration loaded from `unibuild.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnibuildConfig {
    /// Project metadata
    pub project: ProjectConfig,
    /// Engine invocation settings
    #[serde(default)]
    pub engine: EngineConfig,
    /// Declared scenes, in build order
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl UnibuildConfig {
    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.project.name.trim().is_empty() {
            errors.push("project.name must not be empty".to_string());
        }
        for (index, scene) in self.scenes.iter().enumerate() {
            if scene.path.trim().is_empty() {
                errors.push(format!("scenes[{}].path must not be empty", index));
            }
        }
        if self.engine.build_method.trim().is_empty() {
            errors.push("engine.build_method must not be empty".to_string());
        }

        errors
    }
}

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Product name; the executable name is derived from it (required)
    pub name: String,
    /// Project version
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Engine invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine editor binary; probed at conventional paths when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
    /// Engine project root passed as -projectPath
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,
    /// Static method the engine executes to perform the build
    #[serde(default = "default_build_method")]
    pub build_method: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: None,
            project_path: default_project_path(),
            build_method: default_build_method(),
        }
    }
}

fn default_project_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_method() -> String {
    "Builder.Build".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses() {
        let config: UnibuildConfig = toml::from_str("[project]\nname = \"My Game\"").unwrap();
        assert_eq!(config.project.name, "My Game");
        assert_eq!(config.project.version, "0.1.0");
        assert_eq!(config.engine.project_path, PathBuf::from("."));
        assert_eq!(config.engine.build_method, "Builder.Build");
        assert!(config.engine.executable.is_none());
        assert!(config.scenes.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config: UnibuildConfig = toml::from_str(
            r#"
[project]
name = "Red Ball"
version = "1.2.0"

[engine]
executable = "/opt/unity/Editor/Unity"
project_path = "game"
build_method = "Builder.Build"

[[scenes]]
path = "Assets/Scenes/Menu.unity"

[[scenes]]
path = "Assets/Scenes/Level1.unity"
enabled = false
"#,
        )
        .unwrap();

        assert_eq!(config.project.version, "1.2.0");
        assert_eq!(config.engine.executable, Some(PathBuf::from("/opt/unity/Editor/Unity")));
        assert_eq!(config.scenes.len(), 2);
        assert!(config.scenes[0].enabled);
        assert!(!config.scenes[1].enabled);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_empty_name() {
        let config: UnibuildConfig = toml::from_str("[project]\nname = \"  \"").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("project.name"));
    }

    #[test]
    fn test_validate_empty_scene_path() {
        let config: UnibuildConfig =
            toml::from_str("[project]\nname = \"g\"\n\n[[scenes]]\npath = \"\"").unwrap();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("scenes[0].path")));
    }
}
