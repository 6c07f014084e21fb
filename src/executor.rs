//! Build executor and scene provider seams.
//!
//! The dispatcher never packages anything itself: it hands a resolved
//! request to a [`BuildExecutor`] and reports whatever the executor says.
//! [`EngineExecutor`] is the production implementation, spawning the engine
//! binary in batch mode; tests substitute recording mocks.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::PlatformId;

/// One content unit ("scene") that may be included in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene asset path, engine-relative
    pub path: String,
    /// Disabled scenes stay declared but are excluded from builds
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Scene {
    /// Create an enabled scene entry.
    pub fn enabled(path: &str) -> Self {
        Self { path: path.to_string(), enabled: true }
    }

    /// Create a disabled scene entry.
    pub fn disabled(path: &str) -> Self {
        Self { path: path.to_string(), enabled: false }
    }
}

/// Supplies the declared scene list, in order.
pub trait SceneProvider {
    /// All declared scenes in declared order, enabled or not.
    fn scenes(&self) -> Vec<Scene>;

    /// Paths of enabled scenes, declared order preserved.
    ///
    /// An empty result is passed through to the executor unchanged;
    /// whether a zero-scene build makes sense is the executor's concern.
    fn enabled_paths(&self) -> Vec<String> {
        self.scenes().into_iter().filter(|s| s.enabled).map(|s| s.path).collect()
    }
}

/// Scene provider backed by the `[[scenes]]` config table.
#[derive(Debug, Clone, Default)]
pub struct ConfigScenes {
    scenes: Vec<Scene>,
}

impl ConfigScenes {
    /// Wrap a declared scene list.
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self { scenes }
    }
}

impl SceneProvider for ConfigScenes {
    fn scenes(&self) -> Vec<Scene> {
        self.scenes.clone()
    }
}

/// Option flags forwarded to the executor.
///
/// Defaults to no options. The development pair used to be a dead branch in
/// the original tooling; here it is live and driven by the CLI `--debug`
/// flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Produce a development build
    pub development: bool,
    /// Allow script debugger attachment
    pub allow_debugging: bool,
}

impl BuildOptions {
    /// No options; the normal release configuration.
    pub fn none() -> Self {
        Self::default()
    }

    /// Development build with debugging allowed.
    pub fn debug() -> Self {
        Self { development: true, allow_debugging: true }
    }
}

/// A fully resolved request handed to a build executor.
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    /// Enabled scene paths, declared order preserved
    pub scenes: Vec<String>,
    /// File (named executable) or directory (artifact folder) to produce
    pub destination: PathBuf,
    /// Engine platform identifier
    pub platform_id: PlatformId,
    /// Registry token for the platform, for engine command lines
    pub token: String,
    /// Option flags
    pub options: BuildOptions,
}

/// What the executor reported about its own run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorReport {
    /// Executor completed and claimed success
    Succeeded,
    /// Executor completed and reported failure
    Failed(String),
}

impl ExecutorReport {
    /// Check if the report indicates success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutorReport::Succeeded)
    }
}

impl std::fmt::Display for ExecutorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutorReport::Succeeded => write!(f, "succeeded"),
            ExecutorReport::Failed(detail) => write!(f, "failed: {}", detail),
        }
    }
}

/// Error invoking a build executor.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Engine binary could not be started
    #[error("failed to spawn engine process: {0}")]
    Spawn(#[from] std::io::Error),
    /// No engine executable configured and none found at conventional paths
    #[error("no engine executable configured; set [engine].executable in unibuild.toml")]
    MissingEngine,
}

/// Performs the actual packaging for a resolved request.
///
/// The call blocks for the duration of the build, possibly minutes.
pub trait BuildExecutor {
    /// Run one build. `Err` means the executor could not run at all;
    /// `Ok(Failed(..))` means it ran and reported failure itself.
    fn execute(&self, request: &ExecuteRequest) -> Result<ExecutorReport, ExecutorError>;
}

/// Production executor: spawns the engine binary in batch mode.
///
/// Mirrors the conventional automation command line:
/// `<engine> -quit -batchmode -nographics -projectPath <p>
/// -executeMethod <m> -buildTarget <token> -outputPath <dest>`.
#[derive(Debug, Clone)]
pub struct EngineExecutor {
    executable: PathBuf,
    project_path: PathBuf,
    build_method: String,
}

impl EngineExecutor {
    /// Create an executor for a known engine binary.
    pub fn new(executable: PathBuf, project_path: PathBuf, build_method: String) -> Self {
        Self { executable, project_path, build_method }
    }

    /// Create an executor, probing conventional install paths when no
    /// explicit executable is configured.
    pub fn locate(
        executable: Option<PathBuf>,
        project_path: PathBuf,
        build_method: String,
    ) -> Result<Self, ExecutorError> {
        let executable = match executable {
            Some(path) => path,
            None => locate_engine().ok_or(ExecutorError::MissingEngine)?,
        };
        Ok(Self::new(executable, project_path, build_method))
    }

    /// The engine binary this executor will spawn.
    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl BuildExecutor for EngineExecutor {
    fn execute(&self, request: &ExecuteRequest) -> Result<ExecutorReport, ExecutorError> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-quit")
            .arg("-batchmode")
            .arg("-nographics")
            .arg("-projectPath")
            .arg(&self.project_path)
            .arg("-executeMethod")
            .arg(&self.build_method)
            .arg("-buildTarget")
            .arg(&request.token)
            .arg("-outputPath")
            .arg(&request.destination);

        if request.options.development {
            cmd.arg("-development");
        }
        if request.options.allow_debugging {
            cmd.arg("-allowDebugging");
        }

        let status = cmd.status()?;
        if status.success() {
            Ok(ExecutorReport::Succeeded)
        } else {
            let detail = match status.code() {
                Some(code) => format!("engine exited with code {}", code),
                None => "engine terminated by signal".to_string(),
            };
            Ok(ExecutorReport::Failed(detail))
        }
    }
}

/// Probe conventional per-OS engine install locations.
fn locate_engine() -> Option<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            "C:\\Program Files\\Unity\\Hub\\Editor",
            "C:\\Program Files\\Unity\\Editor\\Unity.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &["/Applications/Unity/Hub/Editor", "/Applications/Unity/Unity.app/Contents/MacOS/Unity"]
    } else {
        &["/opt/unity/Editor/Unity", "/usr/bin/unity-editor"]
    };

    for candidate in candidates {
        let path = Path::new(candidate);
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        // Hub layout: <hub>/Editor/<version>/... - take the first installed version
        if path.is_dir() {
            if let Some(found) = first_hub_editor(path) {
                return Some(found);
            }
        }
    }
    None
}

/// Find the first editor binary under a hub-style install root.
fn first_hub_editor(root: &Path) -> Option<PathBuf> {
    let mut versions: Vec<PathBuf> =
        std::fs::read_dir(root).ok()?.filter_map(|e| e.ok().map(|e| e.path())).collect();
    versions.sort();

    let suffix: &[&str] = if cfg!(target_os = "windows") {
        &["Editor", "Unity.exe"]
    } else if cfg!(target_os = "macos") {
        &["Unity.app", "Contents", "MacOS", "Unity"]
    } else {
        &["Editor", "Unity"]
    };

    for version_dir in versions {
        let mut candidate = version_dir;
        for part in suffix {
            candidate = candidate.join(part);
        }
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
