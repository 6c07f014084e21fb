//! Build dispatch orchestration.
//!
//! Resolves a requested platform against the registry, prepares the output
//! directory, invokes the build executor, and returns an explicit outcome.
//! One dispatch performs exactly one build, synchronously.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::executor::{
    BuildExecutor, BuildOptions, ExecuteRequest, ExecutorError, ExecutorReport, SceneProvider,
};
use crate::registry::{PlatformId, PlatformSpec, Registry};

/// Argument-vector flag introducing the platform token.
pub const BUILD_TARGET_FLAG: &str = "-buildTarget";

/// Error during dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Token matches no registry entry. Nothing was touched on disk.
    #[error("unknown build target: [{token}]; use {BUILD_TARGET_FLAG} <target>")]
    UnknownTarget {
        /// The offending token (possibly empty)
        token: String,
    },
    /// Engine identifier matches no registry entry. Hard stop; the build is
    /// never attempted without a resolved configuration.
    #[error("no platform registered for id {id}; use {BUILD_TARGET_FLAG} <target>")]
    UnknownPlatformId {
        /// The offending identifier
        id: PlatformId,
    },
    /// Clearing or recreating the output directory failed. Fatal; the
    /// executor is not invoked.
    #[error("failed to prepare output directory {}: {source}", .path.display())]
    DirectoryPrep {
        /// Directory being prepared
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },
    /// Executor could not be invoked at all
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Result of one dispatched build.
///
/// The executor's own verdict is carried explicitly in `report`; callers
/// decide the exit code from it rather than from log output.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Token the build was resolved from
    pub token: String,
    /// Engine platform identifier
    pub platform_id: PlatformId,
    /// Destination handed to the executor
    pub destination: PathBuf,
    /// Number of scenes included
    pub scene_count: usize,
    /// What the executor reported
    pub report: ExecutorReport,
    /// Wall-clock duration of the executor call
    pub duration: Duration,
}

impl BuildOutcome {
    /// Check if the executor reported success.
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }

    /// One-line summary for the CLI.
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "Build succeeded: {} -> {} ({} scenes) in {:?}",
                self.platform_id,
                self.destination.display(),
                self.scene_count,
                self.duration
            )
        } else {
            format!("Build failed: {} ({})", self.platform_id, self.report)
        }
    }
}

/// Resolves build requests and drives the clean/build/report lifecycle.
///
/// The registry and both collaborators are injected, never ambient, so
/// tests can substitute tables, scene lists, and executors.
pub struct Dispatcher {
    registry: Registry,
    product_name: String,
    project_root: PathBuf,
    scenes: Box<dyn SceneProvider>,
    executor: Box<dyn BuildExecutor>,
    verbose: bool,
}

impl Dispatcher {
    /// Create a dispatcher. Output folders resolve against the current
    /// directory unless [`with_project_root`](Self::with_project_root) is set.
    pub fn new(
        registry: Registry,
        product_name: String,
        scenes: Box<dyn SceneProvider>,
        executor: Box<dyn BuildExecutor>,
    ) -> Self {
        Self {
            registry,
            product_name,
            project_root: PathBuf::from("."),
            scenes,
            executor,
            verbose: false,
        }
    }

    /// Set the directory output folders resolve against.
    pub fn with_project_root(mut self, root: PathBuf) -> Self {
        self.project_root = root;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The injected registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch a build for a platform token.
    ///
    /// An unknown token (the empty string included) aborts before any
    /// filesystem mutation or executor call.
    pub fn dispatch_by_token(
        &self,
        token: &str,
        options: BuildOptions,
    ) -> Result<BuildOutcome, DispatchError> {
        let spec = self
            .registry
            .lookup_by_token(token)
            .ok_or_else(|| DispatchError::UnknownTarget { token: token.to_string() })?;
        self.run_build(token, spec, options)
    }

    /// Dispatch a build for an engine platform identifier.
    ///
    /// A miss is a hard stop; dispatch never proceeds without a resolved
    /// configuration.
    pub fn dispatch_by_platform_id(
        &self,
        id: PlatformId,
        options: BuildOptions,
    ) -> Result<BuildOutcome, DispatchError> {
        let token = self
            .registry
            .token_for(id)
            .ok_or(DispatchError::UnknownPlatformId { id })?
            .to_string();
        let spec = self
            .registry
            .lookup_by_platform_id(id)
            .ok_or(DispatchError::UnknownPlatformId { id })?;
        self.run_build(&token, spec, options)
    }

    /// Dispatch from an engine-style argument vector.
    ///
    /// Scans for the first `-buildTarget` flag and takes the following
    /// element as the token. Flag absent or trailing resolves to the empty
    /// token, which is never registered and fails fast.
    pub fn dispatch_from_args(
        &self,
        args: &[String],
        options: BuildOptions,
    ) -> Result<BuildOutcome, DispatchError> {
        let token = find_build_target(args).unwrap_or("");
        self.dispatch_by_token(token, options)
    }

    /// Run a resolved build: prepare the destination, invoke the executor,
    /// surface its report.
    fn run_build(
        &self,
        token: &str,
        spec: &PlatformSpec,
        options: BuildOptions,
    ) -> Result<BuildOutcome, DispatchError> {
        println!("Build start: {}", spec.platform_id);

        let folder = self.resolve(&spec.output_folder);
        prepare_output_dir(&folder)?;

        let destination = self.resolve(&spec.destination(&self.product_name));
        let scenes = self.scenes.enabled_paths();
        let scene_count = scenes.len();

        if self.verbose {
            println!("  Destination: {}", destination.display());
            println!("  Scenes: {}", scenes.len());
            for scene in &scenes {
                println!("    - {}", scene);
            }
        }

        let request = ExecuteRequest {
            scenes,
            destination: destination.clone(),
            platform_id: spec.platform_id,
            token: token.to_string(),
            options,
        };

        let start = Instant::now();
        let report = self.executor.execute(&request)?;
        let duration = start.elapsed();

        println!("Build done: {}", spec.platform_id);

        Ok(BuildOutcome {
            token: token.to_string(),
            platform_id: spec.platform_id,
            destination,
            scene_count,
            report,
            duration,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Find the token following the first `-buildTarget` flag.
///
/// Returns `None` when the flag is absent or is the last element.
pub fn find_build_target(args: &[String]) -> Option<&str> {
    for (index, arg) in args.iter().enumerate() {
        if arg == BUILD_TARGET_FLAG {
            return args.get(index + 1).map(String::as_str);
        }
    }
    None
}

/// Clear and recreate one output directory.
///
/// A pre-existing folder is deleted recursively first so stale artifacts
/// from a previous run never mix into a fresh build.
fn prepare_output_dir(folder: &Path) -> Result<(), DispatchError> {
    if folder.exists() {
        fs::remove_dir_all(folder).map_err(|source| DispatchError::DirectoryPrep {
            path: folder.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(folder).map_err(|source| DispatchError::DirectoryPrep {
        path: folder.to_path_buf(),
        source,
    })
}
