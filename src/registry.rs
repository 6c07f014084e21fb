//! Platform registry.
//!
//! A fixed, immutable mapping from symbolic platform tokens (e.g. "Win64")
//! to the build parameters for that platform. Constructed once at startup
//! and injected into the dispatcher so tests can substitute tables.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Engine-level platform identifier, passed through to the build executor.
///
/// Distinct from the human-facing token: the token selects a registry
/// entry, the identifier names the platform to the engine toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Android,
    StandaloneLinux64,
    StandaloneOSX,
    StandaloneWindows64,
    WebGL,
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformId::Android => write!(f, "Android"),
            PlatformId::StandaloneLinux64 => write!(f, "StandaloneLinux64"),
            PlatformId::StandaloneOSX => write!(f, "StandaloneOSX"),
            PlatformId::StandaloneWindows64 => write!(f, "StandaloneWindows64"),
            PlatformId::WebGL => write!(f, "WebGL"),
        }
    }
}

/// Build parameters for one registered platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSpec {
    /// Engine identifier handed to the build executor
    pub platform_id: PlatformId,
    /// Directory the build output is placed in (relative to project root)
    pub output_folder: PathBuf,
    /// Extension appended to the derived executable name (may be empty)
    pub extension: String,
    /// When false the executor receives the bare output folder instead of
    /// a named file (platforms that emit a folder of artifacts)
    pub name_executable: bool,
}

impl PlatformSpec {
    /// Create a spec for a platform that produces a named executable.
    pub fn executable(platform_id: PlatformId, folder: &str, extension: &str) -> Self {
        Self {
            platform_id,
            output_folder: PathBuf::from(folder),
            extension: extension.to_string(),
            name_executable: true,
        }
    }

    /// Create a spec for a platform that produces a folder of artifacts.
    pub fn folder(platform_id: PlatformId, folder: &str) -> Self {
        Self {
            platform_id,
            output_folder: PathBuf::from(folder),
            extension: String::new(),
            name_executable: false,
        }
    }

    /// Derive the executable file name for a product.
    ///
    /// Returns `None` when this platform does not name its executable.
    /// Recomputed on every call: the product name comes from config and
    /// may differ between invocations.
    pub fn executable_name(&self, product_name: &str) -> Option<String> {
        if !self.name_executable {
            return None;
        }
        Some(format!("{}{}", sanitize_product_name(product_name), self.extension))
    }

    /// Compute the build destination handed to the executor.
    ///
    /// The output folder itself for artifact-folder platforms, otherwise
    /// the derived executable name inside it.
    pub fn destination(&self, product_name: &str) -> PathBuf {
        match self.executable_name(product_name) {
            Some(name) => self.output_folder.join(name),
            None => self.output_folder.clone(),
        }
    }
}

/// Strip every character outside `[A-Za-z0-9]` and lowercase the result.
pub fn sanitize_product_name(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re =
        NON_ALNUM.get_or_init(|| Regex::new("[^A-Za-z0-9]").expect("literal pattern compiles"));
    re.replace_all(name, "").to_lowercase()
}

/// Error validating a registry table.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two entries share a token
    #[error("duplicate platform token: {0}")]
    DuplicateToken(String),
    /// Two tokens map to the same engine identifier, breaking reverse lookup
    #[error("duplicate platform id: {0}")]
    DuplicatePlatformId(PlatformId),
    /// An entry has an empty output folder
    #[error("empty output folder for token: {0}")]
    EmptyFolder(String),
    /// Two entries share an output folder
    #[error("duplicate output folder: {}", .0.display())]
    DuplicateFolder(PathBuf),
}

/// Immutable token → [`PlatformSpec`] table.
///
/// Lookup is exact-match and case-sensitive. Entries keep their declared
/// order so listings are stable. The table is read-only after construction,
/// so `&Registry` is freely shareable.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<(String, PlatformSpec)>,
}

impl Registry {
    /// Build a registry from (token, spec) pairs, validating invariants:
    /// unique tokens, unique platform ids, non-empty distinct folders.
    pub fn new(entries: Vec<(String, PlatformSpec)>) -> Result<Self, RegistryError> {
        for (i, (token, spec)) in entries.iter().enumerate() {
            if spec.output_folder.as_os_str().is_empty() {
                return Err(RegistryError::EmptyFolder(token.clone()));
            }
            for (other_token, other_spec) in &entries[..i] {
                if other_token == token {
                    return Err(RegistryError::DuplicateToken(token.clone()));
                }
                if other_spec.platform_id == spec.platform_id {
                    return Err(RegistryError::DuplicatePlatformId(spec.platform_id));
                }
                if other_spec.output_folder == spec.output_folder {
                    return Err(RegistryError::DuplicateFolder(spec.output_folder.clone()));
                }
            }
        }
        Ok(Self { entries })
    }

    /// The builtin platform table.
    pub fn builtin() -> Self {
        let entries = vec![
            (
                "Android".to_string(),
                PlatformSpec::executable(PlatformId::Android, "androidBuild", ".apk"),
            ),
            (
                "Linux64".to_string(),
                PlatformSpec::executable(PlatformId::StandaloneLinux64, "linux_build", ""),
            ),
            (
                "OSX".to_string(),
                PlatformSpec::executable(PlatformId::StandaloneOSX, "mac_build", ""),
            ),
            (
                "Win64".to_string(),
                PlatformSpec::executable(PlatformId::StandaloneWindows64, "pc_build", ".exe"),
            ),
            ("WebGL".to_string(), PlatformSpec::folder(PlatformId::WebGL, "webgl_build")),
        ];
        // The builtin table satisfies every invariant; covered in tests.
        Self { entries }
    }

    /// Look up a platform by its token. Exact match, case-sensitive.
    pub fn lookup_by_token(&self, token: &str) -> Option<&PlatformSpec> {
        self.entries.iter().find(|(t, _)| t == token).map(|(_, s)| s)
    }

    /// Reverse lookup by engine identifier.
    pub fn lookup_by_platform_id(&self, id: PlatformId) -> Option<&PlatformSpec> {
        self.entries.iter().find(|(_, s)| s.platform_id == id).map(|(_, s)| s)
    }

    /// Token for an engine identifier, if registered.
    pub fn token_for(&self, id: PlatformId) -> Option<&str> {
        self.entries.iter().find(|(_, s)| s.platform_id == id).map(|(t, _)| t.as_str())
    }

    /// Registered tokens in declared order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// All entries in declared order.
    pub fn entries(&self) -> &[(String, PlatformSpec)] {
        &self.entries
    }

    /// Number of registered platforms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_builtin_table() {
        let reg = Registry::builtin();
        assert_eq!(reg.len(), 5);

        let android = reg.lookup_by_token("Android").unwrap();
        assert_eq!(android.platform_id, PlatformId::Android);
        assert_eq!(android.output_folder, Path::new("androidBuild"));
        assert_eq!(android.extension, ".apk");
        assert!(android.name_executable);

        let webgl = reg.lookup_by_token("WebGL").unwrap();
        assert_eq!(webgl.platform_id, PlatformId::WebGL);
        assert_eq!(webgl.output_folder, Path::new("webgl_build"));
        assert!(!webgl.name_executable);
    }

    #[test]
    fn test_builtin_satisfies_invariants() {
        let reg = Registry::builtin();
        assert!(Registry::new(reg.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let reg = Registry::builtin();
        assert!(reg.lookup_by_token("win64").is_none());
        assert!(reg.lookup_by_token("WIN64").is_none());
        assert!(reg.lookup_by_token("Win64").is_some());
    }

    #[test]
    fn test_lookup_unknown_and_empty() {
        let reg = Registry::builtin();
        assert!(reg.lookup_by_token("PS5").is_none());
        assert!(reg.lookup_by_token("").is_none());
    }

    #[test]
    fn test_token_id_bijection() {
        let reg = Registry::builtin();
        for (token, spec) in reg.entries() {
            assert_eq!(reg.token_for(spec.platform_id), Some(token.as_str()));
            let back = reg.lookup_by_platform_id(spec.platform_id).unwrap();
            assert_eq!(back, spec);
        }
    }

    #[test]
    fn test_sanitize_product_name() {
        assert_eq!(sanitize_product_name("My Game! 2"), "mygame2");
        assert_eq!(sanitize_product_name("Red-Ball_3D"), "redball3d");
        assert_eq!(sanitize_product_name("UPPER"), "upper");
        assert_eq!(sanitize_product_name("!!!"), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_product_name("My Game! 2");
        assert_eq!(sanitize_product_name(&once), once);
        assert_eq!(sanitize_product_name("My Game! 2"), once);
    }

    #[test]
    fn test_executable_name() {
        let reg = Registry::builtin();
        let win = reg.lookup_by_token("Win64").unwrap();
        assert_eq!(win.executable_name("My Game! 2"), Some("mygame2.exe".to_string()));

        let linux = reg.lookup_by_token("Linux64").unwrap();
        assert_eq!(linux.executable_name("My Game! 2"), Some("mygame2".to_string()));

        let webgl = reg.lookup_by_token("WebGL").unwrap();
        assert_eq!(webgl.executable_name("My Game! 2"), None);
    }

    #[test]
    fn test_destination_named_executable() {
        let reg = Registry::builtin();
        let win = reg.lookup_by_token("Win64").unwrap();
        assert_eq!(win.destination("My Game! 2"), PathBuf::from("pc_build").join("mygame2.exe"));
    }

    #[test]
    fn test_destination_folder_platform() {
        let reg = Registry::builtin();
        let webgl = reg.lookup_by_token("WebGL").unwrap();
        // No name appended: destination is exactly the output folder
        assert_eq!(webgl.destination("My Game! 2"), PathBuf::from("webgl_build"));
    }

    #[test]
    fn test_new_rejects_duplicate_token() {
        let entries = vec![
            ("A".to_string(), PlatformSpec::executable(PlatformId::Android, "a", ".apk")),
            ("A".to_string(), PlatformSpec::executable(PlatformId::WebGL, "b", "")),
        ];
        assert!(matches!(Registry::new(entries), Err(RegistryError::DuplicateToken(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_platform_id() {
        let entries = vec![
            ("A".to_string(), PlatformSpec::executable(PlatformId::Android, "a", ".apk")),
            ("B".to_string(), PlatformSpec::executable(PlatformId::Android, "b", "")),
        ];
        assert!(matches!(Registry::new(entries), Err(RegistryError::DuplicatePlatformId(_))));
    }

    #[test]
    fn test_new_rejects_duplicate_folder() {
        let entries = vec![
            ("A".to_string(), PlatformSpec::executable(PlatformId::Android, "out", ".apk")),
            ("B".to_string(), PlatformSpec::executable(PlatformId::WebGL, "out", "")),
        ];
        assert!(matches!(Registry::new(entries), Err(RegistryError::DuplicateFolder(_))));
    }

    #[test]
    fn test_new_rejects_empty_folder() {
        let entries =
            vec![("A".to_string(), PlatformSpec::executable(PlatformId::Android, "", ".apk"))];
        assert!(matches!(Registry::new(entries), Err(RegistryError::EmptyFolder(_))));
    }

    #[test]
    fn test_platform_id_display() {
        assert_eq!(PlatformId::Android.to_string(), "Android");
        assert_eq!(PlatformId::StandaloneWindows64.to_string(), "StandaloneWindows64");
        assert_eq!(PlatformId::WebGL.to_string(), "WebGL");
    }
}
