// SPDX-License-Identifier: Apache-2.0
//! Load the native qsim bridge library and resolve its entry points.
//!
//! The library exports unprefixed symbols:
//!
//! ```text
//! qsim_bridge_sample
//! qsim_bridge_simulate
//! qsim_bridge_simulate_fullstate
//! qsim_bridge_version            (optional)
//! ```

use std::env;
use std::ffi::CStr;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::error::{NativeError, NativeResult};
use crate::ffi;

/// Environment variable naming the library to load.
pub const LIBRARY_ENV: &str = "QSIM_LIBRARY";

/// File name of the library in the per-user install directory.
pub fn default_library_name() -> String {
    format!(
        "{}qsim_bridge{}",
        env::consts::DLL_PREFIX,
        env::consts::DLL_SUFFIX
    )
}

/// A loaded qsim library with its function pointers resolved.
///
/// The library handle lives as long as this struct, so the function
/// pointers never outlive the mapped code.
pub struct QsimLibrary {
    _library: Library,

    /// Path the library was loaded from.
    library_path: String,

    pub(crate) fn_sample: ffi::FnSample,
    pub(crate) fn_simulate: ffi::FnSimulate,
    pub(crate) fn_simulate_fullstate: ffi::FnSimulateFullstate,
    fn_version: Option<ffi::FnVersion>,
}

impl QsimLibrary {
    /// Load a qsim bridge library and resolve all function pointers.
    ///
    /// # Errors
    ///
    /// Returns [`NativeError::LoadFailed`] if the library cannot be opened,
    /// or [`NativeError::SymbolNotFound`] if a required symbol is missing.
    pub fn load(path: &Path) -> NativeResult<Self> {
        let path_str = path.display().to_string();

        // SAFETY: loading an external shared library runs its initializers.
        // The caller is responsible for pointing at a trustworthy library.
        let library = unsafe { Library::new(path) }.map_err(|e| NativeError::LoadFailed {
            path: path_str.clone(),
            cause: e.to_string(),
        })?;

        tracing::info!("loaded qsim library '{path_str}'");

        let fn_sample = resolve_required::<ffi::FnSample>(&library, "qsim_bridge_sample")?;
        let fn_simulate = resolve_required::<ffi::FnSimulate>(&library, "qsim_bridge_simulate")?;
        let fn_simulate_fullstate = resolve_required::<ffi::FnSimulateFullstate>(
            &library,
            "qsim_bridge_simulate_fullstate",
        )?;
        let fn_version = resolve_optional::<ffi::FnVersion>(&library, "qsim_bridge_version");

        Ok(Self {
            _library: library,
            library_path: path_str,
            fn_sample,
            fn_simulate,
            fn_simulate_fullstate,
            fn_version,
        })
    }

    /// Filesystem path the library was loaded from.
    pub fn library_path(&self) -> &str {
        &self.library_path
    }

    /// The version string reported by the library, if it exports one.
    pub fn version(&self) -> Option<String> {
        let f = self.fn_version?;
        let ptr = unsafe { f() };
        if ptr.is_null() {
            return None;
        }
        // SAFETY: the library returns a NUL-terminated static string.
        let version = unsafe { CStr::from_ptr(ptr) };
        Some(version.to_string_lossy().into_owned())
    }
}

#[allow(clippy::missing_fields_in_debug)]
impl std::fmt::Debug for QsimLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QsimLibrary")
            .field("library_path", &self.library_path)
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

/// Resolve a required symbol.
fn resolve_required<T: Copy>(library: &Library, name: &str) -> NativeResult<T> {
    tracing::trace!("resolving required symbol '{name}'");

    // SAFETY: `T` must match the exported function's signature.
    unsafe {
        let sym: Symbol<T> =
            library
                .get(name.as_bytes())
                .map_err(|e| NativeError::SymbolNotFound {
                    symbol: name.to_string(),
                    cause: e.to_string(),
                })?;
        Ok(*sym)
    }
}

/// Resolve an optional symbol. Returns `None` if the symbol is missing.
fn resolve_optional<T: Copy>(library: &Library, name: &str) -> Option<T> {
    tracing::trace!("resolving optional symbol '{name}'");

    unsafe { library.get::<T>(name.as_bytes()).ok().map(|s| *s) }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Candidate library paths, in lookup order.
///
/// An explicit path wins, then `$QSIM_LIBRARY`, then
/// `~/.qsim/lib/libqsim_bridge.<ext>`.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let from_env = env::var_os(LIBRARY_ENV).map(PathBuf::from);
    candidates(explicit, from_env, dirs::home_dir())
}

fn candidates(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    paths.extend(from_env.filter(|p| !p.as_os_str().is_empty()));
    if let Some(home) = home {
        paths.push(home.join(".qsim").join("lib").join(default_library_name()));
    }
    paths
}

/// Find the library to load.
///
/// An explicit path is returned as-is so that a bad `--library` argument
/// fails loudly at load time instead of falling through to other
/// candidates.
pub fn locate_library(explicit: Option<&Path>) -> NativeResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let searched = candidate_paths(None);
    match searched.iter().find(|p| p.is_file()) {
        Some(path) => {
            tracing::debug!("found qsim library at {}", path.display());
            Ok(path.clone())
        }
        None => Err(NativeError::LibraryNotFound { searched }),
    }
}
