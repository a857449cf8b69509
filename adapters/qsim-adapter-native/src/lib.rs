// SPDX-License-Identifier: Apache-2.0
//! # qsim-adapter-native
//!
//! A [`QsimEngine`](qsim_engine::QsimEngine) that forwards every call to a
//! native qsim bridge library loaded at runtime with `dlopen`.
//!
//! ```text
//!          ┌──────────────────┐
//!          │   qsim-bridge    │
//!          └────────┬─────────┘
//!                   │ EngineCircuit, RunOptions
//!          ┌────────┴─────────┐
//!          │ NativeEngine     │ ← marshals to C records
//!          │ QsimLibrary      │ ← dlopen + dlsym
//!          └────────┬─────────┘
//!                   │ C ABI (extern "C")
//!          ┌────────┴─────────┐
//!          │ libqsim_bridge   │
//!          └──────────────────┘
//! ```
//!
//! The library is found via an explicit path, then `$QSIM_LIBRARY`, then
//! `~/.qsim/lib/`.
//!
//! ```rust,no_run
//! use qsim_adapter_native::NativeEngine;
//! use qsim_engine::QsimEngine;
//!
//! let engine = NativeEngine::discover(None).expect("no qsim library installed");
//! println!("{}: {:?}", engine.name(), engine.library().version());
//! ```

pub mod engine;
pub mod error;
pub mod ffi;
pub mod loader;
pub mod marshal;

pub use engine::NativeEngine;
pub use error::{NativeError, NativeResult};
pub use loader::{LIBRARY_ENV, QsimLibrary, candidate_paths, locate_library};
