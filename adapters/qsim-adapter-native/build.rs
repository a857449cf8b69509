// SPDX-License-Identifier: Apache-2.0
//! Build script: compile the mock qsim library for integration tests.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let mock_src = "mock/mock_qsim.c";
    println!("cargo:rerun-if-changed={mock_src}");

    if !Path::new(mock_src).exists() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let lib_name = if cfg!(target_os = "macos") {
        "libmock_qsim.dylib"
    } else {
        "libmock_qsim.so"
    };
    let so_path = out_dir.join(lib_name);

    let status = Command::new("cc")
        .args([
            "-shared",
            "-fPIC",
            "-o",
            so_path.to_str().unwrap(),
            mock_src,
            "-Wall",
            "-Wextra",
            "-O2",
            "-lm",
        ])
        .status();

    // Without a C compiler the mock-library tests skip themselves.
    match status {
        Ok(status) if status.success() => {
            println!("cargo:rustc-env=MOCK_QSIM_LIBRARY_PATH={}", so_path.display());
        }
        Ok(status) => println!("cargo:warning=failed to compile mock qsim library: {status}"),
        Err(e) => println!("cargo:warning=no C compiler for mock qsim library: {e}"),
    }
}
