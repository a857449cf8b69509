//! Version command implementation.

use std::path::Path;

use console::style;

use qsim_adapter_native::NativeEngine;

use super::common::EngineArgs;

/// Execute the version command.
pub fn execute(args: &EngineArgs) {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - moment circuits on the qsim engine",
        style("qsim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsim-ir              Moment-based circuit model");
    println!("  qsim-engine          Engine circuit format and engine trait");
    println!("  qsim-bridge          Translation and simulator facade");
    println!("  qsim-adapter-native  Native library engine");
    println!();

    match NativeEngine::discover(args.library.as_deref().map(Path::new)) {
        Ok(engine) => println!(
            "Library:    {} ({})",
            style(engine.library().library_path()).green(),
            engine
                .library()
                .version()
                .unwrap_or_else(|| "unknown version".into())
        ),
        Err(e) => println!("Library:    {}", style(e).dim()),
    }
    println!("License:    {}", style("Apache-2.0").dim());
}
