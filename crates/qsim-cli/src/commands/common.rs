//! Shared helpers for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;

use qsim_adapter_native::NativeEngine;
use qsim_bridge::{MeasurementRecord, QsimOptions, QsimSimulator};
use qsim_ir::{Circuit, Sweep};

/// Engine selection and options shared by every simulating command.
#[derive(Debug, Clone, Default)]
pub struct EngineArgs {
    pub library: Option<String>,
    pub config: Option<String>,
    pub threads: Option<u32>,
    pub fuse: Option<u32>,
}

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let circuit: Circuit =
        serde_json::from_str(&source).with_context(|| format!("Invalid circuit JSON: {path}"))?;
    Ok(circuit)
}

/// The per-user config file (~/.qsim/config.yaml), if present.
pub fn default_config_path() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".qsim").join("config.yaml");
    path.is_file().then_some(path)
}

/// Build engine options from the config file and command-line overrides.
pub fn load_options(args: &EngineArgs) -> Result<QsimOptions> {
    let config = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .or_else(default_config_path);

    let mut options = match config {
        Some(path) => {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            tracing::debug!("loaded options from {}", path.display());
            parse_options_yaml(&source)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => QsimOptions::default(),
    };

    if let Some(threads) = args.threads {
        options.set("t", i64::from(threads))?;
    }
    if let Some(fuse) = args.fuse {
        options.set("f", i64::from(fuse))?;
    }
    options.validate()?;
    Ok(options)
}

/// Parse YAML engine options.
pub fn parse_options_yaml(source: &str) -> Result<QsimOptions> {
    let options: QsimOptions = serde_yaml_ng::from_str(source)?;
    options.validate()?;
    Ok(options)
}

/// Load the native engine and wrap it in a simulator.
pub fn create_simulator(args: &EngineArgs) -> Result<QsimSimulator<NativeEngine>> {
    let options = load_options(args)?;
    let engine = NativeEngine::discover(args.library.as_deref().map(Path::new))
        .context("Failed to load the qsim library (set --library or QSIM_LIBRARY)")?;
    tracing::info!("using qsim library {}", engine.library().library_path());
    Ok(QsimSimulator::new(engine).with_options(options)?)
}

/// Parse `key=start:stop:length` sweeps; several sweeps form a product.
pub fn parse_sweeps(args: &[String]) -> Result<Sweep> {
    let mut sweeps = args
        .iter()
        .map(String::as_str)
        .map(parse_sweep)
        .collect::<Result<Vec<_>>>()?;
    Ok(match sweeps.len() {
        0 => Sweep::Unit,
        1 => sweeps.remove(0),
        _ => Sweep::Product(sweeps),
    })
}

fn parse_sweep(arg: &str) -> Result<Sweep> {
    let (key, range) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid sweep '{arg}': expected key=start:stop:length"))?;
    let parts: Vec<&str> = range.split(':').collect();
    let [start, stop, length] = parts.as_slice() else {
        anyhow::bail!("Invalid sweep '{arg}': expected key=start:stop:length");
    };
    let start: f64 = start
        .parse()
        .with_context(|| format!("Invalid sweep start in '{arg}'"))?;
    let stop: f64 = stop
        .parse()
        .with_context(|| format!("Invalid sweep stop in '{arg}'"))?;
    let length: usize = length
        .parse()
        .with_context(|| format!("Invalid sweep length in '{arg}'"))?;
    if key.is_empty() {
        anyhow::bail!("Invalid sweep '{arg}': empty key");
    }
    Ok(Sweep::linspace(key, start, stop, length))
}

/// Print sampled measurements: the first rows of each key and a histogram.
pub fn print_record(record: &MeasurementRecord) {
    let repetitions = record.repetitions();

    for (key, bits) in record.iter() {
        println!(
            "\n{} {} ({} repetitions, {} bits):",
            style("✓").green().bold(),
            style(key).cyan(),
            repetitions,
            bits.ncols()
        );

        for row in bits.rows().into_iter().take(8) {
            let line: String = row.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect();
            println!("  {line}");
        }
        if bits.nrows() > 8 {
            println!("  ...");
        }

        let Some(histogram) = record.histogram(key) else {
            continue;
        };
        let mut sorted: Vec<_> = histogram.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let total = repetitions.max(1) as f64;
        let width = bits.ncols();
        for (value, count) in sorted.iter().take(16) {
            let prob = *count as f64 / total * 100.0;
            let bar: String = "█".repeat((prob / 2.0).round() as usize);
            println!(
                "  {}: {:>6} ({:>5.2}%) {}",
                style(format!("{value:0width$b}")).cyan(),
                count,
                prob,
                style(bar).green()
            );
        }
        if sorted.len() > 16 {
            println!("  ... and {} more outcomes", sorted.len() - 16);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_single_sweep() {
        let sweep = parse_sweeps(&["theta=0:1:3".to_string()]).unwrap();
        assert_eq!(sweep, Sweep::linspace("theta", 0.0, 1.0, 3));
    }

    #[test]
    fn test_parse_sweeps_product() {
        let sweep = parse_sweeps(&["a=0:1:2".to_string(), "b=0:1:3".to_string()]).unwrap();
        assert_eq!(sweep.len(), 6);
    }

    #[test]
    fn test_parse_no_sweep() {
        assert_eq!(parse_sweeps(&[]).unwrap(), Sweep::Unit);
    }

    #[test]
    fn test_parse_bad_sweeps() {
        assert!(parse_sweeps(&["theta".to_string()]).is_err());
        assert!(parse_sweeps(&["theta=0:1".to_string()]).is_err());
        assert!(parse_sweeps(&["theta=0:x:2".to_string()]).is_err());
        assert!(parse_sweeps(&["=0:1:2".to_string()]).is_err());
    }

    #[test]
    fn test_parse_options_yaml() {
        let options = parse_options_yaml("t: 4\nf: 3\ng: 1\n").unwrap();
        assert_eq!(options.num_threads, 4);
        assert_eq!(options.max_fused_size, 3);
        assert_eq!(options.extra.get("g"), Some(&1));
    }

    #[test]
    fn test_reserved_option_in_yaml() {
        assert!(parse_options_yaml("c: 1\n").is_err());
    }

    #[test]
    fn test_load_options_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "t: 2\nv: 1").unwrap();

        let args = EngineArgs {
            config: Some(file.path().display().to_string()),
            fuse: Some(4),
            ..EngineArgs::default()
        };
        let options = load_options(&args).unwrap();
        assert_eq!(options.num_threads, 2);
        assert_eq!(options.max_fused_size, 4);
        assert_eq!(options.verbosity, 1);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "t: 1").unwrap();

        let args = EngineArgs {
            config: Some(file.path().display().to_string()),
            threads: Some(0),
            ..EngineArgs::default()
        };
        assert!(load_options(&args).is_err());
    }

    #[test]
    fn test_load_missing_circuit() {
        let err = load_circuit("/no/such/circuit.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_circuit_json() {
        let mut circuit = Circuit::new();
        circuit
            .apply(qsim_ir::Gate::h(), [qsim_ir::Qubit::line(0)])
            .unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&circuit).unwrap()).unwrap();

        let loaded = load_circuit(&file.path().display().to_string()).unwrap();
        assert_eq!(loaded, circuit);
    }
}
