use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use driftbuf_compiler::compile_schema;
use driftbuf_compiler::error::DriftError;
use tempfile::NamedTempFile;

#[derive(Parser)]
#[command(name = "driftc")]
#[command(about = "Compile driftbuf schemas into zero-copy accessor code", long_about = None)]
struct Cli {
    /// Input schema files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Prefix directory for all generated files ("-" writes to stdout)
    #[arg(short, long)]
    outputdir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut failed = false;

    // Each file compiles independently; one failure never aborts the rest.
    for file in &cli.files {
        if let Err(err) = compile_file(file, cli.outputdir.as_deref()) {
            eprintln!("{}: {}", file.display(), err);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn compile_file(input: &Path, outputdir: Option<&Path>) -> Result<(), DriftError> {
    let text = fs::read_to_string(input)?;
    let base = base_name(input)?;
    let code = compile_schema(&text, &base)?;

    if outputdir == Some(Path::new("-")) {
        print!("{}", code.header);
        print!("{}", code.implementation);
        return Ok(());
    }

    let dir = match outputdir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let header_path = dir.join(format!("{}.h", base));
    let impl_path = dir.join(format!("{}.ipp", base));
    write_atomic(&header_path, &code.header)?;
    write_atomic(&impl_path, &code.implementation)?;
    println!(
        "Compiled {} -> {}, {}",
        input.display(),
        header_path.display(),
        impl_path.display()
    );
    Ok(())
}

fn base_name(input: &Path) -> Result<String, DriftError> {
    match input.file_stem() {
        Some(stem) => Ok(stem.to_string_lossy().into_owned()),
        None => Err(DriftError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot derive an output name from {}", input.display()),
        ))),
    }
}

/// Writes generated text through a temporary file in the destination
/// directory, renaming into place so a failure leaves no partial artifact.
fn write_atomic(path: &Path, contents: &str) -> Result<(), DriftError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|err| DriftError::Io(err.error))?;
    Ok(())
}
