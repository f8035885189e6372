//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use miette::{NamedSource, Report};

use crate::compile::compile;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::{lexer, parser};

use super::{BuildArgs, CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during compilation.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let display = file_path.display();
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len(),
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

/// Render a compile error with its source context.
///
/// Errors raised in an imported module carry that module's file name; its text is re-read from
/// disk so the label points into the right file.
pub fn render_error(entry_path: &Path, entry_source: &str, err: &CompileError) -> String {
    let entry_name = entry_path.display().to_string();
    let file = err.file.clone().unwrap_or_else(|| entry_name.clone());
    let source = if file == entry_name {
        Some(entry_source.to_string())
    } else {
        fs::read_to_string(&file).ok()
    };

    let report = Report::new(err.clone());
    let report = match source {
        Some(text) => report.with_source_code(NamedSource::new(file, text)),
        None => report,
    };
    let mut rendered = format!("{report:?}");
    for note in &err.notes {
        rendered.push_str(&format!("\n  = note: {note}"));
    }
    rendered
}

/// Lex and display tokens.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|err| CliError::failure(render_error(file_path, &source, &err)))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display AST.
///
/// Imports are not followed; use `build` to compile a program with its dependencies.
pub fn parse_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let options = parser::ParseOptions::default().with_filename(file_path.display().to_string());
    let module =
        parser::parse(&source, &options).map_err(|err| CliError::failure(render_error(file_path, &source, &err)))?;

    println!("{:#?}", module);
    Ok(ExitCode::SUCCESS)
}

/// Compile a file to JavaScript.
pub fn build_file(args: &BuildArgs) -> CliResult<ExitCode> {
    let source = read_source(&args.file)?;
    let options = args.compile_options();
    let output =
        compile(&source, &options).map_err(|err| CliError::failure(render_error(&args.file, &source, &err)))?;

    for warning in &output.warnings {
        eprintln!("{warning}");
    }

    let Some(out_path) = &args.output else {
        print!("{}", output.code);
        return Ok(ExitCode::SUCCESS);
    };

    let mut code = output.code;
    if let Some(mut map) = output.position_map {
        let map_path = map_path_for(out_path);
        map.file = out_path.file_name().map(|n| n.to_string_lossy().into_owned());
        fs::write(&map_path, map.to_json_string())
            .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", map_path.display())))?;
        if let Some(name) = map_path.file_name() {
            code.push_str(&format!("\n//# sourceMappingURL={}\n", name.to_string_lossy()));
        }
    }
    fs::write(out_path, code)
        .map_err(|e| CliError::failure(format!("Error writing '{}': {e}", out_path.display())))?;
    tracing::info!(output = %out_path.display(), "compiled");
    Ok(ExitCode::SUCCESS)
}

/// `out.js` → `out.js.map`
fn map_path_for(out_path: &Path) -> PathBuf {
    let mut name = out_path.as_os_str().to_os_string();
    name.push(".map");
    PathBuf::from(name)
}
