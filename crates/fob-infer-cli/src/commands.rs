//! Command implementations.

use std::io::{self, Write};
use std::path::PathBuf;

use fob_infer::{InferOptions, Inference, SymbolRecord, TableOptions};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{InferArgs, LookupArgs, OutputFormat, SymbolsArgs};
use crate::config::load_options;
use crate::error::{CliError, Result};

/// Print the symbol table of the given units.
pub fn symbols_execute(global: &InferArgs, args: &SymbolsArgs) -> Result<()> {
    let options = load_options(global)?;
    let mut inference = compile_units(&options, &args.files)?;

    let mut table_options = TableOptions::from(&options);
    table_options.missing |= args.missing;
    let table = inference.symbols(table_options);
    info!(symbols = table.len(), "symbol table built");

    let records = table.records(&inference);
    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &records)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => {
            for record in &records {
                writeln!(stdout, "{}", render_record(record))?;
            }
        }
    }

    report_diagnostics(&inference);
    Ok(())
}

/// Result of a position lookup.
#[derive(Debug, Serialize)]
pub struct LookupOutput {
    /// Qualified id when the symbol is listed, else its bare name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    pub suggestions: Vec<String>,
}

/// Resolve the symbol at a position and print it with its completions.
pub fn lookup_execute(global: &InferArgs, args: &LookupArgs) -> Result<()> {
    let options = load_options(global)?;
    let mut inference = compile_units(&options, &args.files)?;
    // Assigns qualified ids to everything reachable.
    inference.symbols(TableOptions::from(&options));

    let output = lookup(&mut inference, args)?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;

    report_diagnostics(&inference);
    Ok(())
}

fn lookup(inference: &mut Inference, args: &LookupArgs) -> Result<LookupOutput> {
    let unit = args
        .unit
        .as_ref()
        .or_else(|| args.files.first())
        .map(|path| path.display().to_string())
        .ok_or_else(|| CliError::InvalidArgument("no units given".to_string()))?;
    if inference.file(&unit).is_none() {
        return Err(CliError::InvalidArgument(format!(
            "'{unit}' is not one of the compiled units"
        )));
    }

    let found = inference.find_all(&unit, args.line, args.column, args.token.as_deref());
    debug!(
        unit = %unit,
        line = args.line,
        column = args.column,
        suggestions = found.suggestions.len(),
        "lookup"
    );

    let (symbol, types) = match found.symbol {
        Some(id) => {
            let symbol = inference.symbol(id);
            let name = symbol.id.clone().unwrap_or_else(|| symbol.name.clone());
            let types = (!symbol.types.is_empty()).then(|| symbol.types.to_string());
            (Some(name), types)
        }
        None => (None, None),
    };

    Ok(LookupOutput {
        symbol,
        types,
        suggestions: found.suggestions,
    })
}

fn compile_units(options: &InferOptions, files: &[PathBuf]) -> Result<Inference> {
    let mut inference = Inference::new(options.clone());
    for path in files {
        debug!(path = %path.display(), "compiling");
        inference.compile_path(path)?;
    }
    info!(units = files.len(), "compiled");
    Ok(inference)
}

/// `id: type = value (source)`, or the signature in place of type and value.
fn render_record(record: &SymbolRecord) -> String {
    let mut line = match &record.signature {
        Some(signature) => format!("{}: {signature}", record.id),
        None if record.types.is_empty() => record.id.clone(),
        None => format!("{}: {}", record.id, record.types),
    };
    if let Some(value) = &record.value {
        line.push_str(&format!(" = {value}"));
    }
    let tags = record.tags.to_vec();
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if let Some(source) = &record.source {
        line.push_str(&format!(" ({source})"));
    }
    line
}

fn report_diagnostics(inference: &Inference) {
    for diagnostic in inference.diagnostics() {
        let at = diagnostic
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        info!(kind = ?diagnostic.kind, at = %at, "{}", diagnostic.message);
    }
}
