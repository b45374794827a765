//! File-level runs: load configuration, read the price list, validate.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, trace};

use pricelist_core::{ValidationOutcome, validate_workbook};
use pricelist_ingest::{CsvOptions, load_workbook};
use pricelist_standards::{Standards, ValidatorOptions};

use crate::logging::redact_value;

/// Inputs of one `validate` run.
#[derive(Debug, Clone, Copy)]
pub struct ValidateRequest<'a> {
    pub file: &'a Path,
    pub standards_dir: &'a Path,
    pub options: Option<&'a Path>,
    pub metadata: Option<&'a Path>,
    pub delimiter: Option<char>,
}

pub fn validate_file(request: ValidateRequest<'_>) -> Result<ValidationOutcome> {
    let span = info_span!("validate_file", file = %request.file.display());
    let _guard = span.enter();

    let options = ValidatorOptions::load_or_default(request.options)
        .context("load validator options")?;
    let standards = load_standards(request.standards_dir)?;
    let csv_options = CsvOptions {
        delimiter: request.delimiter.map(delimiter_byte).transpose()?,
        header_row: options.header_row,
    };
    let workbook = load_workbook(request.file, &csv_options, request.metadata)
        .with_context(|| format!("read {}", request.file.display()))?;

    let outcome = validate_workbook(&workbook, &standards, &options);
    for finding in &outcome.findings {
        trace!(
            row = ?finding.row,
            field = %finding.field,
            code = %finding.code,
            value = redact_value(finding.value.as_deref().unwrap_or_default()),
            "finding"
        );
    }
    info!(
        findings = outcome.findings.len(),
        rejections = outcome.summary.rejections,
        "validation finished"
    );
    Ok(outcome)
}

pub fn load_standards(dir: &Path) -> Result<Standards> {
    Standards::load(dir).with_context(|| format!("load standards from {}", dir.display()))
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    match u8::try_from(delimiter) {
        Ok(byte) if byte.is_ascii() => Ok(byte),
        _ => bail!("delimiter must be a single ASCII character, got {delimiter:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_must_be_ascii() {
        assert_eq!(delimiter_byte(';').expect("ascii"), b';');
        assert!(delimiter_byte('§').is_err());
    }
}
