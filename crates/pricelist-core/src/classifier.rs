//! Template classification.
//!
//! A workbook is one of three kinds, checked in priority order:
//!
//! 1. **Generator**: the workbook carries a machine-written marker, either the
//!    hidden context sheet together with the generator named range, or stamped
//!    marker text in every configured stamp cell. The embedded context JSON is
//!    read when present; a generator workbook whose context cannot be read is
//!    still a generator, just without a usable context.
//! 2. **Default**: both sentinel columns of the current layout are present.
//! 3. **Alternative**: anything else.
//!
//! Unreadable workbook metadata never fails classification; it yields
//! Alternative.

use serde::Deserialize;
use tracing::{debug, info, warn};

use pricelist_model::{CellRef, TemplateContext, TemplateKind, Workbook, WorkbookError};
use pricelist_standards::ClassifierOptions;

/// Which generator marker matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeneratorMarker {
    ContextSheet,
    StampedCells,
}

/// Context JSON written by the template generator. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmbeddedContext {
    product_types: Vec<String>,
    institution_codes: Vec<String>,
    gs1_mode: Option<String>,
    has_staffel: bool,
    visible_fields: Vec<String>,
    mandatory_fields: Vec<String>,
    hidden_fields: Vec<String>,
}

/// Classify a workbook from its metadata and resolved column names.
pub fn classify_template(
    workbook: &dyn Workbook,
    columns: &[&str],
    options: &ClassifierOptions,
) -> TemplateContext {
    let marker = match generator_marker(workbook, options) {
        Ok(marker) => marker,
        Err(error) => {
            warn!(%error, "workbook metadata unreadable, classifying as alternative");
            return TemplateContext::bare(TemplateKind::Alternative);
        }
    };

    if let Some(marker) = marker {
        let context = read_embedded_context(workbook, options);
        info!(
            ?marker,
            context_usable = context.context_usable,
            mandatory = context.mandatory_fields.len(),
            "generator template"
        );
        return context;
    }

    let has_sentinels = !options.default_sentinels.is_empty()
        && options
            .default_sentinels
            .iter()
            .all(|sentinel| columns.contains(&sentinel.as_str()));
    let kind = if has_sentinels {
        TemplateKind::Default
    } else {
        TemplateKind::Alternative
    };
    info!(kind = kind.label(), "template classified");
    TemplateContext::bare(kind)
}

fn generator_marker(
    workbook: &dyn Workbook,
    options: &ClassifierOptions,
) -> Result<Option<GeneratorMarker>, WorkbookError> {
    if workbook.has_sheet(&options.context_sheet)? {
        let named = workbook
            .named_ranges()?
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&options.generator_named_range));
        if named {
            return Ok(Some(GeneratorMarker::ContextSheet));
        }
        debug!(
            sheet = %options.context_sheet,
            "context sheet present without the generator named range"
        );
    }

    if options.stamp_cells.is_empty() || options.stamp_marker.trim().is_empty() {
        return Ok(None);
    }
    let marker = options.stamp_marker.to_lowercase();
    for reference in &options.stamp_cells {
        let cell = CellRef::parse(reference)?;
        let stamped = workbook
            .sheet_cell(&options.stamp_sheet, &cell)?
            .is_some_and(|text| text.to_lowercase().contains(&marker));
        if !stamped {
            return Ok(None);
        }
    }
    Ok(Some(GeneratorMarker::StampedCells))
}

fn read_embedded_context(workbook: &dyn Workbook, options: &ClassifierOptions) -> TemplateContext {
    let bare = TemplateContext::bare(TemplateKind::Generator);
    let text = match CellRef::parse(&options.context_cell)
        .and_then(|cell| workbook.sheet_cell(&options.context_sheet, &cell))
    {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("generator workbook carries no embedded context");
            return bare;
        }
        Err(error) => {
            warn!(%error, "embedded context unreadable");
            return bare;
        }
    };
    let embedded: EmbeddedContext = match serde_json::from_str(&text) {
        Ok(embedded) => embedded,
        Err(error) => {
            warn!(%error, "embedded context is not valid JSON");
            return bare;
        }
    };

    let mandatory_fields = clean(embedded.mandatory_fields);
    TemplateContext {
        template_kind: TemplateKind::Generator,
        context_usable: !mandatory_fields.is_empty(),
        visible_fields: clean(embedded.visible_fields),
        mandatory_fields,
        hidden_fields: clean(embedded.hidden_fields),
        institution_codes: clean(embedded.institution_codes),
        product_types: clean(embedded.product_types),
        gs1_mode: embedded
            .gs1_mode
            .map(|mode| mode.trim().to_string())
            .filter(|mode| !mode.is_empty()),
        has_staffel: embedded.has_staffel,
    }
}

/// Trim, drop blanks and keep the first occurrence of each name.
fn clean(names: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}
