//! Editor-boundary protocol: repair in-memory files shipped over the wire.
//!
//! An editor extension sends the current contents of its open files plus
//! the diagnostics it sees; the response either carries rewritten files
//! and a unified diff (`PATCH`) or signals that nothing was changed
//! (`ADVICE`). No disk access happens on either side of the exchange.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use similar::TextDiff;

use mender_core::SourceBuffer;
use mender_syntax::SyntaxError;

use crate::error::EngineError;
use crate::index::SymbolIndex;
use crate::orchestrator::repair_in_memory;
use crate::plan::Plan;
use crate::probe::MemoryProbe;

/// A diagnostic as the editor reports it, location-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDiagnostic {
    /// Root-relative file the diagnostic was reported in.
    pub file: Utf8PathBuf,
    /// Stable numeric code.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

/// Request payload from the editor extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRequest {
    /// Root-relative paths mapped to their current buffer contents.
    pub files: BTreeMap<Utf8PathBuf, String>,
    /// Diagnostics the editor currently displays. Advisory: the heuristic
    /// passes run regardless, and no analysis session exists to resolve
    /// fix candidates for them.
    #[serde(default)]
    pub diagnostics: Vec<WireDiagnostic>,
}

/// Whether the response carries rewritten files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseMode {
    /// Files were rewritten; `files_out` and `diff` are present.
    #[serde(rename = "PATCH")]
    Patch,
    /// Nothing changed; the editor should fall back to surfacing advice.
    #[serde(rename = "ADVICE")]
    Advice,
}

/// Response payload to the editor extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResponse {
    /// Outcome discriminator.
    pub mode: ResponseMode,
    /// Rewritten file contents, present only in `PATCH` responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_out: Option<BTreeMap<Utf8PathBuf, String>>,
    /// Unified diff over all changed files, present only in `PATCH`
    /// responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Runs the heuristic passes over the request's in-memory files.
///
/// Files with extensions outside the supported dialects pass through
/// untouched; an extension sends every open buffer, not just source files.
///
/// # Errors
///
/// Propagates [`EngineError`] when a supported file cannot be processed.
pub fn respond(request: &FixRequest, plan: &Plan) -> Result<FixResponse, EngineError> {
    let probe = MemoryProbe::new(request.files.keys().cloned());
    let index = SymbolIndex::build(
        plan,
        request
            .files
            .iter()
            .map(|(path, content)| (path.as_path(), content.as_str())),
    );

    let mut files_out = BTreeMap::new();
    let mut diff = String::new();
    for (relative, content) in &request.files {
        let mut buffer = SourceBuffer::from_content(relative.clone(), content.clone());
        match repair_in_memory(relative, &mut buffer, plan, &probe, &index) {
            Ok(_) => {}
            Err(EngineError::Syntax(SyntaxError::UnsupportedExtension { .. })) => continue,
            Err(error) => return Err(error),
        }
        if buffer.is_dirty() {
            diff.push_str(
                &TextDiff::from_lines(content.as_str(), buffer.content())
                    .unified_diff()
                    .context_radius(3)
                    .header(&format!("a/{relative}"), &format!("b/{relative}"))
                    .to_string(),
            );
            files_out.insert(relative.clone(), buffer.content().to_owned());
        }
    }

    if files_out.is_empty() {
        Ok(FixResponse {
            mode: ResponseMode::Advice,
            files_out: None,
            diff: None,
        })
    } else {
        Ok(FixResponse {
            mode: ResponseMode::Patch,
            files_out: Some(files_out),
            diff: Some(diff),
        })
    }
}
