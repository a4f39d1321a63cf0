use std::fmt;

use serde::Serialize;

use crate::foundation::diagnostics::ItemDiagnostic;

/// Aggregated explanation for a share request that produced no handles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShareReport {
    pub diagnostics: Vec<ItemDiagnostic>,
}

impl ShareReport {
    pub fn new(diagnostics: Vec<ItemDiagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Expected relative paths of every failed item.
    pub fn expected_paths(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.path.as_str()).collect()
    }
}

impl fmt::Display for ShareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            return f.write_str("nothing to share: no products were selected");
        }
        writeln!(
            f,
            "nothing to share: none of the {} selected card(s) could be resolved",
            self.diagnostics.len()
        )?;
        writeln!(f, "expected files:")?;
        for d in &self.diagnostics {
            writeln!(f, "  - {} ({})", d.path, d.reason)?;
        }
        writeln!(
            f,
            "cards are stored as {{folder}}/product_{{id}}_{{folder}}.png under the export root"
        )?;
        write!(
            f,
            "re-render the cards, or check that the export folder exists and is writable"
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/share/report.rs"]
mod tests;
