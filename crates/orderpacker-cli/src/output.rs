//! Rendering of packing results for the terminal.

use clap::ValueEnum;
use orderpacker_lib::BoxSet;
use orderpacker_service_shared::PackResponse;
use serde::Serialize;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human readable table.
    #[default]
    Text,
    /// Single-line JSON document.
    Json,
}

/// A packed order together with the totals shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSummary {
    pub items: u64,
    #[serde(flatten)]
    pub response: PackResponse,
    pub total_boxes: u64,
    pub shipped: u64,
}

impl PackSummary {
    /// Aggregate the boxes chosen for `items`.
    pub fn new(items: u64, boxes: &[u64]) -> Self {
        let response = PackResponse::from_boxes(boxes);
        Self {
            items,
            total_boxes: response.box_count(),
            shipped: boxes.iter().sum(),
            response,
        }
    }

    /// Capacity shipped beyond what was ordered.
    pub fn overshoot(&self) -> u64 {
        self.shipped.saturating_sub(self.items)
    }
}

/// Render a packed order in the requested format.
pub fn render_pack(summary: &PackSummary, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(summary),
        OutputFormat::Text => Ok(render_pack_text(summary)),
    }
}

/// Render the normalized box set in the requested format.
pub fn render_boxes(boxes: &BoxSet, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(boxes),
        OutputFormat::Text => Ok(render_boxes_text(boxes)),
    }
}

fn render_pack_text(summary: &PackSummary) -> String {
    let mut out = format!(
        "Packed {} items into {} {} ({} capacity, {} spare)\n",
        format_with_separators(summary.items),
        format_with_separators(summary.total_boxes),
        if summary.total_boxes == 1 { "box" } else { "boxes" },
        format_with_separators(summary.shipped),
        format_with_separators(summary.overshoot()),
    );

    let width = summary
        .response
        .packs
        .iter()
        .map(|pack| format_with_separators(pack.box_size).len())
        .max()
        .unwrap_or(0);

    for pack in &summary.response.packs {
        out.push_str(&format!(
            "  {:>width$} x {}\n",
            format_with_separators(pack.box_size),
            pack.quantity,
        ));
    }

    out
}

fn render_boxes_text(boxes: &BoxSet) -> String {
    let mut out = format!("Box sizes ({}):\n", boxes.len());
    for capacity in boxes.iter() {
        out.push_str(&format!("  {}\n", format_with_separators(capacity)));
    }
    out
}

/// Format an integer with thousands separators, e.g. `12001` as `12,001`.
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
