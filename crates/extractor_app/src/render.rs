use std::fmt::Write as _;

use extractor_core::{
    derive_allergen_chips, derive_notices, derive_nutrition_rows, derive_product_facts,
    AttemptViewModel, ChipTone, DisplayRow, ExtractionResult, Phase, ResultTab,
};
use extractor_engine::HealthReport;

/// Renders the attempt view as plain text for the terminal.
pub fn render(view: &AttemptViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));

    if let Some(message) = &view.error_message {
        let prefix = if view.phase == Phase::Failed {
            "Error"
        } else {
            "Rejected"
        };
        let _ = writeln!(out, "{prefix}: {message}");
    }

    if let Some(result) = &view.result {
        out.push('\n');
        match view.result_tab {
            ResultTab::Overview => render_overview(&mut out, result),
            ResultTab::Allergens => render_allergens(&mut out, result),
            ResultTab::Nutrition => render_nutrition(&mut out, result),
            ResultTab::Raw => {
                out.push_str(&render_json(result));
                out.push('\n');
            }
        }
    }
    out
}

/// Pretty JSON of the parsed result. Numbers keep their received form;
/// fields the service left out appear as `null`.
pub fn render_json(result: &ExtractionResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = String::new();
    let status = report.status.as_deref().unwrap_or("unknown");
    let _ = writeln!(out, "Service: {status}");
    if let Some(model) = &report.model {
        let _ = writeln!(out, "Model: {model}");
    }
    if let Some(configured) = report.api_key_configured {
        let _ = writeln!(out, "API key configured: {}", yes_no(configured));
    }
    if let Some(ocr) = report.ocr_available {
        let _ = writeln!(out, "OCR available: {}", yes_no(ocr));
    }
    if let Some(max) = report.max_pdf_size_mb {
        let _ = writeln!(out, "Max PDF size: {max} MB");
    }
    out
}

fn status_line(view: &AttemptViewModel) -> String {
    let phase = match view.phase {
        Phase::Idle => "Idle",
        Phase::Ready => "Ready",
        Phase::InFlight => "Extracting",
        Phase::Succeeded => "Done",
        Phase::Failed => "Failed",
    };
    match &view.document {
        Some(doc) => format!(
            "Status: {phase} | {} ({}, {} bytes)",
            doc.file_name,
            doc.content_type,
            format_with_commas(doc.byte_len as u64)
        ),
        None => format!("Status: {phase} | no document"),
    }
}

fn render_overview(out: &mut String, result: &ExtractionResult) {
    let facts = derive_product_facts(result);
    if !facts.is_empty() {
        write_table(out, &facts);
        out.push('\n');
    }

    for (label, text) in [
        ("Ingredients", result.ingredients_text.as_deref()),
        ("Notes", result.notes.as_deref()),
    ] {
        if let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) {
            let _ = writeln!(out, "{label}: {text}\n");
        }
    }

    render_allergens(out, result);
    render_nutrition(out, result);

    let notices = derive_notices(result);
    if !notices.is_empty() {
        let _ = writeln!(out, "Notices:");
        for notice in notices {
            let _ = writeln!(out, "  ! {notice}");
        }
    }
}

fn render_allergens(out: &mut String, result: &ExtractionResult) {
    let chips = derive_allergen_chips(&result.allergens);
    let _ = writeln!(out, "Allergens:");
    if chips.is_empty() {
        let _ = writeln!(out, "  (none declared)");
    }
    for chip in chips {
        let marker = match chip.tone {
            ChipTone::Ok => "[+]",
            ChipTone::Warn => "[~]",
            ChipTone::Muted => "[-]",
        };
        let _ = writeln!(out, "  {marker} {}", chip.label);
    }
    out.push('\n');
}

fn render_nutrition(out: &mut String, result: &ExtractionResult) {
    let rows = derive_nutrition_rows(result.nutrition.as_ref());
    let _ = writeln!(out, "Nutrition:");
    if rows.is_empty() {
        let _ = writeln!(out, "  (no nutrition data)");
    } else {
        write_table(out, &rows);
    }
    out.push('\n');
}

fn write_table(out: &mut String, rows: &[DisplayRow]) {
    let width = rows
        .iter()
        .map(|row| label_text(row).chars().count())
        .max()
        .unwrap_or(0);
    for row in rows {
        let label = label_text(row);
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {label}{}  {}", " ".repeat(pad), row.value);
    }
}

fn label_text(row: &DisplayRow) -> String {
    if row.indented {
        format!("  {}", row.label)
    } else {
        row.label.clone()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
