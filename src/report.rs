//! PDF report card rendering.
//!
//! One call renders one student's aggregated record into
//! `report_card_<StudentID>.pdf`: four labeled summary lines followed by a
//! two-column subject/score table with a styled header, repeated on every
//! page when the table spills over.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use crate::aggregate::StudentRecord;

// US Letter.
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 25.4;

const PT_TO_MM: f64 = 0.352_778;

// Subject column twice as wide as the score column.
const SUBJECT_COL_MM: f64 = 200.0 * PT_TO_MM;
const SCORE_COL_MM: f64 = 100.0 * PT_TO_MM;

const ROW_HEIGHT_MM: f64 = 8.0;
const LINE_GAP_MM: f64 = 7.0;
const TABLE_GAP_MM: f64 = 5.0;
const TEXT_BASELINE_MM: f64 = 2.6;
const FONT_SIZE_PT: f64 = 11.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Renders one student's report card into `out_dir` and returns the file
/// name. An existing file with the same name is overwritten.
///
/// # Errors
///
/// Returns an error if the PDF cannot be constructed or written. Callers
/// treat this as recoverable for the batch: the failure belongs to this
/// student only.
pub fn render_report(record: &StudentRecord, out_dir: &Path) -> Result<String> {
    let file_name = format!("report_card_{}.pdf", record.student_id);
    let path = out_dir.join(&file_name);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Report Card",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("failed to load builtin font: {e}"))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("failed to load builtin font: {e}"))?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM;

    labeled_line(&layer, &fonts, "Student Name:", &record.name, cursor);
    cursor -= LINE_GAP_MM;
    labeled_line(&layer, &fonts, "Student ID:", &record.student_id, cursor);
    cursor -= LINE_GAP_MM;
    labeled_line(
        &layer,
        &fonts,
        "Total Score:",
        &format_score(record.total_score),
        cursor,
    );
    cursor -= LINE_GAP_MM;
    labeled_line(
        &layer,
        &fonts,
        "Average Score:",
        &format!("{:.2}", record.average_score),
        cursor,
    );
    cursor -= LINE_GAP_MM + TABLE_GAP_MM;

    header_row(&layer, &fonts, cursor);
    cursor -= ROW_HEIGHT_MM;

    for (subject, score) in &record.subject_scores {
        if cursor - ROW_HEIGHT_MM < MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            cursor = PAGE_HEIGHT_MM - MARGIN_MM;

            header_row(&layer, &fonts, cursor);
            cursor -= ROW_HEIGHT_MM;
        }

        body_row(&layer, &fonts, subject, &format_score(*score), cursor);
        cursor -= ROW_HEIGHT_MM;
    }

    let file = File::create(&path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("failed to write '{}': {e}", path.display()))?;

    Ok(file_name)
}

/// Formats a score the way the summed column prints: integral values
/// without a decimal point, fractional values as-is.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn labeled_line(layer: &PdfLayerReference, fonts: &Fonts, label: &str, value: &str, y: f64) {
    layer.set_fill_color(black());
    layer.use_text(label, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &fonts.bold);

    let value_x = MARGIN_MM + text_width_mm(label, FONT_SIZE_PT) + 2.0;
    layer.use_text(value, FONT_SIZE_PT, Mm(value_x), Mm(y), &fonts.regular);
}

fn header_row(layer: &PdfLayerReference, fonts: &Fonts, top: f64) {
    // Grey band, near-white bold text.
    draw_row_frame(layer, top, Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None)));
    layer.set_fill_color(Color::Rgb(Rgb::new(0.96, 0.96, 0.96, None)));
    cell_text(layer, &fonts.bold, "Subject", MARGIN_MM, SUBJECT_COL_MM, top);
    cell_text(
        layer,
        &fonts.bold,
        "Score",
        MARGIN_MM + SUBJECT_COL_MM,
        SCORE_COL_MM,
        top,
    );
}

fn body_row(layer: &PdfLayerReference, fonts: &Fonts, subject: &str, score: &str, top: f64) {
    // Beige band, black text.
    draw_row_frame(layer, top, Color::Rgb(Rgb::new(0.96, 0.96, 0.86, None)));
    layer.set_fill_color(black());
    cell_text(layer, &fonts.regular, subject, MARGIN_MM, SUBJECT_COL_MM, top);
    cell_text(
        layer,
        &fonts.regular,
        score,
        MARGIN_MM + SUBJECT_COL_MM,
        SCORE_COL_MM,
        top,
    );
}

/// Fills the row background and strokes both cell borders, giving the
/// table its full grid.
fn draw_row_frame(layer: &PdfLayerReference, top: f64, background: Color) {
    let bottom = top - ROW_HEIGHT_MM;
    let divider = MARGIN_MM + SUBJECT_COL_MM;
    let right = divider + SCORE_COL_MM;

    layer.set_fill_color(background);
    layer.add_shape(rect(MARGIN_MM, bottom, right, top, true, false));

    layer.set_outline_color(black());
    layer.set_outline_thickness(1.0);
    layer.add_shape(rect(MARGIN_MM, bottom, divider, top, false, true));
    layer.add_shape(rect(divider, bottom, right, top, false, true));
}

fn cell_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    cell_left: f64,
    cell_width: f64,
    top: f64,
) {
    let width = text_width_mm(text, FONT_SIZE_PT);
    let x = cell_left + (cell_width - width).max(0.0) / 2.0;
    let y = top - ROW_HEIGHT_MM + TEXT_BASELINE_MM;
    layer.use_text(text, FONT_SIZE_PT, Mm(x), Mm(y), font);
}

/// Approximate Helvetica line width. Builtin-font metrics are not exposed,
/// so this assumes half an em per glyph, which centers short cells well.
fn text_width_mm(text: &str, font_size_pt: f64) -> f64 {
    text.chars().count() as f64 * font_size_pt * 0.5 * PT_TO_MM
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64, fill: bool, stroke: bool) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x0), Mm(y0)), false),
            (Point::new(Mm(x1), Mm(y0)), false),
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x0), Mm(y1)), false),
        ],
        is_closed: true,
        has_fill: fill,
        has_stroke: stroke,
        is_clipping_path: false,
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: &str, subjects: usize) -> StudentRecord {
        let subject_scores: Vec<(String, f64)> = (0..subjects)
            .map(|i| (format!("Subject {i}"), 50.0 + i as f64))
            .collect();
        let total: f64 = subject_scores.iter().map(|(_, s)| s).sum();
        StudentRecord {
            student_id: student_id.to_string(),
            name: "Test Student".to_string(),
            average_score: total / subjects.max(1) as f64,
            total_score: total,
            subject_scores,
        }
    }

    #[test]
    fn test_render_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();

        let file_name = render_report(&record("7", 3), dir.path()).unwrap();
        assert_eq!(file_name, "report_card_7.pdf");

        let bytes = std::fs::read(dir.path().join(&file_name)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report_card_7.pdf");
        std::fs::write(&path, b"stale").unwrap();

        render_report(&record("7", 1), dir.path()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_paginates_long_table() {
        let dir = tempfile::tempdir().unwrap();

        // Enough rows to spill past one Letter page.
        let file_name = render_report(&record("9", 60), dir.path()).unwrap();

        let bytes = std::fs::read(dir.path().join(&file_name)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_fails_when_out_dir_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        assert!(render_report(&record("7", 1), &blocker).is_err());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(170.0), "170");
        assert_eq!(format_score(70.0), "70");
        assert_eq!(format_score(85.5), "85.5");
    }
}
