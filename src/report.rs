//! Questionnaire report rendering.
//!
//! Produces the paginated PDF summarizing one completed session: title,
//! patient information, summary block, the numbered question/answer list,
//! the signature image, and a footer on the final page. Layout positions
//! are tracked top-down in millimeters and converted to PDF point space
//! when operators are emitted.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::bidi::{is_rtl, visual_order};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::session::{Phase, Session};
use crate::writer::images::ImageData;
use crate::writer::{ContentStreamBuilder, DocumentConfig, Font, PdfWriter};

/// Points per millimeter.
const MM: f32 = 72.0 / 25.4;
/// A4 height in millimeters.
const PAGE_HEIGHT_MM: f32 = 297.0;
/// Left margin in millimeters.
const MARGIN_LEFT: f32 = 20.0;
/// Wrap width for question text in millimeters.
const TEXT_WIDTH: f32 = 170.0;
/// Line advance for wrapped body text in millimeters.
const LINE_STEP: f32 = 5.0;
/// A question/answer pair starting below this line moves to a new page.
const BODY_LIMIT: f32 = 270.0;

/// Title and heading blue, rgb(37, 99, 235).
const ACCENT: (f32, f32, f32) = (37.0 / 255.0, 99.0 / 255.0, 235.0 / 255.0);
/// Footer gray.
const FOOTER_GRAY: (f32, f32, f32) = (0.5, 0.5, 0.5);
const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);

/// Everything needed to render one report.
#[derive(Debug, Clone)]
pub struct IntakeReport {
    /// Patient full name
    pub patient_name: String,
    /// Intake date; rendered as "Not specified" when absent
    pub date: Option<NaiveDate>,
    /// Question texts in presentation order
    pub questions: Vec<String>,
    /// Answers keyed by 0-based question index; absent means No
    pub answers: BTreeMap<usize, bool>,
    /// Signature image data URI
    pub signature: Option<String>,
    /// Date stamped into the summary block
    pub generated_on: NaiveDate,
}

impl IntakeReport {
    /// Build a report from a completed session.
    ///
    /// Rejected with [`Error::InvalidTransition`] unless the session has
    /// reached Summary.
    pub fn from_session(session: &Session, generated_on: NaiveDate) -> Result<Self> {
        if session.phase() != Phase::Summary {
            return Err(Error::InvalidTransition {
                from: "Questionnaire",
                action: "export the report",
            });
        }
        Ok(Self {
            patient_name: session.patient().full_name.clone(),
            date: session.patient().date,
            questions: session.questions().to_vec(),
            answers: session.answers().clone(),
            signature: session.signature().map(str::to_string),
            generated_on,
        })
    }

    /// Build a report stamped with today's local date.
    pub fn from_session_now(session: &Session) -> Result<Self> {
        Self::from_session(session, chrono::Local::now().date_naive())
    }

    /// Answer text for a question index; unanswered reads as No.
    pub fn answer_text(&self, index: usize) -> &'static str {
        if self.answers.get(&index).copied().unwrap_or(false) {
            "Yes"
        } else {
            "No"
        }
    }

    /// Download file name: `medical-questionnaire-{name}.pdf` with
    /// whitespace runs collapsed to single hyphens.
    pub fn suggested_filename(&self) -> String {
        let name: Vec<&str> = self.patient_name.split_whitespace().collect();
        format!("medical-questionnaire-{}.pdf", name.join("-"))
    }
}

/// Renderer with document-level settings.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    config: DocumentConfig,
}

impl ReportRenderer {
    /// Renderer with default settings (uncompressed streams).
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with explicit document config.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Render the report to PDF bytes.
    pub fn render(&self, report: &IntakeReport) -> Result<Vec<u8>> {
        let config = self
            .config
            .clone()
            .with_title("Medical Questionnaire Report")
            .with_author(report.patient_name.clone())
            .with_creator("Medical Questionnaire System");
        let mut writer = PdfWriter::with_config(config);

        // Decode the signature up front so the XObject is registered
        // before any page references it. A corrupt signature downgrades
        // to the fallback text, never a render failure.
        let signature = match report.signature.as_deref() {
            Some(uri) => match ImageData::from_data_uri(uri) {
                Ok(image) => Some((writer.register_image(image.clone()), image)),
                Err(e) => {
                    log::warn!("could not embed signature image: {}", e);
                    None
                },
            },
            None => None,
        };
        let has_signature = report.signature.is_some();

        let mut layout = Layout::new(&mut writer);

        layout.text(Font::HelveticaBold, 20.0, ACCENT, "Medical Questionnaire Report", 30.0);

        layout.text(Font::HelveticaBold, 16.0, BLACK, "Patient Information", 50.0);
        layout.text(Font::Helvetica, 12.0, BLACK, &format!("Name: {}", report.patient_name), 65.0);
        let date_line = match report.date {
            Some(date) => format!("Date: {}", format_date(date)),
            None => "Date: Not specified".to_string(),
        };
        layout.text(Font::Helvetica, 12.0, BLACK, &date_line, 75.0);

        layout.text(Font::HelveticaBold, 16.0, BLACK, "Questionnaire Summary", 95.0);
        layout.text(
            Font::Helvetica,
            12.0,
            BLACK,
            &format!("Total Questions: {}", report.questions.len()),
            110.0,
        );
        layout.text(Font::Helvetica, 12.0, BLACK, "Status: Completed", 120.0);
        layout.text(
            Font::Helvetica,
            12.0,
            BLACK,
            &format!("Completion Date: {}", format_date(report.generated_on)),
            130.0,
        );

        layout.text(Font::HelveticaBold, 16.0, BLACK, "Questions and Answers", 150.0);

        layout.y = 165.0;
        for (index, question) in report.questions.iter().enumerate() {
            let question_line = format!("{}. {}", index + 1, question);
            let lines = wrap_body(&question_line);

            // Question and its answer stay on the same page
            let pair_height = lines.len() as f32 * LINE_STEP + 2.0 * LINE_STEP;
            if layout.y + pair_height > BODY_LIMIT {
                layout.new_page();
            }

            for line in &lines {
                layout.body_line(line);
                layout.y += LINE_STEP;
            }
            layout.text(
                Font::Helvetica,
                10.0,
                ACCENT,
                &format!("Answer: {}", report.answer_text(index)),
                layout.y,
            );
            layout.y += 2.0 * LINE_STEP;
        }

        if has_signature {
            if layout.y > 200.0 {
                layout.new_page();
            }
            let heading_y = layout.y;
            layout.text(Font::HelveticaBold, 16.0, BLACK, "Digital Signature", heading_y);

            match &signature {
                Some((resource_id, image)) => {
                    let rect = scaled_signature_box(image, heading_y + 10.0);
                    layout.image(resource_id, rect);
                },
                None => {
                    layout.text(
                        Font::Helvetica,
                        12.0,
                        BLACK,
                        "Signature captured (unable to display in PDF)",
                        heading_y + 20.0,
                    );
                },
            }
        }

        layout.text(
            Font::Helvetica,
            10.0,
            FOOTER_GRAY,
            "Generated by Medical Questionnaire System",
            280.0,
        );

        writer.finish()
    }

    /// Render and write to a file at `path`.
    pub fn render_to_file(
        &self,
        report: &IntakeReport,
        path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let bytes = self.render(report)?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| Error::Render(format!("could not write {}: {}", path.as_ref().display(), e)))?;
        log::info!("report written to {}", path.as_ref().display());
        Ok(())
    }
}

/// `3/1/2024` style, matching the on-screen date rendering.
fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Wrap a body line at the question column width, reordering RTL text.
fn wrap_body(text: &str) -> Vec<String> {
    let font = Font::Helvetica;
    let max = TEXT_WIDTH * MM;
    if is_rtl(text) {
        font.wrap_text(&visual_order(text), 10.0, max)
    } else {
        font.wrap_text(text, 10.0, max)
    }
}

/// The signature box is 100x40 mm at the left margin; wider or taller
/// captures shrink to fit. Coordinates in millimeters, top-left origin.
fn scaled_signature_box(image: &ImageData, top_mm: f32) -> Rect {
    let (w_pt, h_pt) = image.fit_to_box(100.0 * MM, 40.0 * MM);
    Rect::new(MARGIN_LEFT, top_mm, w_pt / MM, h_pt / MM)
}

/// Top-down layout cursor over the page writer.
struct Layout<'a> {
    writer: &'a mut PdfWriter,
    /// Current vertical position in millimeters from the page top
    y: f32,
}

impl<'a> Layout<'a> {
    fn new(writer: &'a mut PdfWriter) -> Self {
        writer.add_a4_page();
        Self { writer, y: 0.0 }
    }

    fn new_page(&mut self) {
        self.writer.add_a4_page();
        self.y = 20.0;
    }

    fn content(&mut self) -> &mut ContentStreamBuilder {
        self.writer.last_page()
    }

    /// Show one line with its baseline at `y_mm` from the page top.
    fn text(&mut self, font: Font, size: f32, color: (f32, f32, f32), text: &str, y_mm: f32) {
        let x = MARGIN_LEFT * MM;
        let y = (PAGE_HEIGHT_MM - y_mm) * MM;
        let shown = visual_order(text);
        // RTL lines right-align to the text column's right edge
        let x = if is_rtl(text) {
            let right = (MARGIN_LEFT + TEXT_WIDTH) * MM;
            right - font.text_width(&shown, size)
        } else {
            x
        };
        self.content()
            .set_fill_color(color.0, color.1, color.2)
            .set_font(font.resource_name(), size)
            .text(&shown, x, y)
            .end_text();
    }

    /// A pre-wrapped 10pt body line at the current cursor.
    fn body_line(&mut self, line: &str) {
        let y = self.y;
        // Already visually ordered by the wrapper; alignment still keys
        // off the script
        let x = if is_rtl(line) {
            (MARGIN_LEFT + TEXT_WIDTH) * MM - Font::Helvetica.text_width(line, 10.0)
        } else {
            MARGIN_LEFT * MM
        };
        let y_pt = (PAGE_HEIGHT_MM - y) * MM;
        self.content()
            .set_fill_color(0.0, 0.0, 0.0)
            .set_font(Font::Helvetica.resource_name(), 10.0)
            .text(line, x, y_pt)
            .end_text();
    }

    /// Place an image within a top-left-origin millimeter rectangle.
    fn image(&mut self, resource_id: &str, rect: Rect) {
        let x = rect.left() * MM;
        let y = (PAGE_HEIGHT_MM - rect.bottom()) * MM;
        self.content().draw_image(resource_id, x, y, rect.width * MM, rect.height * MM);
    }
}
