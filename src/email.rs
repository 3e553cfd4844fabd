//! Email hand-off for questionnaire results.
//!
//! Results go out through the user's own mail client: the full summary is
//! composed as plain text and packed into a `mailto:` URI with the subject
//! and body percent-encoded. No mail is sent directly.

use chrono::NaiveDate;

use crate::error::Result;
use crate::report::IntakeReport;

/// Fixed subject line for outgoing results.
pub const SUBJECT: &str = "Medical Questionnaire Results";

/// Compose the plain-text message body for a report.
pub fn compose_body(report: &IntakeReport) -> String {
    let mut qa = String::new();
    for (index, question) in report.questions.iter().enumerate() {
        qa.push_str(&format!(
            "{}. {}\nAnswer: {}\n\n",
            index + 1,
            question,
            report.answer_text(index)
        ));
    }

    let date = report.date.map(long_date).unwrap_or_default();
    format!(
        "Medical Questionnaire Results\n\n\
         Patient Information:\n\
         - Name: {}\n\
         - Date: {}\n\n\
         Questionnaire Summary:\n\
         - Total Questions: {}\n\
         - Status: Completed\n\
         - Completion Date: {}\n\n\
         Questions and Answers:\n\
         {}\n\
         This questionnaire has been completed and digitally signed.\n",
        report.patient_name,
        date,
        report.questions.len(),
        long_date(report.generated_on),
        qa,
    )
}

/// Build the `mailto:` URI with subject and body percent-encoded. The
/// recipient is left for the user's mail client.
pub fn mailto_uri(report: &IntakeReport) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(SUBJECT),
        urlencoding::encode(&compose_body(report))
    )
}

/// `March 1, 2024` style for the message body.
fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Capability for opening a composed message.
pub trait MailClient {
    /// Hand a `mailto:` URI to a mail client.
    fn open(&self, uri: &str) -> Result<()>;
}

/// Opens the URI with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMailClient;

impl SystemMailClient {
    #[cfg(target_os = "linux")]
    const OPENER: &'static str = "xdg-open";
    #[cfg(target_os = "macos")]
    const OPENER: &'static str = "open";
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    const OPENER: &'static str = "xdg-open";
}

impl MailClient for SystemMailClient {
    /// Fire-and-forget: only a failure to spawn the opener is an error;
    /// whatever the handler does with the URI afterwards is its business.
    fn open(&self, uri: &str) -> Result<()> {
        let status = std::process::Command::new(Self::OPENER).arg(uri).status()?;
        if !status.success() {
            log::warn!("{} exited with {}", Self::OPENER, status);
        } else {
            log::info!("handed message to the system mail client");
        }
        Ok(())
    }
}

/// Compose and open the results email for a report.
pub fn send_results<C: MailClient>(client: &C, report: &IntakeReport) -> Result<()> {
    client.open(&mailto_uri(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    fn sample_report() -> IntakeReport {
        IntakeReport {
            patient_name: "Jane Doe".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            questions: vec!["Do you smoke?".to_string(), "Any allergies?".to_string()],
            answers: BTreeMap::from([(0, true)]),
            signature: Some("data:image/png;base64,AAAA".to_string()),
            generated_on: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        }
    }

    #[test]
    fn test_body_lists_all_answers() {
        let body = compose_body(&sample_report());
        assert!(body.contains("- Name: Jane Doe"));
        assert!(body.contains("- Date: March 1, 2024"));
        assert!(body.contains("- Total Questions: 2"));
        assert!(body.contains("1. Do you smoke?\nAnswer: Yes"));
        assert!(body.contains("2. Any allergies?\nAnswer: No"));
        assert!(body.contains("completed and digitally signed"));
    }

    #[test]
    fn test_body_with_missing_date_is_blank() {
        let mut report = sample_report();
        report.date = None;
        assert!(compose_body(&report).contains("- Date: \n"));
    }

    #[test]
    fn test_mailto_uri_is_percent_encoded() {
        let uri = mailto_uri(&sample_report());
        assert!(uri.starts_with("mailto:?subject=Medical%20Questionnaire%20Results&body="));
        assert!(!uri.contains('\n'));
        assert!(uri.contains("%0A"));
        // The raw question text survives decoding
        let decoded = urlencoding::decode(uri.split("&body=").nth(1).unwrap()).unwrap();
        assert!(decoded.contains("1. Do you smoke?"));
    }

    struct RecordingClient {
        opened: RefCell<Vec<String>>,
    }

    impl MailClient for RecordingClient {
        fn open(&self, uri: &str) -> Result<()> {
            self.opened.borrow_mut().push(uri.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_send_results_opens_composed_uri() {
        let client = RecordingClient {
            opened: RefCell::new(Vec::new()),
        };
        send_results(&client, &sample_report()).unwrap();
        let opened = client.opened.borrow();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0], mailto_uri(&sample_report()));
    }
}
