//! Questionnaire session state machine.
//!
//! A [`Session`] owns the full in-memory record for one patient: identity
//! data, the question snapshot taken at session start, the answers, the
//! cursor, and the captured signature. Phase transitions are strictly
//! forward (Intake → Questionnaire → Summary) with two sanctioned
//! exceptions: stepping back from the signing sub-state to answering, and
//! a full reset to Intake.
//!
//! Single logical actor: every operation is synchronous and atomic from
//! the caller's perspective.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Patient identity data collected during Intake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRecord {
    /// Full name; non-empty once Intake completes
    pub full_name: String,
    /// Calendar date of the intake; present once Intake completes
    pub date: Option<NaiveDate>,
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Collecting patient identity (name, date)
    Intake,
    /// Walking the question list; `signing` is the sub-state reached after
    /// the last question
    Questionnaire {
        /// Whether the session is on the signature step
        signing: bool,
    },
    /// Terminal phase offering export actions
    Summary,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Intake => "Intake",
            Phase::Questionnaire { .. } => "Questionnaire",
            Phase::Summary => "Summary",
        }
    }
}

/// One patient intake session.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    patient: PatientRecord,
    questions: Vec<String>,
    answers: BTreeMap<usize, bool>,
    cursor: usize,
    signature: Option<String>,
}

impl Session {
    /// Start a session over a snapshot of the question list.
    ///
    /// The snapshot is taken once; later admin edits do not affect a
    /// running session.
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            phase: Phase::Intake,
            patient: PatientRecord::default(),
            questions,
            answers: BTreeMap::new(),
            cursor: 0,
            signature: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Patient identity data.
    pub fn patient(&self) -> &PatientRecord {
        &self.patient
    }

    /// Question snapshot for this session.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Recorded answers, keyed by 0-based question index.
    pub fn answers(&self) -> &BTreeMap<usize, bool> {
        &self.answers
    }

    /// Number of questions answered at least once.
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Current 0-based question cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Captured signature data URI, present once Summary is reached.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Submit the Intake form.
    ///
    /// Fails with [`Error::Validation`] on an empty/whitespace-only name or
    /// a missing date, leaving the session in Intake. On success the
    /// session enters Questionnaire with the cursor at 0 and no answers.
    pub fn submit_personal(&mut self, full_name: &str, date: Option<NaiveDate>) -> Result<()> {
        self.expect_phase(Phase::Intake, "submit personal details")?;

        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(Error::Validation("Please enter your full name".to_string()));
        }
        let date =
            date.ok_or_else(|| Error::Validation("Please select a date".to_string()))?;

        self.patient = PatientRecord {
            full_name: full_name.to_string(),
            date: Some(date),
        };
        self.answers.clear();
        self.cursor = 0;
        self.phase = Phase::Questionnaire { signing: false };
        log::debug!("intake accepted for {:?}, {} questions", full_name, self.questions.len());
        Ok(())
    }

    /// Record an answer for a question index.
    ///
    /// Answers may be revised in any order; only the last value per index
    /// is kept. The cursor auto-advances only when the answered index is
    /// the current cursor position and not the last question.
    pub fn answer(&mut self, index: usize, value: bool) -> Result<()> {
        self.expect_answering("answer a question")?;
        if index >= self.questions.len() {
            return Err(Error::Validation(format!(
                "Question index {} out of range (0..{})",
                index,
                self.questions.len()
            )));
        }

        self.answers.insert(index, value);
        if index == self.cursor && self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
        }
        Ok(())
    }

    /// Advance the cursor, or enter the signing sub-state from the last
    /// question.
    pub fn next(&mut self) -> Result<()> {
        self.expect_answering("advance")?;
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
        } else {
            self.phase = Phase::Questionnaire { signing: true };
            log::debug!("entering signing step");
        }
        Ok(())
    }

    /// Step the cursor back; no-op at position 0.
    pub fn previous(&mut self) -> Result<()> {
        self.expect_answering("go back")?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(())
    }

    /// Whether the Finish action is currently enabled: cursor on the last
    /// question and that question answered.
    pub fn can_finish(&self) -> bool {
        matches!(self.phase, Phase::Questionnaire { signing: false })
            && !self.questions.is_empty()
            && self.cursor == self.questions.len() - 1
            && self.answers.contains_key(&self.cursor)
    }

    /// Move to the signing sub-state. Returns whether the transition
    /// happened; a disabled Finish is a no-op, not an error.
    pub fn finish(&mut self) -> bool {
        if self.can_finish() {
            self.phase = Phase::Questionnaire { signing: true };
            true
        } else {
            false
        }
    }

    /// Leave the signing sub-state back to the last cursor position. The
    /// capture surface keeps its strokes unless explicitly cleared.
    pub fn back_to_questions(&mut self) -> Result<()> {
        match self.phase {
            Phase::Questionnaire { signing: true } => {
                self.phase = Phase::Questionnaire { signing: false };
                Ok(())
            },
            _ => Err(Error::InvalidTransition {
                from: self.phase.name(),
                action: "return to the questions",
            }),
        }
    }

    /// Accept a completed signature and move to Summary, freezing the
    /// answer set.
    pub fn complete_signature(&mut self, signature: &str) -> Result<()> {
        match self.phase {
            Phase::Questionnaire { signing: true } => {},
            _ => {
                return Err(Error::InvalidTransition {
                    from: self.phase.name(),
                    action: "complete the signature",
                })
            },
        }
        if signature.trim().is_empty() {
            return Err(Error::EmptySignature);
        }
        self.signature = Some(signature.to_string());
        self.phase = Phase::Summary;
        log::debug!(
            "session complete: {}/{} answered",
            self.answers.len(),
            self.questions.len()
        );
        Ok(())
    }

    /// Reset everything back to a blank Intake. The question snapshot is
    /// retained.
    pub fn start_new(&mut self) {
        self.phase = Phase::Intake;
        self.patient = PatientRecord::default();
        self.answers.clear();
        self.cursor = 0;
        self.signature = None;
    }

    /// Progress through the question list as a percentage, based on the
    /// cursor position. Always within `[100/count, 100]` while answering.
    pub fn progress(&self) -> f32 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.cursor + 1) as f32 / self.questions.len() as f32 * 100.0
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.phase.name(),
                action,
            })
        }
    }

    fn expect_answering(&self, action: &'static str) -> Result<()> {
        self.expect_phase(Phase::Questionnaire { signing: false }, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_question_session() -> Session {
        let mut session = Session::new(vec!["Q1?".to_string(), "Q2?".to_string()]);
        session
            .submit_personal("Jane Doe", NaiveDate::from_ymd_opt(2024, 3, 1))
            .unwrap();
        session
    }

    #[test]
    fn test_submit_requires_name_and_date() {
        let mut session = Session::new(vec!["Q1?".to_string()]);
        assert!(matches!(
            session.submit_personal("   ", NaiveDate::from_ymd_opt(2024, 3, 1)),
            Err(Error::Validation(_))
        ));
        assert_eq!(session.phase(), Phase::Intake);

        assert!(matches!(
            session.submit_personal("Jane", None),
            Err(Error::Validation(_))
        ));
        assert_eq!(session.phase(), Phase::Intake);

        session
            .submit_personal("Jane", NaiveDate::from_ymd_opt(2024, 3, 1))
            .unwrap();
        assert_eq!(session.phase(), Phase::Questionnaire { signing: false });
        assert_eq!(session.cursor(), 0);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_answer_auto_advances_from_cursor_only() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        assert_eq!(session.cursor(), 1);

        // Revisiting an earlier question does not move the cursor.
        session.previous().unwrap();
        session.next().unwrap();
        session.answer(0, false).unwrap();
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.answers()[&0], false);
    }

    #[test]
    fn test_answer_is_idempotent_overwrite() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        session.answer(0, false).unwrap();
        session.answer(0, true).unwrap();
        assert_eq!(session.answers()[&0], true);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn test_answer_rejects_out_of_range_index() {
        let mut session = two_question_session();
        assert!(matches!(session.answer(2, true), Err(Error::Validation(_))));
    }

    #[test]
    fn test_finish_gated_on_last_answer() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        assert_eq!(session.cursor(), 1);

        // Q2 unanswered: finish is disabled.
        assert!(!session.can_finish());
        assert!(!session.finish());
        assert_eq!(session.phase(), Phase::Questionnaire { signing: false });

        session.answer(1, false).unwrap();
        assert!(session.finish());
        assert_eq!(session.phase(), Phase::Questionnaire { signing: true });
    }

    #[test]
    fn test_next_from_last_question_enters_signing() {
        let mut session = two_question_session();
        session.next().unwrap();
        session.next().unwrap();
        assert_eq!(session.phase(), Phase::Questionnaire { signing: true });
    }

    #[test]
    fn test_back_from_signing_keeps_cursor() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        session.answer(1, true).unwrap();
        assert!(session.finish());
        session.back_to_questions().unwrap();
        assert_eq!(session.phase(), Phase::Questionnaire { signing: false });
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn test_signature_must_not_be_blank() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        session.answer(1, true).unwrap();
        session.finish();
        assert!(matches!(session.complete_signature("  "), Err(Error::EmptySignature)));
        session.complete_signature("data:image/png;base64,AAAA").unwrap();
        assert_eq!(session.phase(), Phase::Summary);
        assert!(session.signature().is_some());
    }

    #[test]
    fn test_start_new_resets_everything() {
        let mut session = two_question_session();
        session.answer(0, true).unwrap();
        session.answer(1, true).unwrap();
        session.finish();
        session.complete_signature("data:image/png;base64,AAAA").unwrap();

        session.start_new();
        assert_eq!(session.phase(), Phase::Intake);
        assert_eq!(session.patient().full_name, "");
        assert!(session.patient().date.is_none());
        assert!(session.answers().is_empty());
        assert!(session.signature().is_none());
        assert_eq!(session.questions().len(), 2);
    }

    #[test]
    fn test_phase_mismatch_is_rejected() {
        let mut session = Session::new(vec!["Q1?".to_string()]);
        assert!(matches!(session.answer(0, true), Err(Error::InvalidTransition { .. })));
        assert!(matches!(session.next(), Err(Error::InvalidTransition { .. })));
        assert!(matches!(
            session.complete_signature("x"),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_progress_bounds() {
        let mut session = two_question_session();
        assert_eq!(session.progress(), 50.0);
        session.next().unwrap();
        assert_eq!(session.progress(), 100.0);
    }
}
