//! Multi-step medical intake questionnaire.
//!
//! Walks a patient through identity intake, a configurable yes/no question
//! list, and freehand signature capture, then produces a paginated PDF
//! report and a `mailto:` hand-off of the results. The question list is
//! editable through a password-gated admin surface and persists as JSON.
//!
//! # Example
//!
//! ```
//! use medintake::questions::QuestionSet;
//! use medintake::session::{Phase, Session};
//!
//! let questions = QuestionSet::default_set();
//! let mut session = Session::new(questions.texts());
//! session.submit_personal(
//!     "Jane Doe",
//!     chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
//! )?;
//! session.answer(0, true)?;
//! assert_eq!(session.phase(), Phase::Questionnaire { signing: false });
//! # Ok::<(), medintake::Error>(())
//! ```

// Core domain
pub mod questions;
pub mod session;
pub mod signature;
pub mod storage;

// Admin surface
pub mod admin;

// Report generation
pub mod bidi;
pub mod geometry;
pub mod report;
pub mod writer;

// Outbound hand-off
pub mod email;

pub mod error;

pub use error::{Error, Result};
pub use questions::{Question, QuestionSet, DEFAULT_QUESTIONS};
pub use report::{IntakeReport, ReportRenderer};
pub use session::{PatientRecord, Phase, Session};
pub use signature::SignaturePad;
pub use storage::{JsonQuestionStore, MemoryQuestionStore, QuestionRepository};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
