//! The ordered question list and its invariants.
//!
//! A [`QuestionSet`] is the single source of truth for question text and
//! ordering. `order` values are dense, 1-based, and always equal to the
//! question's position; every mutation re-normalizes them.

use serde::{Deserialize, Serialize};

/// A single yes/no question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within the set
    pub id: u32,
    /// Question text shown to the patient
    pub text: String,
    /// 1-based position; dense and contiguous
    pub order: u32,
}

/// The built-in question list used when no persisted set exists.
pub const DEFAULT_QUESTIONS: [&str; 20] = [
    "Do you have any allergies to medications?",
    "Are you currently taking any prescription medications?",
    "Do you have a history of heart disease?",
    "Have you ever had high blood pressure?",
    "Do you have diabetes or a family history of diabetes?",
    "Have you ever been diagnosed with cancer?",
    "Do you smoke or have you smoked in the past?",
    "Do you consume alcohol regularly?",
    "Have you had any surgeries in the past 5 years?",
    "Do you have any chronic pain conditions?",
    "Are you currently experiencing any symptoms?",
    "Do you have a history of mental health conditions?",
    "Have you ever had kidney or liver problems?",
    "Do you have any breathing difficulties or asthma?",
    "Are you pregnant or planning to become pregnant?",
    "Do you have any vision or hearing problems?",
    "Have you ever had blood clots or circulation issues?",
    "Do you have any skin conditions or rashes?",
    "Are you up to date with your vaccinations?",
    "Do you exercise regularly or maintain an active lifestyle?",
];

/// Ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the default 20-question set.
    pub fn default_set() -> Self {
        let questions = DEFAULT_QUESTIONS
            .iter()
            .enumerate()
            .map(|(i, text)| Question {
                id: i as u32 + 1,
                text: (*text).to_string(),
                order: i as u32 + 1,
            })
            .collect();
        Self { questions }
    }

    /// Build a set from raw questions, sorting by `order` and re-normalizing.
    ///
    /// Used when loading persisted data whose orders may have gaps.
    pub fn from_questions(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.order);
        let mut set = Self { questions };
        set.renormalize();
        set
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions in order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Ordered question texts, as snapshotted at session start.
    pub fn texts(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.text.clone()).collect()
    }

    /// Find a question by id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Append a new question. Returns the assigned id, or `None` for
    /// blank/whitespace-only text.
    pub fn add(&mut self, text: &str) -> Option<u32> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.questions.iter().map(|q| q.id).max().unwrap_or(0) + 1;
        self.questions.push(Question {
            id,
            text: text.to_string(),
            order: self.questions.len() as u32 + 1,
        });
        Some(id)
    }

    /// Replace the text of an existing question. Returns false for an
    /// unknown id.
    pub fn update_text(&mut self, id: u32, text: &str) -> bool {
        match self.questions.iter_mut().find(|q| q.id == id) {
            Some(q) => {
                q.text = text.trim().to_string();
                true
            },
            None => false,
        }
    }

    /// Delete a question by id, re-normalizing the remaining orders.
    /// Returns false for an unknown id.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != id);
        if self.questions.len() == before {
            return false;
        }
        self.renormalize();
        true
    }

    /// Move a question one position toward the front. No-op at position 0
    /// or for an unknown id.
    pub fn move_up(&mut self, id: u32) -> bool {
        match self.questions.iter().position(|q| q.id == id) {
            Some(i) if i > 0 => {
                self.questions.swap(i, i - 1);
                self.renormalize();
                true
            },
            _ => false,
        }
    }

    /// Move a question one position toward the back. No-op at the last
    /// position or for an unknown id.
    pub fn move_down(&mut self, id: u32) -> bool {
        match self.questions.iter().position(|q| q.id == id) {
            Some(i) if i + 1 < self.questions.len() => {
                self.questions.swap(i, i + 1);
                self.renormalize();
                true
            },
            _ => false,
        }
    }

    /// Rewrite all `order` values to match 1-based position.
    fn renormalize(&mut self) {
        for (i, q) in self.questions.iter_mut().enumerate() {
            q.order = i as u32 + 1;
        }
    }
}
