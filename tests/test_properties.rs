//! Property tests for session and question list invariants.

use chrono::NaiveDate;
use medintake::questions::QuestionSet;
use medintake::session::Session;
use proptest::prelude::*;

fn answering_session(count: usize) -> Session {
    let questions = (0..count).map(|i| format!("Question {}?", i)).collect();
    let mut session = Session::new(questions);
    session
        .submit_personal("Jane Doe", NaiveDate::from_ymd_opt(2024, 1, 15))
        .unwrap();
    session
}

proptest! {
    #[test]
    fn prop_last_answer_wins(values in proptest::collection::vec(any::<bool>(), 1..20)) {
        let mut session = answering_session(3);
        for &v in &values {
            session.answer(1, v).unwrap();
        }
        prop_assert_eq!(session.answers()[&1], *values.last().unwrap());
        prop_assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn prop_progress_stays_in_bounds(
        count in 1usize..30,
        steps in proptest::collection::vec(any::<bool>(), 0..60),
    ) {
        let mut session = answering_session(count);
        for &forward in &steps {
            // Wander the cursor; ignore the signing transition at the end
            if forward {
                let _ = session.next();
            } else {
                let _ = session.previous();
            }
            let p = session.progress();
            prop_assert!(p >= 100.0 / count as f32 - 0.001);
            prop_assert!(p <= 100.0);
        }
    }

    #[test]
    fn prop_answers_never_exceed_questions(
        count in 1usize..15,
        indices in proptest::collection::vec((0usize..20, any::<bool>()), 0..40),
    ) {
        let mut session = answering_session(count);
        for &(i, v) in &indices {
            let _ = session.answer(i, v);
        }
        prop_assert!(session.answered_count() <= count);
        for index in session.answers().keys() {
            prop_assert!(*index < count);
        }
    }

    #[test]
    fn prop_orders_stay_dense_under_mutation(
        ops in proptest::collection::vec((0u8..4, 1u32..25), 0..40),
    ) {
        let mut set = QuestionSet::default_set();
        for &(op, id) in &ops {
            match op {
                0 => {
                    let _ = set.add(&format!("Extra question {}?", id));
                },
                1 => {
                    set.remove(id);
                },
                2 => {
                    set.move_up(id);
                },
                _ => {
                    set.move_down(id);
                },
            }
        }
        for (i, q) in set.questions().iter().enumerate() {
            prop_assert_eq!(q.order, i as u32 + 1);
        }
        // Ids stay unique
        let mut ids: Vec<u32> = set.questions().iter().map(|q| q.id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), set.len());
    }
}
