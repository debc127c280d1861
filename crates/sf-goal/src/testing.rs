// testing.rs - Scripted goal source shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sf_api::{classify, ApiError, FailureSignal, GoalInput, GoalRecord, ServiceError};

use crate::source::GoalSource;

pub(crate) fn goal() -> GoalRecord {
    GoalRecord {
        id: None,
        gender: "f".into(),
        age: 30,
        height_cm: 165.0,
        weight_kg: 60.0,
        deficit_target: 500,
        calorie_target: 1800.0,
        protein_target: 120.0,
    }
}

pub(crate) fn input() -> GoalInput {
    GoalInput {
        gender: "f".into(),
        age: 30,
        height_cm: 165.0,
        weight_kg: 60.0,
        deficit_target: 500,
    }
}

pub(crate) fn network_failure() -> ApiError {
    classify(FailureSignal::Transport("connection refused".into()))
}

/// Answers every fetch with the same scripted result after a fixed delay.
/// Submissions echo [`goal`] unless told to fail.
pub(crate) struct ScriptedSource {
    answer: Mutex<Result<Option<GoalRecord>, ApiError>>,
    delay: Duration,
    reject_submissions: bool,
    fetches: AtomicUsize,
    submissions: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn answering(goal: Option<GoalRecord>) -> Self {
        Self::with_answer(Ok(goal))
    }

    pub(crate) fn failing(error: ApiError) -> Self {
        Self::with_answer(Err(error))
    }

    fn with_answer(answer: Result<Option<GoalRecord>, ApiError>) -> Self {
        Self {
            answer: Mutex::new(answer),
            delay: Duration::ZERO,
            reject_submissions: false,
            fetches: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
        }
    }

    pub(crate) fn delayed(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub(crate) fn rejecting_submissions(mut self) -> Self {
        self.reject_submissions = true;
        self
    }

    pub(crate) fn set_answer(&self, answer: Result<Option<GoalRecord>, ApiError>) {
        *self.answer.lock().unwrap() = answer;
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GoalSource for ScriptedSource {
    async fn fetch_goal(&self) -> Result<Option<GoalRecord>, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.lock().unwrap().clone()
    }

    async fn submit_goal(&self, _input: &GoalInput) -> Result<GoalRecord, ServiceError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if self.reject_submissions {
            return Err(classify(FailureSignal::Status {
                status: 500,
                url: "http://localhost:8000/api/goals".into(),
            })
            .into());
        }
        Ok(goal())
    }
}
