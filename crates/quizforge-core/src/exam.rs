//! Exam attempts and the optional countdown.
//!
//! One [`ExamSession`] owns the answer state of one attempt. Submission is
//! idempotent, so a manual submit and a timer expiry racing each other still
//! grade the attempt exactly once.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::evaluator;
use crate::model::{AnswerState, Question, Quiz, QuizResult};

/// State of a single attempt.
pub struct ExamSession<'a> {
    quiz: &'a Quiz,
    answers: AnswerState,
    current: usize,
    submitted: bool,
}

impl<'a> ExamSession<'a> {
    pub fn new(quiz: &'a Quiz) -> Self {
        Self {
            quiz,
            answers: AnswerState::new(),
            current: 0,
            submitted: false,
        }
    }

    pub fn quiz(&self) -> &'a Quiz {
        self.quiz
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &'a Question {
        &self.quiz.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.quiz.questions.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Toggle an option of the current question.
    ///
    /// Returns `false` (and changes nothing) after submission or when the
    /// option does not exist.
    pub fn toggle(&mut self, option: usize) -> bool {
        let question = self.current_question();
        if self.submitted || option >= question.options.len() {
            return false;
        }
        self.answers
            .toggle(self.current, option, question.question_type);
        true
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn go_to(&mut self, question: usize) -> bool {
        if question >= self.quiz.questions.len() {
            return false;
        }
        self.current = question;
        true
    }

    /// Grade the attempt. Only the first call returns a result.
    pub fn submit(&mut self) -> Option<QuizResult> {
        if self.submitted {
            return None;
        }
        self.submitted = true;
        Some(evaluator::grade(self.quiz, self.answers.clone()))
    }
}

/// Something the countdown reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; `remaining_secs` is still above zero.
    Tick { remaining_secs: u64 },
    /// Time is up. Sent once, after which no further events arrive.
    Expired,
}

/// A one-second countdown running on the tokio runtime.
///
/// The ticking task is aborted on [`Countdown::cancel`] and on drop.
pub struct Countdown {
    handle: JoinHandle<()>,
    events: mpsc::Receiver<CountdownEvent>,
    total_secs: u64,
}

impl Countdown {
    /// Start counting down from `total` (whole seconds).
    pub fn start(total: Duration) -> Self {
        let total_secs = total.as_secs();
        let (tx, events) = mpsc::channel(8);

        let handle = tokio::spawn(async move {
            if total_secs == 0 {
                let _ = tx.send(CountdownEvent::Expired).await;
                return;
            }
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately
            interval.tick().await;

            let mut remaining = total_secs;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                let event = if remaining == 0 {
                    CountdownEvent::Expired
                } else {
                    CountdownEvent::Tick {
                        remaining_secs: remaining,
                    }
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        });

        Self {
            handle,
            events,
            total_secs,
        }
    }

    /// The countdown configured for a quiz, if its timer is enabled.
    pub fn for_quiz(quiz: &Quiz) -> Option<Self> {
        match quiz.settings.timer_minutes {
            0 => None,
            minutes => Some(Self::start(Duration::from_secs(u64::from(minutes) * 60))),
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Wait for the next event; `None` once expired or cancelled.
    pub async fn next_event(&mut self) -> Option<CountdownEvent> {
        self.events.recv().await
    }

    /// Stop ticking and discard undelivered events.
    pub fn cancel(&mut self) {
        self.handle.abort();
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
