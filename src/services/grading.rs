//! Grading of a finished quiz attempt.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::core::metrics::QUIZ_COMPLETIONS;
use crate::db::models::{Question, QuizResult};
use crate::repositories::{self, results::CreateResult, user_answers::CreateUserAnswer};
use crate::services::identity::{self, Actor};
use crate::services::{visibility, ServiceError};

#[derive(Debug, Clone)]
pub(crate) struct SubmittedAnswer {
    pub(crate) question_id: i64,
    pub(crate) answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Score {
    pub(crate) correct: i32,
    pub(crate) wrong: i32,
    pub(crate) grade: i32,
}

/// Unanswered questions count as wrong, so the denominator is the larger of the quiz's
/// declared size and the number of answers actually sent.
pub(crate) fn score(question_number: i32, answered: usize, correct: usize) -> Score {
    let total = i64::from(question_number.max(0)).max(answered as i64);
    let correct = (correct as i64).min(total);
    let grade = if total == 0 { 0 } else { ((correct * 100) as f64 / total as f64).round() as i64 };
    Score { correct: correct as i32, wrong: (total - correct) as i32, grade: grade as i32 }
}

pub(crate) fn is_correct(answer: &str, question: &Question) -> bool {
    answer.trim() == question.correct_option().trim()
}

/// Stores the caller's answers for `quiz_id` and the resulting grade.
pub(crate) async fn complete(
    pool: &PgPool,
    actor: &Actor,
    quiz_id: i64,
    answers: &[SubmittedAnswer],
) -> Result<QuizResult, ServiceError> {
    let scope = visibility::resolve_scope(pool, actor).await?;
    let mut tx = pool.begin().await?;

    let quiz = repositories::quizzes::find_by_id(&mut *tx, quiz_id)
        .await?
        .filter(|quiz| scope.admits(quiz.group_id, quiz.subject_id))
        .ok_or(ServiceError::NotFound("Quiz not found"))?;
    if !quiz.is_active {
        return Err(ServiceError::Validation("Quiz is not active".to_string()));
    }

    let questions: HashMap<i64, Question> =
        repositories::questions::linked_to_quiz(&mut *tx, quiz.id)
            .await?
            .into_iter()
            .map(|question| (question.id, question))
            .collect();

    let mut seen = HashSet::with_capacity(answers.len());
    let mut correct = 0usize;
    for submitted in answers {
        if !seen.insert(submitted.question_id) {
            return Err(ServiceError::Validation(format!(
                "question {} answered more than once",
                submitted.question_id
            )));
        }
        let question = questions.get(&submitted.question_id).ok_or(
            ServiceError::InvalidReference("Answer references a question outside the quiz"),
        )?;
        let is_correct = is_correct(&submitted.answer, question);
        if is_correct {
            correct += 1;
        }
        repositories::user_answers::create(
            &mut *tx,
            CreateUserAnswer {
                user_id: actor.id(),
                quiz_id: quiz.id,
                question_id: question.id,
                answer: &submitted.answer,
                correct_answer: question.correct_option(),
                is_correct,
            },
        )
        .await?;
    }

    let score = score(quiz.question_number, answers.len(), correct);
    let group_id = identity::student_group(&mut *tx, actor.id()).await?.or(quiz.group_id);
    let result = repositories::results::create(
        &mut *tx,
        CreateResult {
            user_id: actor.id(),
            quiz_id: quiz.id,
            group_id,
            subject_id: quiz.subject_id,
            correct_answers: score.correct,
            wrong_answers: score.wrong,
            grade: score.grade,
        },
    )
    .await?;

    tx.commit().await?;

    metrics::counter!(QUIZ_COMPLETIONS).increment(1);
    tracing::info!(
        quiz_id = quiz.id,
        user_id = actor.id(),
        grade = score.grade,
        "Quiz completed"
    );
    Ok(result)
}
