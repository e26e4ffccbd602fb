use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) hashed_password: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Role {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Shared shape of the name-only dictionaries (groups, subjects, faculties, permissions).
#[derive(Debug, Clone, FromRow)]
pub(crate) struct NamedEntity {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Kafedra {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) faculty_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Teacher {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) third_name: String,
    pub(crate) full_name: String,
    pub(crate) kafedra_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Student {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) third_name: String,
    pub(crate) full_name: String,
    pub(crate) student_id_number: Option<String>,
    pub(crate) group_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) subject_id: i64,
    pub(crate) text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) image_url: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Question {
    /// The first option is the stored answer key; clients shuffle the options.
    pub(crate) fn correct_option(&self) -> &str {
        &self.option_a
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) question_number: i32,
    pub(crate) duration: i32,
    pub(crate) pin: String,
    pub(crate) is_active: bool,
    pub(crate) attempt: i32,
    pub(crate) user_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct QuizResult {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
