pub(crate) mod dictionaries;
pub(crate) mod health;
pub(crate) mod kafedras;
pub(crate) mod questions;
pub(crate) mod quiz_questions;
pub(crate) mod quizzes;
pub(crate) mod results;
pub(crate) mod roles;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod user_answers;
pub(crate) mod users;
