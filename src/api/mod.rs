pub(crate) mod auth;
pub(crate) mod dictionaries;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod kafedras;
pub(crate) mod pagination;
pub(crate) mod questions;
pub(crate) mod quiz_process;
pub(crate) mod quizzes;
pub(crate) mod results;
pub(crate) mod roles;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod user_answers;
pub(crate) mod users;
pub(crate) mod validation;
