//! Teacher and student profiles.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Student, Teacher};
use crate::schemas::dictionary::NamedEntityResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherCreate {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub(crate) first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) third_name: String,
    #[serde(default)]
    pub(crate) kafedra_id: Option<i64>,
    pub(crate) user_id: i64,
}

/// Renames a teacher. An omitted `kafedra_id` leaves the kafedra unchanged.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherUpdate {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub(crate) first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) third_name: String,
    #[serde(default)]
    pub(crate) kafedra_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignGroupsRequest {
    /// Teacher account id; group links hang off the account.
    pub(crate) user_id: i64,
    #[serde(default)]
    pub(crate) group_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignSubjectsRequest {
    /// Teacher profile id; subject links hang off the profile.
    pub(crate) teacher_id: i64,
    #[serde(default)]
    pub(crate) subject_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupAssignmentResponse {
    pub(crate) user_id: i64,
    pub(crate) group_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectAssignmentResponse {
    pub(crate) teacher_id: i64,
    pub(crate) subject_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListTeachersQuery {
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) kafedra_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) third_name: String,
    pub(crate) full_name: String,
    pub(crate) kafedra_id: Option<i64>,
    pub(crate) created_at: String,
}

impl TeacherResponse {
    pub(crate) fn from_db(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            user_id: teacher.user_id,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            third_name: teacher.third_name,
            full_name: teacher.full_name,
            kafedra_id: teacher.kafedra_id,
            created_at: format_primitive(teacher.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherDetailResponse {
    #[serde(flatten)]
    pub(crate) teacher: TeacherResponse,
    pub(crate) groups: Vec<NamedEntityResponse>,
    pub(crate) subjects: Vec<NamedEntityResponse>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub(crate) first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) third_name: String,
    #[serde(default)]
    pub(crate) student_id_number: Option<String>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    pub(crate) user_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentGroupUpdate {
    pub(crate) group_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListStudentsQuery {
    #[serde(default)]
    pub(crate) full_name: Option<String>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) third_name: String,
    pub(crate) full_name: String,
    pub(crate) student_id_number: Option<String>,
    pub(crate) group_id: Option<i64>,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            user_id: student.user_id,
            first_name: student.first_name,
            last_name: student.last_name,
            third_name: student.third_name,
            full_name: student.full_name,
            student_id_number: student.student_id_number,
            group_id: student.group_id,
            created_at: format_primitive(student.created_at),
        }
    }
}
