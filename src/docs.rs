use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use classhub_core::pagination::PaginationMeta;

use crate::modules::academics::model::{Class, Section, Subject};
use crate::modules::attendance::model::{
    AttendanceMark, AttendanceStatus, CalendarEvent, CreateAttendanceDto, RosterEntry,
};
use crate::modules::exam_results::controller::ExamResultsResponse;
use crate::modules::exam_results::model::{
    ExamOption, ExamResultDetails, ExamResultDto, ExamResultEntry, ExamResultsData, PublishDto,
    PublishEntry, PublishStatus, ResultEntrySheet, StudentOption, SubjectForResult,
};
use crate::modules::exams::model::{Exam, ExamDetails, ExamDto, ExamRoutine, ExamRoutineDto, ExamStatus};
use crate::modules::fees::model::{FeeDetails, FeeDto, FeeRecord, PaymentStatus};
use crate::modules::homework::model::{
    Assignment, AssignmentDetails, AssignmentDto, AssignmentStatus, StudentHomework,
    SubmissionDetails, SubmittedHomework,
};
use crate::modules::students::model::{Student, StudentDetails, StudentDto};
use crate::modules::teachers::model::{Teacher, TeacherDetails, TeacherDto};
use crate::utils::errors::FieldError;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::academics::controller::get_classes,
        crate::modules::academics::controller::get_sections,
        crate::modules::academics::controller::get_subjects,
        crate::modules::attendance::controller::get_attendance_roster,
        crate::modules::attendance::controller::get_teacher_attendance,
        crate::modules::attendance::controller::record_attendance,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::exam_results::controller::get_entry_sheet,
        crate::modules::exam_results::controller::get_exam_results,
        crate::modules::exam_results::controller::get_exam_result,
        crate::modules::exam_results::controller::create_exam_result,
        crate::modules::exam_results::controller::update_exam_result,
        crate::modules::exam_results::controller::get_publishing,
        crate::modules::exam_results::controller::publish_exam_result,
        crate::modules::homework::controller::get_assignments,
        crate::modules::homework::controller::get_assignment,
        crate::modules::homework::controller::create_assignment,
        crate::modules::homework::controller::update_assignment,
        crate::modules::homework::controller::delete_assignment,
        crate::modules::homework::controller::get_student_homeworks,
        crate::modules::homework::controller::get_submitted_homeworks,
        crate::modules::homework::controller::get_submitted_homework_details,
        crate::modules::homework::controller::upload_attachment,
        crate::modules::fees::controller::get_fees,
        crate::modules::fees::controller::get_fee,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::update_fee,
        crate::modules::fees::controller::delete_fee,
    ),
    components(
        schemas(
            Teacher,
            TeacherDetails,
            TeacherDto,
            Student,
            StudentDetails,
            StudentDto,
            Class,
            Section,
            Subject,
            AttendanceStatus,
            AttendanceMark,
            RosterEntry,
            CalendarEvent,
            CreateAttendanceDto,
            Exam,
            ExamDetails,
            ExamDto,
            ExamRoutine,
            ExamRoutineDto,
            ExamStatus,
            ExamOption,
            StudentOption,
            SubjectForResult,
            ResultEntrySheet,
            ExamResultEntry,
            ExamResultsData,
            ExamResultsResponse,
            ExamResultDetails,
            ExamResultDto,
            PublishDto,
            PublishEntry,
            PublishStatus,
            Assignment,
            AssignmentDetails,
            AssignmentDto,
            AssignmentStatus,
            StudentHomework,
            SubmittedHomework,
            SubmissionDetails,
            FeeRecord,
            FeeDetails,
            FeeDto,
            PaymentStatus,
            PaginationMeta,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Teachers", description = "Teacher management endpoints"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Academics", description = "Classes, sections, and subjects"),
        (name = "Attendance", description = "Teacher attendance endpoints"),
        (name = "Exams", description = "Exam management endpoints"),
        (name = "Exam Results", description = "Exam result entry and publishing"),
        (name = "Homework", description = "Assignment management endpoints"),
        (name = "Fees", description = "Student fee endpoints")
    ),
    info(
        title = "Classhub API",
        version = "0.1.0",
        description = "School management REST API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
