pub mod academics;
pub mod attendance;
pub mod exam_results;
pub mod exams;
pub mod fees;
pub mod homework;
pub mod students;
pub mod teachers;
