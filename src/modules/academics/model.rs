use classhub_core::coerce::lenient_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Sortable columns for the subjects list.
pub const SUBJECT_SORT_FIELDS: &[&str] = &["id", "name", "code"];

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: i32,
    pub class_name: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Section {
    pub id: i32,
    pub section_name: String,
    pub class_id: i32,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub class_id: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectionListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_filter_keys_are_dropped() {
        let filter: SubjectListFilter =
            serde_urlencoded::from_str("class_id=3&teacher_id=9&debug=true").unwrap();
        assert_eq!(filter.class_id, Some(3));
    }

    #[test]
    fn test_malformed_class_id_is_ignored() {
        let filter: SubjectListFilter = serde_urlencoded::from_str("class_id=three").unwrap();
        assert_eq!(filter.class_id, None);
    }
}
