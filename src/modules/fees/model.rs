use chrono::{DateTime, NaiveDate, Utc};
use classhub_core::coerce::{lenient_date, lenient_i64};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::format::format_date;

/// Sortable columns for fee lists.
pub const FEE_SORT_FIELDS: &[&str] = &[
    "id",
    "amount",
    "due_date",
    "payment_date",
    "payment_status",
    "created_at",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

fn lenient_payment_status<'de, D>(deserializer: D) -> Result<Option<PaymentStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| match s.to_ascii_uppercase().as_str() {
        "PAID" => Some(PaymentStatus::Paid),
        "UNPAID" => Some(PaymentStatus::Unpaid),
        _ => None,
    }))
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct FeeRecord {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub fee_title: String,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail response with display-formatted dates.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeeDetails {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub section_id: Option<i32>,
    pub fee_title: String,
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<String>,
    pub due_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeeRecord> for FeeDetails {
    fn from(record: FeeRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            class_id: record.class_id,
            section_id: record.section_id,
            fee_title: record.fee_title,
            amount: record.amount,
            payment_status: record.payment_status,
            payment_date: record.payment_date.map(format_date),
            due_date: format_date(record.due_date),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeeListFilter {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub section_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_payment_status")]
    #[param(value_type = Option<String>)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "lenient_date")]
    #[param(value_type = Option<String>)]
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FeeDto {
    pub student_id: i32,
    pub class_id: i32,
    pub section_id: Option<i32>,
    #[validate(length(min = 1, message = "Fee title is required"))]
    pub fee_title: String,
    #[validate(range(min = 0.01, message = "Amount must be greater than zero"))]
    pub amount: f64,
    pub payment_status: PaymentStatus,
    pub payment_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_recognizes_payment_keys() {
        let filter: FeeListFilter = serde_urlencoded::from_str(
            "student_id=5&payment_status=paid&payment_date=2024-02-01&foo=bar",
        )
        .unwrap();
        assert_eq!(filter.student_id, Some(5));
        assert_eq!(filter.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(filter.payment_date, NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_unrecognized_payment_status_is_dropped() {
        let filter: FeeListFilter = serde_urlencoded::from_str("payment_status=overdue").unwrap();
        assert_eq!(filter.payment_status, None);
    }

    #[test]
    fn test_fee_dto_collects_violations() {
        let dto = FeeDto {
            student_id: 1,
            class_id: 1,
            section_id: None,
            fee_title: "".to_string(),
            amount: 0.0,
            payment_status: PaymentStatus::Unpaid,
            payment_date: None,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_details_format_dates() {
        let record = FeeRecord {
            id: 1,
            student_id: 2,
            class_id: 3,
            section_id: None,
            fee_title: "Tuition".to_string(),
            amount: 1500.0,
            payment_status: PaymentStatus::Paid,
            payment_date: NaiveDate::from_ymd_opt(2024, 2, 7),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let details = FeeDetails::from(record);
        assert_eq!(details.payment_date.as_deref(), Some("2024-02-07"));
        assert_eq!(details.due_date, "2024-02-01");
    }
}
