use chrono::{Months, NaiveDate};

use vivah_shared::errors::{AppError, AppResult};
use vivah_shared::models::MembershipPlan;

/// Expiry date for a plan bought on `start`; calendar months, clamped to month end.
pub fn expiry_for(plan: &MembershipPlan, start: NaiveDate) -> AppResult<NaiveDate> {
    let months = u32::try_from(plan.duration_months)
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| {
            AppError::bad_request(format!("plan '{}' has no valid duration", plan.name))
        })?;
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| AppError::bad_request("membership expiry out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn plan(months: i32) -> MembershipPlan {
        MembershipPlan {
            id: 1,
            name: "Silver".into(),
            price: 1999.0,
            duration_months: months,
            profile_views_limit: Some(50),
            features: "[]".into(),
            color: None,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn adds_calendar_months() {
        assert_eq!(expiry_for(&plan(3), date(2024, 1, 15)).unwrap(), date(2024, 4, 15));
        assert_eq!(expiry_for(&plan(12), date(2024, 2, 29)).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn month_end_is_clamped() {
        assert_eq!(expiry_for(&plan(1), date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn zero_or_negative_duration_is_rejected() {
        assert!(expiry_for(&plan(0), date(2024, 1, 1)).is_err());
        assert!(expiry_for(&plan(-2), date(2024, 1, 1)).is_err());
    }
}
