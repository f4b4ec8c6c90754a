pub mod accounts;
pub mod directory;
pub mod interests;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDateTime;
    use vivah_shared::models::{PaymentStatus, User};

    pub fn member(id: i32, gender: &str) -> User {
        User {
            id,
            first_name: format!("Member{id}"),
            last_name: "Iyer".into(),
            phone: format!("98400000{id:02}"),
            email: None,
            age: Some(28),
            gender: gender.into(),
            password_hash: None,
            payment_status: PaymentStatus::Paid.to_string(),
            is_approved: true,
            membership_type: None,
            membership_expiry: None,
            interested_membership: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }
}
