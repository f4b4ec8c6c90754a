use vivah_shared::errors::{AppError, AppResult, ErrorCode};
use vivah_shared::models::{Interest, InterestStatus, UserWithProfile};

use crate::services::directory::check_visible;

pub fn check_not_self(sender_id: i32, receiver_id: i32) -> AppResult<()> {
    if sender_id == receiver_id {
        return Err(AppError::new(
            ErrorCode::CannotSendInterestToSelf,
            "cannot send interest to yourself",
        ));
    }
    Ok(())
}

/// Interests only flow between members who can see each other.
pub fn check_receiver(sender: &UserWithProfile, receiver: &UserWithProfile) -> AppResult<()> {
    check_not_self(sender.user.id, receiver.user.id)?;
    check_visible(sender, receiver)
}

/// Only the receiver answers, and only once.
pub fn check_response(interest: &Interest, caller_id: i32) -> AppResult<()> {
    if interest.receiver_id != caller_id {
        return Err(AppError::new(
            ErrorCode::NotInterestReceiver,
            "only the receiver can respond to an interest",
        ));
    }
    if !interest.is_pending() {
        return Err(AppError::new(
            ErrorCode::InterestAlreadyResponded,
            format!("interest already {}", interest.status),
        ));
    }
    Ok(())
}

/// Rows touched by the guarded status update. Zero means another response
/// got there first.
pub fn check_claimed(rows: usize) -> AppResult<()> {
    if rows == 0 {
        return Err(AppError::new(
            ErrorCode::InterestAlreadyResponded,
            "interest already answered",
        ));
    }
    Ok(())
}

pub fn parse_decision(raw: &str) -> AppResult<InterestStatus> {
    match raw.parse::<InterestStatus>() {
        Ok(status @ (InterestStatus::Accepted | InterestStatus::Rejected)) => Ok(status),
        _ => Err(AppError::Validation(format!(
            "response must be 'accepted' or 'rejected', got '{raw}'"
        ))),
    }
}
