use std::fmt;

/// Business validation failure: the command is refused and no event is
/// appended. Legitimate no-ops (unmarking a never-marked participant,
/// cancelling an unknown booking ID) are successes, not rejections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A booking named a participant that is not currently available on
    /// the slot.
    NotAllParticipantsAvailable,
    /// Book issued against a participant slot that is absent or
    /// unavailable.
    NotAvailable,
    /// Book issued against a participant slot that is already booked.
    AlreadyBooked,
    /// Cancel issued against a participant slot that is absent or
    /// unavailable.
    CancelUnavailable,
    /// Cancel issued against a participant slot that is available but
    /// not booked.
    CancelNotBooked,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotAllParticipantsAvailable => write!(
                f,
                "Not all of the requested participants are available for the training flight"
            ),
            Rejection::NotAvailable => write!(f, "Requested participant is not available"),
            Rejection::AlreadyBooked => {
                write!(f, "Requested participant is already booked for the given slot")
            }
            Rejection::CancelUnavailable => {
                write!(f, "Failed to cancel unavailable participant slot")
            }
            Rejection::CancelNotBooked => {
                write!(f, "Failed to cancel available but not booked participant slot")
            }
        }
    }
}

impl std::error::Error for Rejection {}
