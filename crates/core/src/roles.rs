//! Well-known role name constants.
//!
//! These match the `role` claim issued by the platform auth service.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ALUMNI: &str = "alumni";
pub const ROLE_STUDENT: &str = "student";

/// Whether the role may administer mentoring programs and matching rounds.
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STAFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_staff_are_staff() {
        assert!(is_staff(ROLE_ADMIN));
        assert!(is_staff(ROLE_STAFF));
    }

    #[test]
    fn members_are_not_staff() {
        assert!(!is_staff(ROLE_ALUMNI));
        assert!(!is_staff(ROLE_STUDENT));
        assert!(!is_staff(""));
    }
}
