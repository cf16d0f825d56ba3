//! Role levels and the checks the console gates actions on.

/// Numeric permission levels; higher includes lower.
pub mod levels {
    pub const SUPER_ADMIN: u8 = 50;
    pub const ADMIN: u8 = 40;
    pub const VOLUNTEER_2: u8 = 30;
    pub const VOLUNTEER_1: u8 = 20;
    pub const TEEN_VOLUNTEER: u8 = 10;
    pub const NONE: u8 = 0;
}

/// Map a role name from the user record to its level.
pub fn level_for_role(role: &str) -> u8 {
    match role {
        "super_admin" => levels::SUPER_ADMIN,
        "admin" => levels::ADMIN,
        "Tier 2" => levels::VOLUNTEER_2,
        "Tier 1" | "volunteer" => levels::VOLUNTEER_1,
        "Teen" => levels::TEEN_VOLUNTEER,
        _ => levels::NONE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub level: u8,
}

impl Permissions {
    pub fn for_role(role: &str) -> Self {
        Self {
            level: level_for_role(role),
        }
    }

    pub fn can(&self, required: u8) -> bool {
        self.level >= required
    }

    /// Super admins edit anyone; admins edit only users below admin; nobody else edits.
    pub fn can_edit_level(&self, target: u8) -> bool {
        if self.level >= levels::SUPER_ADMIN {
            return true;
        }
        if self.level >= levels::ADMIN {
            return target < levels::ADMIN;
        }
        false
    }

    pub fn can_edit_role(&self, target_role: &str) -> bool {
        self.can_edit_level(level_for_role(target_role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        assert_eq!(level_for_role("admin"), levels::ADMIN);
        assert_eq!(level_for_role("volunteer"), levels::VOLUNTEER_1);
        assert_eq!(level_for_role("Teen"), levels::TEEN_VOLUNTEER);
        assert_eq!(level_for_role("janitor"), levels::NONE);
    }

    #[test]
    fn test_admin_cannot_edit_peers() {
        let admin = Permissions::for_role("admin");
        assert!(admin.can(levels::VOLUNTEER_2));
        assert!(admin.can_edit_role("Tier 2"));
        assert!(!admin.can_edit_role("admin"));
        assert!(!admin.can_edit_role("super_admin"));
    }

    #[test]
    fn test_super_admin_and_volunteers() {
        assert!(Permissions::for_role("super_admin").can_edit_role("super_admin"));
        let volunteer = Permissions::for_role("Tier 1");
        assert!(!volunteer.can(levels::ADMIN));
        assert!(!volunteer.can_edit_role("Teen"));
    }
}
