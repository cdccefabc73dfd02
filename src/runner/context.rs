use chrono::{DateTime, Local};
use uuid::Uuid;

/// Password given to every generated test account
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Account registered and logged in by the suite
#[derive(Debug, Clone, PartialEq)]
pub struct TestUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl TestUser {
    /// Build a user from a short unique suffix
    pub fn with_suffix(suffix: &str) -> Self {
        Self {
            email: format!("testuser_{}@example.com", suffix),
            username: format!("testuser_{}", suffix),
            password: TEST_PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    /// Fresh user so repeated runs never collide on email or username
    pub fn generate() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self::with_suffix(&id[..8])
    }
}

/// Read-only information for one run of the suite
pub struct TestContext {
    /// Identifies this run in reports
    pub run_id: String,

    /// Server the suite talks to
    pub base_url: String,

    /// Account created by the registration step
    pub user: TestUser,

    pub started_at: DateTime<Local>,
}

impl TestContext {
    pub fn new(base_url: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            base_url: base_url.to_string(),
            user: TestUser::generate(),
            started_at: Local::now(),
        }
    }

    /// `HHMMSS` of the current wall-clock time, used to make titles unique
    pub fn time_tag(&self) -> String {
        Local::now().format("%H%M%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_suffix() {
        let user = TestUser::with_suffix("a1b2c3d4");
        assert_eq!(user.email, "testuser_a1b2c3d4@example.com");
        assert_eq!(user.username, "testuser_a1b2c3d4");
        assert_eq!(user.password, "TestPassword123!");
    }

    #[test]
    fn test_generated_users_differ() {
        let a = TestUser::generate();
        let b = TestUser::generate();
        assert_ne!(a.email, b.email);
        assert_eq!(a.username.len(), "testuser_".len() + 8);
    }

    #[test]
    fn test_time_tag_shape() {
        let context = TestContext::new("http://localhost:4000");
        let tag = context.time_tag();
        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_digit()));
    }
}
