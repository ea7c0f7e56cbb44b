//! Role names carried in identity tokens.

/// Staff with catalog maintenance rights; skips onboarding.
pub const ROLE_ADMIN: &str = "admin";

/// Regular app user.
pub const ROLE_USER: &str = "user";
