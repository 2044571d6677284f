//! Request payloads of the auth flows. Fields are optional so that a missing
//! field yields a precise validation message instead of a decode failure.

#[derive(Debug, Clone, Default)]
pub struct SignUp {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignIn {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordReset {
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordUpdate {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
    pub new_password_confirm: Option<String>,
}

/// Self-service profile change. Password fields are only present so they can
/// be rejected.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// Present and not blank.
pub(crate) fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
