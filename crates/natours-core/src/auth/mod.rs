//! Authentication and authorization flows.
//!
//! Each operation is a short linear pipeline that stops at the first failed
//! check. No state survives between calls: the credential record's password
//! timestamps and reset digest are the only state, which is what lets a
//! password change retire every earlier token without a revocation list.

mod inputs;
mod policy;
mod service;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use inputs::provided;
pub use inputs::{PasswordReset, PasswordUpdate, ProfileUpdate, SignIn, SignUp};
pub use policy::AuthPolicy;
pub use service::{authorize, AuthService, ResetRequested};

/// Mask an email for logging: `jane@example.com` -> `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}
