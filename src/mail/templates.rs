use url::Url;

use super::{MailError, OutgoingMail};

pub const VERIFICATION_SUBJECT: &str = "Verify your email";
pub const PASSWORD_RESET_SUBJECT: &str = "Your new password";

/// Absolute link to the verification endpoint for `token`
pub fn verification_link(public_url: &str, token: i32) -> Result<Url, MailError> {
    let mut base = Url::parse(public_url)
        .map_err(|e| MailError::Build(format!("invalid public url '{}': {}", public_url, e)))?;

    // Url::join replaces the last path segment unless the base ends in '/'
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&format!("users/verify/{}", token))
        .map_err(|e| MailError::Build(e.to_string()))
}

pub fn verification_mail(from: &str, to: &str, link: &Url) -> OutgoingMail {
    OutgoingMail {
        subject: VERIFICATION_SUBJECT.to_string(),
        body: format!(
            "Thanks for registering.\n\
             \n\
             Follow this link to confirm your email address:\n\
             {}\n",
            link
        ),
        from: from.to_string(),
        to: vec![to.to_string()],
    }
}

pub fn password_reset_mail(from: &str, to: &str, password: &str) -> OutgoingMail {
    OutgoingMail {
        subject: PASSWORD_RESET_SUBJECT.to_string(),
        body: format!(
            "A password reset was requested for your account.\n\
             \n\
             Your new password: {}\n",
            password
        ),
        from: from.to_string(),
        to: vec![to.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_absolute() {
        let link = verification_link("http://localhost:3000", 1234).unwrap();
        assert_eq!(link.as_str(), "http://localhost:3000/users/verify/1234");
    }

    #[test]
    fn link_keeps_base_path() {
        let link = verification_link("https://example.com/accounts", 99).unwrap();
        assert_eq!(link.as_str(), "https://example.com/accounts/users/verify/99");

        let link = verification_link("https://example.com/accounts/", 99).unwrap();
        assert_eq!(link.as_str(), "https://example.com/accounts/users/verify/99");
    }

    #[test]
    fn link_rejects_relative_base() {
        assert!(verification_link("/users", 1).is_err());
    }

    #[test]
    fn reset_mail_contains_password() {
        let mail = password_reset_mail("noreply@example.com", "a@example.com", "abcDEF234567");
        assert_eq!(mail.subject, PASSWORD_RESET_SUBJECT);
        assert_eq!(mail.to, vec!["a@example.com".to_string()]);
        assert!(mail.body.contains("abcDEF234567"));
    }
}
