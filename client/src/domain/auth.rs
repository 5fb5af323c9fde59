//! Authentication inputs: sign-in credentials and sign-up requests.
//!
//! Constructors validate raw form input before any port is called, so a
//! missing field never reaches the network.

use std::fmt;

use zeroize::Zeroizing;

/// Local validation failures for authentication forms.
///
/// `Display` yields the prompt shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Sign-in without an email or password.
    MissingSignInFields,
    /// Sign-up without a username. Reported ahead of any other missing field.
    MissingUsername,
    /// Sign-up without an email or password.
    MissingSignUpFields,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSignInFields => {
                write!(f, "Please enter your email and password to sign in.")
            }
            Self::MissingUsername => write!(f, "Please choose username"),
            Self::MissingSignUpFields => {
                write!(f, "Please enter email, username, and password to sign up.")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use landslide_client::domain::SignInCredentials;
///
/// let creds = SignInCredentials::try_from_parts(" ada@example.com ", "pw").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized_email = email.trim();
        if normalized_email.is_empty() || password.is_empty() {
            return Err(AuthValidationError::MissingSignInFields);
        }
        Ok(Self {
            email: normalized_email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address identifying the account.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration request.
///
/// ## Invariants
/// - `username` and `email` are trimmed and non-empty.
/// - `password` is non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    username: String,
    credentials: SignInCredentials,
}

impl SignUpRequest {
    /// Construct a registration request from raw form inputs.
    ///
    /// A missing username is reported first, even when the other fields
    /// are missing too.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(AuthValidationError::MissingUsername);
        }
        let credentials = SignInCredentials::try_from_parts(email, password)
            .map_err(|_| AuthValidationError::MissingSignUpFields)?;
        Ok(Self {
            username: normalized.to_owned(),
            credentials,
        })
    }

    /// Requested username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Email address for the new account.
    pub fn email(&self) -> &str {
        self.credentials.email()
    }

    /// Password for the new account.
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Credentials used for the automatic sign-in after registration.
    pub fn credentials(&self) -> &SignInCredentials {
        &self.credentials
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("username", &self.username)
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("   ", "pw")]
    #[case("ada@example.com", "")]
    fn sign_in_requires_both_fields(#[case] email: &str, #[case] password: &str) {
        let err = SignInCredentials::try_from_parts(email, password).expect_err("must fail");
        assert_eq!(err, AuthValidationError::MissingSignInFields);
        assert_eq!(
            err.to_string(),
            "Please enter your email and password to sign in."
        );
    }

    #[rstest]
    #[case("", "ada@example.com", "pw")]
    #[case("", "", "")]
    #[case("  ", "", "pw")]
    fn missing_username_wins_over_other_missing_fields(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let err = SignUpRequest::try_from_parts(username, email, password).expect_err("must fail");
        assert_eq!(err, AuthValidationError::MissingUsername);
        assert_eq!(err.to_string(), "Please choose username");
    }

    #[rstest]
    #[case("ada", "", "pw")]
    #[case("ada", "ada@example.com", "")]
    fn sign_up_reports_generic_prompt_once_username_is_present(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let err = SignUpRequest::try_from_parts(username, email, password).expect_err("must fail");
        assert_eq!(err, AuthValidationError::MissingSignUpFields);
    }

    #[test]
    fn passwords_keep_whitespace_and_stay_out_of_debug() {
        let request =
            SignUpRequest::try_from_parts(" ada ", "ada@example.com", " secret ").expect("valid");
        assert_eq!(request.username(), "ada");
        assert_eq!(request.password(), " secret ");
        assert!(!format!("{request:?}").contains("secret"));
    }
}
