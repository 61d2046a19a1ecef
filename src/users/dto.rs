use serde::Deserialize;

/// Signup form body. Missing fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl SignupForm {
    /// Trims username/email and lower-cases email. `None` if any field ends up empty.
    pub fn normalized(self) -> Option<SignupForm> {
        let form = SignupForm {
            username: self.username.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
        };
        if form.username.is_empty() || form.email.is_empty() || form.password.is_empty() {
            return None;
        }
        Some(form)
    }
}

impl LoginForm {
    pub fn normalized(self) -> Option<LoginForm> {
        let form = LoginForm {
            email: normalize_email(&self.email),
            password: self.password,
        };
        if form.email.is_empty() || form.password.is_empty() {
            return None;
        }
        Some(form)
    }
}
