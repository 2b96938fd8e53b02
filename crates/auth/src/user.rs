//! User accounts: registration and credential checks.

use serde::{Deserialize, Serialize};

use garage_core::{DomainError, DomainResult, FieldSpec, FormInput, RecordId, ResourceDescriptor, validate};

// ─────────────────────────────────────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Descriptor for the `usuarios` table.
///
/// Accounts are not mounted as a CRUD resource; the descriptor only drives
/// form validation and the table schema. `login` uniqueness is added by the
/// storage layer.
pub static ACCOUNTS: ResourceDescriptor = ResourceDescriptor {
    slug: "usuarios",
    table: "usuarios",
    title: "Accounts",
    fields: &[
        FieldSpec::text("name", "Name"),
        FieldSpec::text("login", "Login"),
        FieldSpec::text("password", "Password"),
    ],
    counter: None,
};

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A registered account.
///
/// # Invariants
/// - `login` is unique across all users (enforced by the user store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub fn from_registration(id: RecordId, registration: Registration) -> Self {
        Self {
            id,
            name: registration.name,
            login: registration.login,
            password: registration.password,
        }
    }

    pub fn matches(&self, credentials: &Credentials) -> bool {
        self.login == credentials.login && self.password == credentials.password
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Forms
// ─────────────────────────────────────────────────────────────────────────────

/// Validated registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub login: String,
    pub password: String,
}

impl Registration {
    pub fn from_form(form: &FormInput) -> DomainResult<Self> {
        let fields = validate(&ACCOUNTS, form)?;
        Ok(Self {
            name: fields.require_text("name")?,
            login: fields.require_text("login")?,
            password: fields.require_text("password")?,
        })
    }
}

/// Validated login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    pub fn from_form(form: &FormInput) -> DomainResult<Self> {
        let login = required(form, "login")?;
        let password = required(form, "password")?;
        Ok(Self { login, password })
    }
}

fn required(form: &FormInput, name: &str) -> DomainResult<String> {
    form.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DomainError::validation(format!("fill in all fields (missing `{name}`)")))
}
