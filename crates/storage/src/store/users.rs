#![forbid(unsafe_code)]

use super::support::{next_id, split_list};
use super::{StoreError, Tracker};
use ct_core::identity::{self, normalize_email};
use ct_core::{User, UserId};

/// Read-side placeholder for cleared or dangling user references.
pub const UNASSIGNED: &str = "Unassigned";

impl Tracker {
    /// Resolve a free-text identity string to a stable user reference,
    /// creating the user on first sight. Lookup order: case-normalized
    /// email, then exact name. Blank input resolves to `None` and never
    /// creates a placeholder, so re-importing the same file is idempotent.
    pub fn resolve_identity(&mut self, raw: &str) -> Result<Option<UserId>, StoreError> {
        let Some(parsed) = identity::parse(raw) else {
            return Ok(None);
        };

        if let Some(email) = &parsed.email {
            let normalized = normalize_email(email);
            if let Some(user) = self
                .users
                .iter()
                .find(|u| u.email.as_deref().map(normalize_email) == Some(normalized.clone()))
            {
                return Ok(Some(user.id.clone()));
            }
        }

        if let Some(index) = self.users.iter().position(|u| u.name == parsed.name) {
            // A name-only record gains an email the first time one shows up.
            if self.users[index].email.is_none() && parsed.email.is_some() {
                self.users[index].email = parsed.email;
                self.persist_users()?;
            }
            return Ok(Some(self.users[index].id.clone()));
        }

        let id = UserId::new(next_id(&mut self.seqs.users, "usr"));
        self.users.push(User {
            id: id.clone(),
            name: parsed.name,
            email: parsed.email,
        });
        self.persist_users()?;
        Ok(Some(id))
    }

    /// Resolve a semicolon-joined list of identity strings, deduplicating
    /// repeated references while preserving first-seen order.
    pub fn resolve_identity_list(&mut self, raw: &str) -> Result<Vec<UserId>, StoreError> {
        let mut out = Vec::new();
        for entry in split_list(raw) {
            if let Some(id) = self.resolve_identity(&entry)?
                && !out.contains(&id)
            {
                out.push(id);
            }
        }
        Ok(out)
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Display name for a user reference; dangling or absent references read
    /// as the placeholder rather than erroring.
    pub fn user_display(&self, id: Option<&UserId>) -> String {
        id.and_then(|id| self.user(id))
            .map(|user| user.name.clone())
            .unwrap_or_else(|| UNASSIGNED.to_string())
    }

    /// CSV/interchange form: `"Name <email>"` when an email is known, the
    /// bare name otherwise, and an empty cell for absent or dangling
    /// references so re-import resolves back to "no user".
    pub fn user_export_string(&self, id: Option<&UserId>) -> String {
        let Some(user) = id.and_then(|id| self.user(id)) else {
            return String::new();
        };
        match &user.email {
            Some(email) => format!("{} <{}>", user.name, email),
            None => user.name.clone(),
        }
    }

    /// Email-preferring form used by the Jira-compatible Assignee column.
    pub fn user_email_or_name(&self, id: Option<&UserId>) -> String {
        let Some(user) = id.and_then(|id| self.user(id)) else {
            return String::new();
        };
        user.email.clone().unwrap_or_else(|| user.name.clone())
    }
}
