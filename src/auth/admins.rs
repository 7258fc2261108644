use std::collections::HashSet;

/// Email allow-list of users who bypass token accounting.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    emails: HashSet<String>,
}

impl AdminList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parses a comma-separated list, e.g. the `ADMIN_EMAILS` variable.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
