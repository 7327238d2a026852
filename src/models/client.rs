#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Field-by-field update for a client row. A field left `None` keeps its
/// current value in the database.
#[derive(Debug, Default, Clone)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ClientPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, value: impl Into<String>) -> Self {
        self.first_name = Some(value.into());
        self
    }

    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_starts_empty() {
        assert!(ClientPatch::new().is_empty());
    }

    #[test]
    fn patch_records_only_the_fields_set() {
        let patch = ClientPatch::new().last_name("Ivanov");
        assert!(!patch.is_empty());
        assert_eq!(patch.last_name.as_deref(), Some("Ivanov"));
        assert!(patch.first_name.is_none());
        assert!(patch.email.is_none());
    }
}
