/// Column a client search filters on, qualified for the client/phone join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchColumn {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl SearchColumn {
    pub fn qualified(self) -> &'static str {
        match self {
            Self::FirstName => "c.first_name",
            Self::LastName => "c.last_name",
            Self::Email => "c.email",
            Self::Phone => "cp.phone_number",
        }
    }
}

/// Single-criterion client lookup.
///
/// When several fields are set, the first one in the fixed order first name,
/// last name, email, phone is used and the rest are ignored. Existing callers
/// depend on this precedence.
#[derive(Debug, Default, Clone)]
pub struct SearchFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl SearchFilter {
    pub fn by_first_name(value: impl Into<String>) -> Self {
        Self {
            first_name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_last_name(value: impl Into<String>) -> Self {
        Self {
            last_name: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_email(value: impl Into<String>) -> Self {
        Self {
            email: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_phone(value: impl Into<String>) -> Self {
        Self {
            phone: Some(value.into()),
            ..Self::default()
        }
    }

    /// The winning criterion, or `None` when no field is set.
    pub fn criterion(&self) -> Option<(SearchColumn, &str)> {
        if let Some(value) = self.first_name.as_deref() {
            return Some((SearchColumn::FirstName, value));
        }
        if let Some(value) = self.last_name.as_deref() {
            return Some((SearchColumn::LastName, value));
        }
        if let Some(value) = self.email.as_deref() {
            return Some((SearchColumn::Email, value));
        }
        self.phone
            .as_deref()
            .map(|value| (SearchColumn::Phone, value))
    }
}

/// One row of the joined search result: a client paired with one of its
/// phone numbers.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_criterion() {
        assert!(SearchFilter::default().criterion().is_none());
    }

    #[test]
    fn each_constructor_selects_its_column() {
        let cases = [
            (SearchFilter::by_first_name("Ivan"), SearchColumn::FirstName),
            (SearchFilter::by_last_name("Ivanov"), SearchColumn::LastName),
            (SearchFilter::by_email("ivan@test.ru"), SearchColumn::Email),
            (SearchFilter::by_phone("+7(888)999-33-11"), SearchColumn::Phone),
        ];
        for (filter, column) in cases {
            assert_eq!(filter.criterion().map(|(c, _)| c), Some(column));
        }
    }

    #[test]
    fn earlier_field_wins_over_later_ones() {
        let filter = SearchFilter {
            first_name: None,
            last_name: Some("Sergeev".to_string()),
            email: Some("Sergey@mail.ru".to_string()),
            phone: Some("+7(999)800-00-00".to_string()),
        };
        let (column, value) = filter.criterion().expect("criterion must be set");
        assert_eq!(column, SearchColumn::LastName);
        assert_eq!(value, "Sergeev");
    }
}
