#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Phone {
    pub id: i32,
    pub id_client: i32,
    pub phone_number: String,
}

/// One or several phone numbers destined for the same client.
///
/// Replaces ad-hoc "string or list of strings" arguments with an explicit
/// variant; `Many` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumbers {
    One(String),
    Many(Vec<String>),
}

impl PhoneNumbers {
    pub fn many<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(numbers.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(number) => std::slice::from_ref(number),
            Self::Many(numbers) => numbers,
        }
    }
}

impl From<&str> for PhoneNumbers {
    fn from(number: &str) -> Self {
        Self::One(number.to_string())
    }
}

impl From<String> for PhoneNumbers {
    fn from(number: String) -> Self {
        Self::One(number)
    }
}

impl From<Vec<String>> for PhoneNumbers {
    fn from(numbers: Vec<String>) -> Self {
        Self::Many(numbers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_number_is_a_one_element_slice() {
        let phones = PhoneNumbers::from("+7(999)800-00-00");
        assert_eq!(phones.as_slice(), ["+7(999)800-00-00"]);
    }

    #[test]
    fn many_preserves_insertion_order() {
        let phones = PhoneNumbers::many(["+7(000)000-11-11", "+7(000)000-11-22", "+7(000)000-22-22"]);
        assert_eq!(
            phones.as_slice(),
            ["+7(000)000-11-11", "+7(000)000-11-22", "+7(000)000-22-22"]
        );
    }
}
