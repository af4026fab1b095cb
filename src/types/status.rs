use serde::{Deserialize, Serialize};

/// Presence of a value: never set, SQL NULL, or carrying data.
///
/// `Undefined` is the default so that a value which was never assigned is
/// distinguishable from one explicitly set to NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Undefined,
    Null,
    Present,
}

impl Status {
    pub fn is_null(self) -> bool {
        self == Status::Null
    }

    pub fn is_present(self) -> bool {
        self == Status::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArrayDimension;

    #[rstest::rstest]
    #[case(Status::Undefined, "\"undefined\"")]
    #[case(Status::Null, "\"null\"")]
    #[case(Status::Present, "\"present\"")]
    fn test_status_serializes_lowercase(#[case] status: Status, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
        assert_eq!(serde_json::from_str::<Status>(json).unwrap(), status);
    }

    #[rstest::rstest]
    fn test_dimension_serializes_fields() {
        let dim = ArrayDimension::new(3, 0);
        let json = serde_json::to_string(&dim).unwrap();
        assert_eq!(json, r#"{"length":3,"lower_bound":0}"#);
        assert_eq!(serde_json::from_str::<ArrayDimension>(&json).unwrap(), dim);
    }

    #[rstest::rstest]
    fn test_predicates() {
        assert!(Status::Null.is_null());
        assert!(!Status::Undefined.is_present());
        assert_eq!(Status::default(), Status::Undefined);
    }
}
