use thiserror::Error;

/// Character matcher error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Unpaired surrogate at index {index}")]
    UnpairedSurrogate { index: usize },
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_bounds_is_matchable() {
        let err = MatchError::IndexOutOfBounds { index: 1, len: 0 };
        match &err {
            MatchError::IndexOutOfBounds { index, len } => {
                assert_eq!(*index, 1);
                assert_eq!(*len, 0);
            }
            _ => panic!("expected IndexOutOfBounds"),
        }
    }

    #[test]
    fn test_index_out_of_bounds_display() {
        let err = MatchError::IndexOutOfBounds { index: 5, len: 3 };
        let display = format!("{}", err);
        assert!(display.contains("5"), "got: {}", display);
        assert!(display.contains("3"), "got: {}", display);
    }

    #[test]
    fn test_invalid_argument_display_includes_message() {
        let err = MatchError::InvalidArgument("lo > hi".into());
        let display = format!("{}", err);
        assert!(display.contains("lo > hi"), "got: {}", display);
    }

    #[test]
    fn test_unpaired_surrogate_display() {
        let err = MatchError::UnpairedSurrogate { index: 2 };
        assert_eq!(format!("{}", err), "Unpaired surrogate at index 2");
    }
}
