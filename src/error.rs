use gloo::storage::errors::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("no bounding box has been drawn")]
    NoBoundingBox,

    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("cells are {cell_width:.0}x{cell_height:.0} px, below the {min} px minimum")]
    CellTooSmall {
        cell_width: f64,
        cell_height: f64,
        min: f64,
    },

    #[error("values are {rows}x{cols}, grid is {expected_rows}x{expected_cols}")]
    ValuesShape {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("image is not loaded")]
    MissingImage,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for GridError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SerdeError(err) => GridError::Json(err),
            other => GridError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecodable_values_surface_as_json_errors() {
        let bad = serde_json::from_str::<u32>("\"seven\"").unwrap_err();
        let err = GridError::from(StorageError::SerdeError(bad));
        assert!(matches!(err, GridError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));

        let missing = GridError::from(StorageError::KeyNotFound("bingo_card".into()));
        assert!(matches!(missing, GridError::Storage(_)));
    }
}
