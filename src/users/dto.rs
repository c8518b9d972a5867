use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::users::repo_types::User;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 200;
pub const DEFAULT_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { DEFAULT_LIMIT }

impl Pagination {
    /// Rejects out-of-range values instead of clamping them.
    pub fn validate(self) -> Result<Self, AppError> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            return Err(AppError::BadRequest(format!(
                "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        if self.offset < 0 {
            return Err(AppError::BadRequest(format!(
                "offset must be >= 0, got {}",
                self.offset
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64, // table row count, not items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: i64, offset: i64) -> Pagination {
        Pagination { limit, offset }
    }

    #[test]
    fn defaults_come_from_serde() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(page(1, 0).validate().is_ok());
        assert!(page(200, 0).validate().is_ok());
        assert!(page(50, 1_000_000).validate().is_ok());
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        for (limit, offset) in [(0, 0), (201, 0), (-5, 0), (50, -1)] {
            let err = page(limit, offset).validate().unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{limit}/{offset}");
        }
    }
}
