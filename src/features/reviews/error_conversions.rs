use diesel::r2d2::PoolError;
use diesel::result::Error as DieselError;
use validator::ValidationErrors;

use crate::data::models::ReviewError;

impl From<DieselError> for ReviewError {
    fn from(err: DieselError) -> Self {
        ReviewError::DatabaseError(err)
    }
}

impl From<PoolError> for ReviewError {
    fn from(err: PoolError) -> Self {
        ReviewError::PoolError(err.to_string())
    }
}

impl From<ValidationErrors> for ReviewError {
    fn from(err: ValidationErrors) -> Self {
        ReviewError::ValidationError(err.to_string())
    }
}
