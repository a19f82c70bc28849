use axum::Json;
use axum::extract::Path;
use faultline_core::Raised;
use serde::Serialize;

use crate::errors::{InvalidRequestError, NoUserFoundError};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: String,
}

/// `GET /`: no user segment in the path
pub async fn missing_user() -> Result<Json<UserResponse>, Raised> {
    lookup(None)
}

/// `GET /{user}`
pub async fn get_user(Path(user): Path<String>) -> Result<Json<UserResponse>, Raised> {
    lookup(Some(user))
}

fn lookup(user: Option<String>) -> Result<Json<UserResponse>, Raised> {
    let Some(user) = user else {
        return Err(InvalidRequestError::new().with("reason", "no user").into());
    };

    if !user.contains("user") {
        return Err(NoUserFoundError::new().with("user", user).into());
    }

    Ok(Json(UserResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_user_is_invalid() {
        let raised = lookup(None).unwrap_err();
        assert!(raised.downcast_ref::<InvalidRequestError>().is_some());
    }

    #[test]
    fn unknown_user_is_not_found() {
        let raised = lookup(Some("1".to_owned())).unwrap_err();
        let error = raised.downcast_ref::<NoUserFoundError>().unwrap();
        assert_eq!(error, &NoUserFoundError::new().with("user", "1"));
    }

    #[test]
    fn known_user_is_returned() {
        let Json(response) = lookup(Some("user-1".to_owned())).unwrap();
        assert_eq!(response.user, "user-1");
    }
}
