use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::guard::CurrentUser;

pub async fn me(current_user: CurrentUser) -> ApiSuccess<CurrentUserData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Current user retrieved successfully.",
        current_user.into(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserData {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<CurrentUser> for CurrentUserData {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
