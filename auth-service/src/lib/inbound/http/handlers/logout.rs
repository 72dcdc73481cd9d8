use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiSuccess;
use crate::inbound::http::cookie::clear_refresh_cookie;
use crate::inbound::http::guard::CurrentUser;

/// Drop the refresh cookie. Tokens already issued stay valid until they
/// expire.
pub async fn logout(
    current_user: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<()>) {
    tracing::info!(user_id = %current_user.id, "User logged out");

    (
        clear_refresh_cookie(jar),
        ApiSuccess::without_data(StatusCode::OK, "Logout completed successfully."),
    )
}
