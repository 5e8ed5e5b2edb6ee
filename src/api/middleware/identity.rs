//! Signed-cookie user identity middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

/// Cookie carrying the signed user id.
pub const USER_ID_COOKIE: &str = "user_id";

/// Identity attached to every request by [`layer`].
///
/// `None` means the request presented a cookie that failed verification and
/// proceeds anonymously.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<Uuid>);

/// Resolves the caller's identity from the `user_id` cookie.
///
/// - No cookie: a new random identity is issued, attached to the request, and
///   returned in a `Set-Cookie: user_id=<token>; HttpOnly; Path=/` header.
/// - Cookie fails verification: the request continues as anonymous.
/// - Cookie verifies: its user id is attached to the request.
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = read_cookie(req.headers(), USER_ID_COOKIE) else {
        let user_id = Uuid::new_v4();
        req.extensions_mut().insert(CurrentUser(Some(user_id)));

        let mut response = next.run(req).await;
        let cookie = format!(
            "{USER_ID_COOKIE}={}; HttpOnly; Path=/",
            st.signer.sign(&user_id.to_string())
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
        debug!(%user_id, "Issued new identity");
        return response;
    };

    let user = st
        .signer
        .verify(&token)
        .ok()
        .and_then(|id| Uuid::parse_str(&id).ok());

    if user.is_none() {
        debug!("Identity cookie rejected, continuing anonymously");
    }

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

/// Finds `name` among the `Cookie` headers.
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}
