//! Router construction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use panelkit_core::{NavDashboard, Site};
use panelkit_protocols::{Handler, RequestContext, User};

use crate::error::ApiError;

/// Id of the signed-in user. Absent means anonymous.
pub const HEADER_USER: &str = "x-panelkit-user";
/// Comma-separated permissions of the user.
pub const HEADER_PERMISSIONS: &str = "x-panelkit-permissions";
/// Session token keying the access cache.
pub const HEADER_TOKEN: &str = "x-panelkit-token";

const NAV_PATH: &str = "/_panelkit/nav";
const HOME_PATH: &str = "/_panelkit/home";

/// Build the router for `site`, compiling its routes if needed.
///
/// Routes are mounted in table order. A path whose shape was already
/// mounted is shadowed and skipped.
pub fn build_router(site: Arc<Site>) -> Result<Router, ApiError> {
    let compiled = site.routes()?;
    let mut router = Router::new();
    let mut mounted = HashSet::new();
    let mut count = 0;

    for route in compiled.flatten() {
        if !mounted.insert(shape(&route.path)) {
            debug!(path = %route.path, name = ?route.name, "Route shadowed, skipping");
            continue;
        }
        let pattern = route.path.clone();
        let handler = route.handler.clone();
        router = router.route(
            &route.path,
            get(move |uri: Uri, headers: HeaderMap| {
                let handler = handler.clone();
                let pattern = pattern.clone();
                async move { dispatch(&handler, &pattern, uri.path(), &headers) }
            }),
        );
        count += 1;
    }

    let nav_site = site.clone();
    router = router.route(
        NAV_PATH,
        get(move |headers: HeaderMap| {
            let site = nav_site.clone();
            async move { navigation(&site, &headers) }
        }),
    );

    let home_site = site.clone();
    router = router.route(
        HOME_PATH,
        get(move |headers: HeaderMap| {
            let site = home_site.clone();
            async move { user_home(&site, &headers) }
        }),
    );

    info!(site = site.slug(), routes = count, "Router built");
    Ok(router.layer(TraceLayer::new_for_http()))
}

/// Path with parameter names erased, so `/{a}/` and `/{b}/` collide.
fn shape(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment.starts_with('{') { "{}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Captured parameters of `path` against a `{name}` pattern.
pub fn match_params(pattern: &str, path: &str) -> HashMap<String, String> {
    pattern
        .split('/')
        .zip(path.split('/'))
        .filter_map(|(segment, value)| {
            let name = segment.strip_prefix('{')?.strip_suffix('}')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// The caller described by the `x-panelkit-*` headers.
pub fn user_from_headers(headers: &HeaderMap) -> Option<User> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let mut user = User::authenticated(header(HEADER_USER)?);
    if let Some(permissions) = header(HEADER_PERMISSIONS) {
        user = user.with_permissions(
            permissions
                .split(',')
                .map(str::trim)
                .filter(|permission| !permission.is_empty()),
        );
    }
    if let Some(token) = header(HEADER_TOKEN) {
        user = user.with_token(token);
    }
    Some(user)
}

fn dispatch(
    handler: &Handler,
    pattern: &str,
    path: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let mut request = RequestContext::new(path);
    request.user = user_from_headers(headers);
    request.params = match_params(pattern, path);

    let response = handler.call(&mut request)?;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok((status, Json(response.body)).into_response())
}

fn navigation(site: &Site, headers: &HeaderMap) -> Result<Json<Vec<NavDashboard>>, ApiError> {
    let ctx = site.access_context(user_from_headers(headers));
    Ok(Json(site.navigation(&ctx)?))
}

/// Redirect the caller to their home URL.
fn user_home(site: &Site, headers: &HeaderMap) -> Result<Redirect, ApiError> {
    let user = user_from_headers(headers).unwrap_or_else(User::anonymous);
    let url = site.get_user_home(&user)?;
    debug!(user = %user.id, url = %url, "Redirecting to user home");
    Ok(Redirect::to(&url))
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
