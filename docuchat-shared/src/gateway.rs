//! Authenticated request gateway.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::auth::AuthProvider;
use crate::errors::{WidgetError, WidgetResult};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Attaches the caller's access token to backend requests.
///
/// The token is looked up per request and never stored here, so a sign-out
/// in the provider takes effect on the very next call.
pub struct Gateway {
    auth: Rc<dyn AuthProvider>,
    transport: Rc<dyn Transport>,
}

impl Gateway {
    pub fn new(auth: Rc<dyn AuthProvider>, transport: Rc<dyn Transport>) -> Self {
        Self { auth, transport }
    }

    /// Sends `request` with a bearer token.
    ///
    /// # Errors
    /// Returns [`WidgetError::Unauthenticated`] without touching the network
    /// when no session exists, otherwise whatever the transport reports.
    pub async fn authorized_fetch(&self, request: ApiRequest) -> WidgetResult<ApiResponse> {
        let Some(session) = self.auth.current_session().await else {
            warn!(path = %request.path, "refusing request without an auth session");
            return Err(WidgetError::Unauthenticated);
        };
        debug!(path = %request.path, "authorized request");
        self.transport
            .send(request.with_bearer(session.access_token))
            .await
    }

    /// Sends `request` as-is, without credentials.
    ///
    /// # Errors
    /// Returns whatever the transport reports.
    pub async fn public_fetch(&self, request: ApiRequest) -> WidgetResult<ApiResponse> {
        self.transport.send(request).await
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}
