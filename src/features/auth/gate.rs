//! Gate core: the startup decision procedure and the option payloads handed
//! to the provider SDK. Nothing here touches the DOM or the network, so the
//! whole module is exercised by native unit tests through mock collaborators.

use crate::app_lib::GateError;
use crate::features::auth::client::IdentityClient;
use log::{debug, info, warn};
use serde::Serialize;

/// Options passed to the SDK when constructing the identity client.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    pub domain: String,
    pub client_id: String,
}

/// Options for the redirect-based login flow. `app_state` travels to the
/// provider and comes back after the redirect, carrying the pre-login
/// navigation target.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOptions {
    pub authorization_params: AuthorizationParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_state: Option<AppState>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AuthorizationParams {
    pub redirect_uri: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub target_url: String,
}

impl LoginOptions {
    pub fn new(origin: &str, target_url: Option<&str>) -> Self {
        Self {
            authorization_params: AuthorizationParams {
                redirect_uri: origin.to_string(),
            },
            app_state: target_url.map(|url| AppState {
                target_url: url.to_string(),
            }),
        }
    }
}

/// Options for the redirect-based logout flow.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutOptions {
    pub logout_params: LogoutParams,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutParams {
    pub return_to: String,
}

impl LogoutOptions {
    pub fn new(origin: &str) -> Self {
        Self {
            logout_params: LogoutParams {
                return_to: origin.to_string(),
            },
        }
    }
}

/// True when the query string carries redirect-callback evidence.
///
/// This is a literal substring check, not a parsed-parameter check: `code=`
/// or `state=` occurring inside an unrelated parameter value also counts.
#[must_use]
pub fn has_redirect_marker(query: &str) -> bool {
    query.contains("code=") && query.contains("state=")
}

/// Rendering surface for the two visibility groups. Exactly one group is
/// shown after a successful render.
pub trait AuthView {
    fn render(&self, authenticated: bool) -> Result<(), GateError>;
}

/// The session gate. Owns the identity client handle and the view; shared
/// with event handlers via `Rc` on the page.
pub struct SessionGate<C, V> {
    client: C,
    view: V,
    origin: String,
}

impl<C: IdentityClient, V: AuthView> SessionGate<C, V> {
    pub fn new(client: C, view: V, origin: impl Into<String>) -> Self {
        Self {
            client,
            view,
            origin: origin.into(),
        }
    }

    /// Startup sequence, run once per page load: query session state; if
    /// authenticated, render and stop; otherwise consume a redirect marker
    /// when one is present, then render whichever state resulted.
    ///
    /// A failing redirect callback is logged and swallowed; the initial
    /// session query is the one call here whose failure propagates.
    pub async fn start(&self, query: &str) -> Result<(), GateError> {
        if self.client.is_authenticated().await? {
            info!("visitor is authenticated");
            self.refresh_or_warn().await;
            return Ok(());
        }

        info!("visitor is not authenticated");

        if has_redirect_marker(query) {
            if let Err(err) = self.complete_redirect().await {
                warn!("{err}");
            }
        }

        self.refresh_or_warn().await;
        Ok(())
    }

    async fn refresh_or_warn(&self) {
        match self.refresh().await {
            Ok(()) => debug!("page visibility updated"),
            Err(err) => warn!("leaving page visibility unchanged: {err}"),
        }
    }

    /// Queries session state once and reflects it into the view. On failure
    /// the view is left untouched and the error is returned to the caller.
    pub async fn refresh(&self) -> Result<(), GateError> {
        let authenticated = self.client.is_authenticated().await?;

        if authenticated {
            let _profile = self.client.get_user().await?;
            debug!("user profile loaded");
        }

        self.view.render(authenticated)
    }

    /// Starts the redirect-based login flow. When `target_url` is supplied it
    /// rides along as resumable state and comes back after the redirect.
    pub async fn login(&self, target_url: Option<&str>) -> Result<(), GateError> {
        info!("starting login flow, target: {target_url:?}");

        let options = LoginOptions::new(&self.origin, target_url);
        self.client.login_with_redirect(&options).await
    }

    /// Starts the redirect-based logout flow, returning to the page origin.
    pub async fn logout(&self) -> Result<(), GateError> {
        info!("starting logout flow");

        self.client.logout(&LogoutOptions::new(&self.origin)).await
    }

    /// Lets the SDK consume the redirect marker. Only valid on the page the
    /// provider redirected back to.
    pub async fn complete_redirect(&self) -> Result<(), GateError> {
        self.client.handle_redirect_callback().await?;
        info!("redirect callback consumed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};

    const ORIGIN: &str = "https://portal.example";

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        IsAuthenticated,
        GetUser,
        Login,
        Logout,
        Callback,
    }

    #[derive(Default)]
    struct MockClient {
        authenticated: Cell<bool>,
        authenticate_on_callback: Cell<bool>,
        fail_session: Cell<bool>,
        fail_callback: Cell<bool>,
        fail_login: Cell<bool>,
        fail_logout: Cell<bool>,
        calls: RefCell<Vec<Call>>,
        last_login: RefCell<Option<LoginOptions>>,
        last_logout: RefCell<Option<LogoutOptions>>,
    }

    impl MockClient {
        fn count(&self, call: Call) -> usize {
            self.calls.borrow().iter().filter(|&&c| c == call).count()
        }
    }

    impl IdentityClient for &MockClient {
        async fn is_authenticated(&self) -> Result<bool, GateError> {
            self.calls.borrow_mut().push(Call::IsAuthenticated);
            if self.fail_session.get() {
                return Err(GateError::Session("provider unreachable".to_string()));
            }
            Ok(self.authenticated.get())
        }

        async fn get_user(&self) -> Result<Value, GateError> {
            self.calls.borrow_mut().push(Call::GetUser);
            Ok(json!({ "sub": "auth0|1234" }))
        }

        async fn login_with_redirect(&self, options: &LoginOptions) -> Result<(), GateError> {
            self.calls.borrow_mut().push(Call::Login);
            *self.last_login.borrow_mut() = Some(options.clone());
            if self.fail_login.get() {
                return Err(GateError::Login("provider rejected the request".to_string()));
            }
            Ok(())
        }

        async fn logout(&self, options: &LogoutOptions) -> Result<(), GateError> {
            self.calls.borrow_mut().push(Call::Logout);
            *self.last_logout.borrow_mut() = Some(options.clone());
            if self.fail_logout.get() {
                return Err(GateError::Logout("provider rejected the request".to_string()));
            }
            Ok(())
        }

        async fn handle_redirect_callback(&self) -> Result<(), GateError> {
            self.calls.borrow_mut().push(Call::Callback);
            if self.fail_callback.get() {
                return Err(GateError::Callback("state mismatch".to_string()));
            }
            if self.authenticate_on_callback.get() {
                self.authenticated.set(true);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockView {
        rendered: RefCell<Vec<bool>>,
    }

    impl AuthView for &MockView {
        fn render(&self, authenticated: bool) -> Result<(), GateError> {
            self.rendered.borrow_mut().push(authenticated);
            Ok(())
        }
    }

    fn gate<'a>(
        client: &'a MockClient,
        view: &'a MockView,
    ) -> SessionGate<&'a MockClient, &'a MockView> {
        SessionGate::new(client, view, ORIGIN)
    }

    #[test]
    fn redirect_marker_requires_both_substrings() {
        assert!(has_redirect_marker("?code=abc&state=xyz"));
        assert!(has_redirect_marker("?state=xyz&foo=1&code=abc"));

        assert!(!has_redirect_marker(""));
        assert!(!has_redirect_marker("?code=abc"));
        assert!(!has_redirect_marker("?state=xyz"));
        assert!(!has_redirect_marker("?welcome=1"));
    }

    #[test]
    fn redirect_marker_matches_substrings_inside_values() {
        // Documented behavior: the check is literal, so markers embedded in
        // unrelated parameter values still count.
        assert!(has_redirect_marker("?promo=use code=FALL&hint=state=open"));
    }

    #[test]
    fn authenticated_visitor_skips_callback_handling() {
        let client = MockClient::default();
        client.authenticated.set(true);
        let view = MockView::default();

        block_on(gate(&client, &view).start("")).unwrap();

        assert_eq!(client.count(Call::Callback), 0);
        assert_eq!(*view.rendered.borrow(), vec![true]);
    }

    #[test]
    fn redirect_marker_triggers_callback_exactly_once() {
        let client = MockClient::default();
        client.authenticate_on_callback.set(true);
        let view = MockView::default();

        block_on(gate(&client, &view).start("?code=abc&state=xyz")).unwrap();

        assert_eq!(client.count(Call::Callback), 1);
        assert_eq!(
            *client.calls.borrow(),
            vec![
                Call::IsAuthenticated,
                Call::Callback,
                Call::IsAuthenticated,
                Call::GetUser,
            ]
        );
        assert_eq!(*view.rendered.borrow(), vec![true]);
    }

    #[test]
    fn unauthenticated_visitor_without_marker_renders_signed_out() {
        let client = MockClient::default();
        let view = MockView::default();

        block_on(gate(&client, &view).start("?welcome=1")).unwrap();

        assert_eq!(client.count(Call::Callback), 0);
        assert_eq!(client.count(Call::GetUser), 0);
        assert_eq!(*view.rendered.borrow(), vec![false]);
    }

    #[test]
    fn callback_failure_is_swallowed_and_page_renders_signed_out() {
        let client = MockClient::default();
        client.fail_callback.set(true);
        let view = MockView::default();

        block_on(gate(&client, &view).start("?code=abc&state=xyz")).unwrap();

        assert_eq!(client.count(Call::Callback), 1);
        assert_eq!(*view.rendered.borrow(), vec![false]);
    }

    #[test]
    fn refresh_failure_leaves_view_untouched() {
        let client = MockClient::default();
        client.fail_session.set(true);
        let view = MockView::default();

        let result = block_on(gate(&client, &view).refresh());

        assert!(matches!(result, Err(GateError::Session(_))));
        assert!(view.rendered.borrow().is_empty());
    }

    #[test]
    fn initial_session_query_failure_propagates() {
        let client = MockClient::default();
        client.fail_session.set(true);
        let view = MockView::default();

        let result = block_on(gate(&client, &view).start(""));

        assert!(matches!(result, Err(GateError::Session(_))));
        assert!(view.rendered.borrow().is_empty());
    }

    #[test]
    fn login_attaches_target_url_when_provided() {
        let client = MockClient::default();
        let view = MockView::default();

        block_on(gate(&client, &view).login(Some("/account"))).unwrap();

        let recorded = client.last_login.borrow();
        let options = recorded.as_ref().unwrap();
        assert_eq!(options.authorization_params.redirect_uri, ORIGIN);
        assert_eq!(
            options.app_state.as_ref().map(|state| state.target_url.as_str()),
            Some("/account")
        );
    }

    #[test]
    fn login_without_target_omits_resumable_state() {
        let options = LoginOptions::new(ORIGIN, None);
        let payload = serde_json::to_value(&options).unwrap();

        assert_eq!(
            payload["authorizationParams"]["redirect_uri"],
            json!(ORIGIN)
        );
        assert!(payload.get("appState").is_none());
    }

    #[test]
    fn login_with_target_serializes_resumable_state() {
        let options = LoginOptions::new(ORIGIN, Some("/account"));
        let payload = serde_json::to_value(&options).unwrap();

        assert_eq!(payload["appState"]["targetUrl"], json!("/account"));
    }

    #[test]
    fn login_failure_reports_its_kind() {
        let client = MockClient::default();
        client.fail_login.set(true);
        let view = MockView::default();

        let result = block_on(gate(&client, &view).login(None));

        assert!(matches!(result, Err(GateError::Login(_))));
    }

    #[test]
    fn logout_returns_to_page_origin() {
        let client = MockClient::default();
        let view = MockView::default();

        block_on(gate(&client, &view).logout()).unwrap();

        let recorded = client.last_logout.borrow();
        let options = recorded.as_ref().unwrap();
        assert_eq!(options.logout_params.return_to, ORIGIN);
    }

    #[test]
    fn client_options_serialize_with_sdk_field_names() {
        let options = ClientOptions {
            domain: "tenant.us.auth0.com".to_string(),
            client_id: "client-123".to_string(),
        };
        let payload = serde_json::to_value(&options).unwrap();

        assert_eq!(payload["domain"], json!("tenant.us.auth0.com"));
        assert_eq!(payload["clientId"], json!("client-123"));
    }
}
