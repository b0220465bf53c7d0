use anyhow::Result;
use log::{debug, info};
use tokio::sync::mpsc;

use crate::client::factory::ClientFactory;
use crate::client::{Client, SessionEvent};
use crate::router::{Location, Navigator, Page, Router, View, EXPIRED_LOGIN_PATH};
use crate::session::Evaluator;
use crate::store::TokenStore;

/// Wires the pieces together and owns navigation.
///
/// The client only reports that the session expired; the app is the single
/// subscriber of those reports and the one that moves to the login page.
pub struct App {
    client: Client,
    evaluator: Evaluator,
    router: Router,
    navigator: Navigator,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl App {
    pub const EXPIRED_NOTICE: &'static str = "Session invalid, please authenticate";

    pub fn new(store: TokenStore, mut client: Client) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        client.set_events(tx);

        let evaluator = Evaluator::new(store);
        Self {
            client,
            router: Router::new(evaluator.clone()),
            evaluator,
            navigator: Navigator::new(),
            events: rx,
        }
    }

    pub fn build(factory: &ClientFactory) -> Result<Self> {
        let store = factory.build_token_store()?;
        let client = factory.build_client(store.clone())?;
        Ok(Self::new(store, client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    /// Pushes `path` and renders it, following redirects.
    pub fn open(&mut self, path: &str) -> Result<View> {
        self.navigator.push(path);
        debug!("Open '{path}', history depth {}", self.navigator.depth());
        self.router.render(&mut self.navigator)
    }

    /// Opens the page for the signed-in user's role.
    pub fn open_landing(&mut self) -> Result<View> {
        let path = self.router.landing_path();
        self.open(path)
    }

    /// Applies navigation queued by the client since the last call. Returns
    /// the new view when a navigation happened.
    pub fn settle(&mut self) -> Result<Option<View>> {
        let mut expired = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Expired => expired = true,
            }
        }
        if !expired {
            return Ok(None);
        }

        info!("Session expired, redirecting to login");
        let view = self.open(EXPIRED_LOGIN_PATH)?;
        Ok(Some(view))
    }

    /// Returns to the previous entry and renders it, `None` when there is
    /// nothing to go back to.
    pub fn back(&mut self) -> Result<Option<View>> {
        if !self.navigator.back() {
            return Ok(None);
        }
        let view = self.router.render(&mut self.navigator)?;
        Ok(Some(view))
    }

    /// Notice shown on the login page, if any.
    pub fn login_notice(&self) -> Option<&'static str> {
        let location = self.location();
        if location.path() == Page::Login.path() && location.query_param("expired") == Some("true")
        {
            return Some(Self::EXPIRED_NOTICE);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::client::RequestError;
    use crate::session::token::tests::valid_token;
    use crate::store::tests::{memory_store, new_session};
    use crate::types::auth::{ROLE_AGENT, ROLE_CLIENT};

    use super::*;

    fn new_app(url: &str) -> (TokenStore, App) {
        let (_, store) = memory_store();
        let client = Client::new(url, "", store.clone()).unwrap();
        (store.clone(), App::new(store, client))
    }

    #[tokio::test]
    async fn test_expired_session_navigates_to_login() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/rest/dashboard")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let (store, mut app) = new_app(&server.url());
        let token = valid_token();
        store
            .save(&token, &new_session(&token, &[ROLE_CLIENT], "alice"))
            .unwrap();

        assert_eq!(
            app.open("/client/dashboard").unwrap(),
            View::Content(Page::Dashboard)
        );

        let err = app.client().dashboard(None, 0, 10).await.unwrap_err();
        assert!(err.is_session_expired());

        // The caller handles the error before the navigation takes effect
        assert_eq!(app.location().path(), "/client/dashboard");
        assert!(store.read_token().is_none());

        let view = app.settle().unwrap();
        assert_eq!(view, Some(View::Content(Page::Login)));
        assert_eq!(app.location().to_string(), "/login?expired=true");
        assert_eq!(app.login_notice(), Some(App::EXPIRED_NOTICE));

        // Nothing left to apply
        assert_eq!(app.settle().unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_navigate() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/rest/customer/create")
            .with_status(400)
            .with_body(r#"{"message": "Identity number already used"}"#)
            .create_async()
            .await;

        let (store, mut app) = new_app(&server.url());
        let token = valid_token();
        store
            .save(&token, &new_session(&token, &[ROLE_AGENT], "bob"))
            .unwrap();
        app.open("/agent/add-client").unwrap();

        let req = serde_json::from_value(serde_json::json!({
            "firstname": "Amal",
            "lastname": "Idrissi",
            "identityNumber": "AB1",
            "birthDate": "1990-05-17T00:00:00Z",
            "email": "amal@example.com",
            "postalAddress": "Rabat"
        }))
        .unwrap();
        let err = app.client().create_customer(&req).await.unwrap_err();
        assert!(matches!(err, RequestError::Server { code: 400, .. }));

        assert_eq!(app.settle().unwrap(), None);
        assert_eq!(app.location().path(), "/agent/add-client");
        assert!(app.evaluator().is_authenticated());
        assert_eq!(app.login_notice(), None);
    }

    #[test]
    fn test_back_skips_blocked_route() {
        let (_, mut app) = new_app("http://localhost:8080");

        assert_eq!(app.open("/client/transfer").unwrap(), View::Content(Page::Login));
        assert_eq!(app.location().path(), "/login");

        // The blocked route was replaced, going back lands on the start entry
        assert_eq!(app.back().unwrap(), Some(View::Content(Page::Login)));
        assert_eq!(app.back().unwrap(), None);
    }

    #[test]
    fn test_open_landing() {
        let (store, mut app) = new_app("http://localhost:8080");

        assert_eq!(app.open_landing().unwrap(), View::Content(Page::Login));

        let token = valid_token();
        store
            .save(&token, &new_session(&token, &[ROLE_AGENT], "bob"))
            .unwrap();
        assert_eq!(app.open_landing().unwrap(), View::Content(Page::AddClient));
        assert_eq!(app.location().path(), "/agent/add-client");
    }
}
