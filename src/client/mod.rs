pub mod factory;

use std::fs;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Certificate, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::store::TokenStore;
use crate::types::account::{BankAccount, CreateBankAccountRequest};
use crate::types::auth::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::types::customer::{CreateCustomerRequest, Customer};
use crate::types::dashboard::DashboardResponse;
use crate::types::response::{MessageResponse, MIME_JSON};
use crate::types::session::Session;
use crate::types::transfer::{TransferRequest, TransferResponse};

/// Published by the client when the server stops accepting the session.
/// The application, not the client, decides where to navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Expired,
}

#[derive(Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
    store: TokenStore,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0:#}")]
    Network(#[from] anyhow::Error),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Authentication failed: {}", .0.as_deref().unwrap_or("bad credentials"))]
    Authentication(Option<String>),

    #[error("Session expired: {}", .message.as_deref().unwrap_or("unauthorized"))]
    SessionExpired { message: Option<String> },

    #[error("Server error: code {code}, {}", .message.as_deref().unwrap_or("no message"))]
    Server { code: u16, message: Option<String> },

    #[error("Server returned invalid json: {0:?}")]
    InvalidJson(String),
}

/// Which hooks of the pipeline a call goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pipeline {
    /// No bearer token, no expiry handling. Used by login.
    Bare,
    /// Bearer token attached when present, 401 runs the expiry flow.
    Authorized,
}

impl Client {
    pub const DASHBOARD_PAGE_SIZE: u32 = 10;

    pub fn new(url: &str, cert_path: &str, store: TokenStore) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        let client = if cert_path.is_empty() || parsed.scheme() == "http" {
            reqwest::Client::new()
        } else {
            let data = fs::read(cert_path)
                .with_context(|| format!("read cert file '{cert_path}'"))?;
            let cert = Certificate::from_pem(&data).context("load cert file")?;
            reqwest::Client::builder()
                .add_root_certificate(cert)
                .build()
                .context("build api client")?
        };

        Ok(Self {
            url: url.to_string(),
            client,
            store,
            events: None,
        })
    }

    pub fn set_events(&mut self, events: mpsc::UnboundedSender<SessionEvent>) {
        self.events = Some(events);
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Authenticates and, when the server hands out a token, persists the
    /// session. Login never runs the expiry flow: a 401 here means bad
    /// credentials and leaves any stored session alone.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = match self
            .do_request(Method::POST, "api/rest/auth/login", &[], Some(&body), Pipeline::Bare)
            .await
        {
            Ok(resp) => resp,
            Err(RequestError::Server { code, message }) if code == StatusCode::UNAUTHORIZED => {
                return Err(RequestError::Authentication(message))
            }
            Err(e) => return Err(e),
        };

        if !resp.token.is_empty() {
            let session = Session::from(resp.clone());
            if let Err(e) = self.store.save(&resp.token, &session) {
                return Err(RequestError::Client(format!("save session: {e:#}")));
            }
            info!("Logged in as '{}'", session.username);
        }

        Ok(resp)
    }

    /// Drops the local session. The server keeps no session state, so there
    /// is nothing to call.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, RequestError> {
        let body = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.do_request(
            Method::POST,
            "api/rest/auth/change-password",
            &[],
            Some(&body),
            Pipeline::Authorized,
        )
        .await
    }

    pub async fn create_customer(
        &self,
        customer: &CreateCustomerRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.do_request(
            Method::POST,
            "api/rest/customer/create",
            &[],
            Some(customer),
            Pipeline::Authorized,
        )
        .await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, RequestError> {
        self.get("api/rest/customer/all", &[]).await
    }

    pub async fn create_bank_account(
        &self,
        account: &CreateBankAccountRequest,
    ) -> Result<MessageResponse, RequestError> {
        self.do_request(
            Method::POST,
            "api/rest/bank/create",
            &[],
            Some(account),
            Pipeline::Authorized,
        )
        .await
    }

    pub async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>, RequestError> {
        self.get("api/rest/bank/all", &[]).await
    }

    pub async fn get_bank_account(&self, rib: &str) -> Result<BankAccount, RequestError> {
        self.get("api/rest/bank", &[("rib", rib.to_string())]).await
    }

    pub async fn dashboard(
        &self,
        rib: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<DashboardResponse, RequestError> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(rib) = rib {
            query.push(("rib", rib.to_string()));
        }
        self.get("api/rest/dashboard", &query).await
    }

    pub async fn transfer(
        &self,
        transfer: &TransferRequest,
    ) -> Result<TransferResponse, RequestError> {
        self.do_request(
            Method::POST,
            "api/rest/transaction/transfer",
            &[],
            Some(transfer),
            Pipeline::Authorized,
        )
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RequestError> {
        self.do_request::<(), T>(Method::GET, path, query, None, Pipeline::Authorized)
            .await
    }

    async fn do_request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        pipeline: Pipeline,
    ) -> Result<T, RequestError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header(ACCEPT, MIME_JSON);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            let json = match serde_json::to_string(body) {
                Ok(json) => json,
                Err(e) => return Err(RequestError::Client(format!("encode body failed: {e}"))),
            };
            req = req.header(CONTENT_TYPE, MIME_JSON).body(json);
        }
        if pipeline == Pipeline::Authorized {
            req = self.before_request(req);
        }

        let req = match req.build() {
            Ok(req) => req,
            Err(e) => return Err(RequestError::Client(format!("build request failed: {e:#}"))),
        };
        debug!("Send request: {} {}", req.method(), req.url());

        let resp = match self.client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => return Err(RequestError::Network(e.into())),
        };

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => return Err(RequestError::Network(e.into())),
        };
        debug!("Server responded {status} for '{path}'");

        if status.is_success() {
            return match serde_json::from_str(&text) {
                Ok(data) => Ok(data),
                Err(_) => Err(RequestError::InvalidJson(text)),
            };
        }

        let err = RequestError::Server {
            code: status.as_u16(),
            message: error_message(&text),
        };
        match pipeline {
            Pipeline::Authorized => Err(self.on_failure(err)),
            Pipeline::Bare => Err(err),
        }
    }

    fn before_request(&self, req: RequestBuilder) -> RequestBuilder {
        match self.store.read_token() {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    /// Runs the expiry flow for 401 and hands the error back. Every other
    /// error passes through untouched.
    fn on_failure(&self, err: RequestError) -> RequestError {
        let message = match err {
            RequestError::Server { code, message } if code == StatusCode::UNAUTHORIZED => message,
            err => return err,
        };

        warn!("Server rejected our credentials, dropping local session");
        if let Err(e) = self.store.clear() {
            warn!("Clear session failed: {e:#}");
        }
        if let Some(events) = self.events.as_ref() {
            // The receiver is gone only when the application is shutting down.
            let _ = events.send(SessionEvent::Expired);
        }

        RequestError::SessionExpired { message }
    }
}

/// Pulls `message` out of an error body, if the body has one.
fn error_message(body: &str) -> Option<String> {
    let resp: MessageResponse = serde_json::from_str(body).ok()?;
    resp.message.filter(|message| !message.is_empty())
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Server { code, .. } => Some(*code),
            RequestError::Authentication(_) | RequestError::SessionExpired { .. } => {
                Some(StatusCode::UNAUTHORIZED.as_u16())
            }
            _ => None,
        }
    }

    /// Message sent by the server, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            RequestError::Authentication(message)
            | RequestError::SessionExpired { message }
            | RequestError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show to the user: the server message verbatim, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.message() {
            Some(message) => message.to_string(),
            None => fallback.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, RequestError::SessionExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use crate::session::token::tests::valid_token;
    use crate::session::Evaluator;
    use crate::storage::Storage;
    use crate::store::tests::{memory_store, new_session};
    use crate::store::USER_KEY;

    use super::*;

    fn new_client(url: &str, store: TokenStore) -> (Client, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut client = Client::new(url, "", store).unwrap();
        client.set_events(tx);
        (client, rx)
    }

    fn login_as(store: &TokenStore, roles: &[&str]) -> String {
        let token = valid_token();
        store
            .save(&token, &new_session(&token, roles, "alice"))
            .unwrap();
        token
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let (_, store) = memory_store();
        assert!(Client::new("ftp://bank.example.com", "", store.clone()).is_err());
        assert!(Client::new("not a url", "", store.clone()).is_err());

        let client = Client::new("http://localhost:8080/", "", store).unwrap();
        assert_eq!(client.url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_login_saves_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/rest/auth/login")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({"username": "alice", "password": "secret"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token": "T", "roles": ["ROLE_CLIENT"], "username": "alice"}"#)
            .create_async()
            .await;

        let (storage, store) = memory_store();
        let (client, mut rx) = new_client(&server.url(), store.clone());

        let resp = client.login("alice", "secret").await.unwrap();
        assert_eq!(resp.token, "T");
        mock.assert_async().await;

        assert_eq!(store.read_token().as_deref(), Some("T"));
        assert_eq!(
            store.read_session(),
            Some(new_session("T", &["ROLE_CLIENT"], "alice"))
        );
        let raw = storage.get_item(USER_KEY).unwrap().unwrap();
        let raw: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            raw,
            json!({"token": "T", "roles": ["ROLE_CLIENT"], "username": "alice"})
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_login_without_token_saves_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/rest/auth/login")
            .with_status(200)
            .with_body(r#"{"username": "alice", "roles": []}"#)
            .create_async()
            .await;

        let (_, store) = memory_store();
        let (client, _rx) = new_client(&server.url(), store.clone());

        let resp = client.login("alice", "secret").await.unwrap();
        assert!(resp.token.is_empty());
        assert!(store.read_token().is_none());
        assert!(store.read_session().is_none());
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/rest/auth/login")
            .with_status(401)
            .with_body(r#"{"message": "Login ou mot de passe erronés"}"#)
            .create_async()
            .await;

        let (_, store) = memory_store();
        let token = login_as(&store, &["ROLE_CLIENT"]);
        let (client, mut rx) = new_client(&server.url(), store.clone());

        let err = client.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, RequestError::Authentication(_)));
        assert_eq!(err.message(), Some("Login ou mot de passe erronés"));

        // Bad credentials are not an expiry: nothing is cleared or published
        assert_eq!(store.read_token(), Some(token));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_request_carries_stored_token() {
        let mut server = mockito::Server::new_async().await;
        let (_, store) = memory_store();
        let token = login_as(&store, &["ROLE_CLIENT"]);

        let mock = server
            .mock("GET", "/api/rest/dashboard")
            .match_header("authorization", format!("Bearer {token}").as_str())
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("size".into(), "5".into()),
                Matcher::UrlEncoded("rib".into(), "RIB 1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"accounts": [], "totalTransactions": 0, "recentTransactions": [], "totalPages": 0}"#)
            .create_async()
            .await;

        let (client, _rx) = new_client(&server.url(), store);
        let resp = client.dashboard(Some("RIB 1"), 2, 5).await.unwrap();
        assert!(resp.accounts.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_without_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/rest/bank/all")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (_, store) = memory_store();
        let (client, _rx) = new_client(&server.url(), store);
        let accounts = client.list_bank_accounts().await.unwrap();
        assert!(accounts.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_runs_expiry_flow() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/rest/transaction/transfer")
            .with_status(401)
            .with_body(r#"{"message": "Token expired"}"#)
            .create_async()
            .await;

        let (_, store) = memory_store();
        login_as(&store, &["ROLE_CLIENT"]);
        let (client, mut rx) = new_client(&server.url(), store.clone());

        let transfer = TransferRequest {
            source_rib: String::from("RIB-1"),
            destination_rib: String::from("RIB-2"),
            amount: 10.0,
            motif: String::from("test"),
        };
        let err = client.transfer(&transfer).await.unwrap_err();

        // The caller still sees the failure
        assert!(err.is_session_expired());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message("fallback"), "Token expired");

        // Session dropped and navigation requested
        assert!(store.read_token().is_none());
        assert!(store.read_session().is_none());
        assert!(!Evaluator::new(store).is_authenticated());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Expired);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_other_failures_pass_through() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server
            .mock("POST", "/api/rest/bank/create")
            .with_status(400)
            .with_body(r#"{"message": "RIB already exists"}"#)
            .create_async()
            .await;
        let _forbidden = server
            .mock("GET", "/api/rest/customer/all")
            .with_status(403)
            .create_async()
            .await;
        let _internal = server
            .mock("GET", "/api/rest/bank/all")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let (_, store) = memory_store();
        let token = login_as(&store, &["ROLE_AGENT_GUICHET"]);
        let (client, mut rx) = new_client(&server.url(), store.clone());

        let account = CreateBankAccountRequest {
            rib: String::from("RIB-1"),
            identity_number: String::from("AB123"),
            amount: 100.0,
        };
        let err = client.create_bank_account(&account).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message("fallback"), "RIB already exists");

        let err = client.list_customers().await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message("fallback"), "fallback");

        let err = client.list_bank_accounts().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.message().is_none());

        assert_eq!(store.read_token(), Some(token));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_network_error() {
        // Nothing listens on the tcpmux port
        let url = "http://127.0.0.1:1";

        let (_, store) = memory_store();
        let token = login_as(&store, &["ROLE_CLIENT"]);
        let (client, mut rx) = new_client(url, store.clone());

        let err = client.dashboard(None, 0, 10).await.unwrap_err();
        assert!(matches!(err, RequestError::Network(_)));
        assert_eq!(err.user_message("Unable to load dashboard"), "Unable to load dashboard");
        assert_eq!(store.read_token(), Some(token));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/rest/bank")
            .match_query(Matcher::UrlEncoded("rib".into(), "RIB-1".into()))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let (_, store) = memory_store();
        let (client, _rx) = new_client(&server.url(), store);
        let err = client.get_bank_account("RIB-1").await.unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(body) if body == "not json"));
    }
}
