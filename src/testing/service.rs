//! In-process stand-in for the session service

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{get, post, web, App, HttpRequest, HttpResponse, HttpServer};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;

use crate::protocol::Credential;

/// Deliberate contract breach the fake service commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
    #[default]
    None,
    /// Every authorize mints a fresh token
    MintPerRequest,
    /// Logout answers success but the token stays valid
    KeepSessionOnLogout,
    /// Logout answers `ok: false`
    LogoutNotOk,
    /// Logout answers an empty `session_id`
    LogoutWithoutSessionId,
    /// Invalid tokens get 401 instead of 400
    RejectWithUnauthorized,
    /// Any non-empty credential is authorized
    AcceptAnyCredential,
    /// Authorize omits `token_type`
    OmitTokenType,
    /// Authorize after logout hands out the logged-out token again
    ReissueAfterLogout,
    /// Protected resource accepts any bearer token, issued or not
    AcceptAnyBearer,
    /// Health path answers 503
    Unhealthy,
}

#[derive(Debug, Clone)]
struct LiveSession {
    session_id: String,
    client_id: String,
}

struct SessionStore {
    credential: Credential,
    fault: Fault,
    sessions: DashMap<String, LiveSession>,
    by_client: DashMap<String, String>,
    retired: DashMap<String, String>,
}

impl SessionStore {
    fn new(credential: Credential, fault: Fault) -> Self {
        Self {
            credential,
            fault,
            sessions: DashMap::new(),
            by_client: DashMap::new(),
            retired: DashMap::new(),
        }
    }

    fn issue(&self, client_id: &str) -> String {
        if self.fault != Fault::MintPerRequest {
            if let Some(entry) = self.by_client.get(client_id) {
                return entry.value().clone();
            }
        }

        let token = match self.retired.get(client_id) {
            Some(entry) if self.fault == Fault::ReissueAfterLogout => entry.value().clone(),
            _ => random_string(32),
        };

        self.sessions.insert(
            token.clone(),
            LiveSession {
                session_id: random_string(16),
                client_id: client_id.to_string(),
            },
        );
        self.by_client.insert(client_id.to_string(), token.clone());

        token
    }

    fn lookup(&self, token: &str) -> Option<LiveSession> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    fn end(&self, token: &str) -> Option<LiveSession> {
        if self.fault == Fault::KeepSessionOnLogout {
            return self.lookup(token);
        }

        let (_, session) = self.sessions.remove(token)?;
        self.by_client.remove(&session.client_id);
        self.retired.insert(session.client_id.clone(), token.to_string());

        Some(session)
    }

    fn rejection(&self) -> HttpResponse {
        let body = json!({ "error": "invalid token" });

        if self.fault == Fault::RejectWithUnauthorized {
            HttpResponse::Unauthorized().json(body)
        } else {
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn bearer(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[post("/authorize")]
async fn authorize(store: web::Data<SessionStore>, web::Json(payload): web::Json<Credential>) -> HttpResponse {
    if payload.client_id.is_empty() || payload.client_secret.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "missing credentials" }));
    }
    if store.fault != Fault::AcceptAnyCredential && payload != store.credential {
        return HttpResponse::Unauthorized().json(json!({ "error": "wrong credentials" }));
    }

    let token = store.issue(&payload.client_id);

    if store.fault == Fault::OmitTokenType {
        HttpResponse::Ok().json(json!({ "access_token": token }))
    } else {
        HttpResponse::Ok().json(json!({ "access_token": token, "token_type": "Bearer" }))
    }
}

#[get("/private")]
async fn private(store: web::Data<SessionStore>, request: HttpRequest) -> HttpResponse {
    let Some(token) = bearer(&request) else {
        return store.rejection();
    };

    match store.lookup(token) {
        Some(session) => HttpResponse::Ok().body(format!("Hello {}", session.client_id)),
        None if store.fault == Fault::AcceptAnyBearer => HttpResponse::Ok().body("Hello"),
        None => store.rejection(),
    }
}

#[post("/logout")]
async fn logout(store: web::Data<SessionStore>, request: HttpRequest) -> HttpResponse {
    let Some(session) = bearer(&request).and_then(|token| store.end(token)) else {
        return store.rejection();
    };

    let session_id = match store.fault {
        Fault::LogoutWithoutSessionId => String::new(),
        _ => session.session_id,
    };

    HttpResponse::Ok().json(json!({
        "session_id": session_id,
        "ok": store.fault != Fault::LogoutNotOk,
    }))
}

#[get("/")]
async fn health(store: web::Data<SessionStore>) -> HttpResponse {
    if store.fault == Fault::Unhealthy {
        HttpResponse::ServiceUnavailable().finish()
    } else {
        HttpResponse::Ok().body("hello")
    }
}

/// Session service bound to an ephemeral localhost port
///
/// Knows exactly one user, the fixture credential. Must be started inside an
/// actix system (`#[actix_web::test]`).
pub struct FakeSessionService {
    base_url: String,
    store: web::Data<SessionStore>,
    handle: ServerHandle,
}

impl FakeSessionService {
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(Fault::None).await
    }

    pub async fn start_with(fault: Fault) -> std::io::Result<Self> {
        let store = web::Data::new(SessionStore::new(Credential::fixture(), fault));
        let data = store.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .service(authorize)
                .service(private)
                .service(logout)
                .service(health)
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))?;

        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| std::io::Error::other("server bound no address"))?;

        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            base_url: format!("http://{}", addr),
            store,
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sessions issued and not yet logged out
    pub fn live_sessions(&self) -> usize {
        self.store.sessions.len()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
