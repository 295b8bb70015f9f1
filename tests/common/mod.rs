#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::Secret;
use serde_json::{json, Value};
use uuid::Uuid;

use spendwise::analytics::filter::TransactionFilter;
use spendwise::auth::models::{NewUser, TokenClaims, User};
use spendwise::auth::AuthSettings;
use spendwise::category::models::{Category, NewCategory};
use spendwise::category::service::CategoryService;
use spendwise::errors::AppError;
use spendwise::store::{
    CategoryStore, MemoryStore, Store, TransactionStore, UserStore,
};
use spendwise::transaction::models::{NewTransaction, Transaction, TransactionType};
use spendwise::{configure_api, configure_auth};

static JWT_SECRET: &str = "test_jwt_secret_for_integration_tests";

pub const PASSWORD: &str = "demo123";

pub struct TestApp {
    pub store: Arc<dyn Store>,
    settings: AuthSettings,
}

pub struct TestResponse {
    status: u16,
    content_type: Option<String>,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("Response body is not UTF-8")
    }
}

impl TestApp {
    /// App over a fresh in-memory store with the default categories.
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        CategoryService::seed_defaults(store.as_ref())
            .await
            .expect("Failed to seed categories");
        Self::with_store(store)
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        TestApp {
            store,
            settings: AuthSettings::new(Secret::new(JWT_SECRET.to_string()), 1),
        }
    }

    async fn send(&self, req: test::TestRequest) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(self.store.clone()))
                .app_data(web::Data::new(self.settings.clone()))
                .configure(configure_api)
                .configure(configure_auth),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = test::read_body(resp).await;

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    fn with_token(req: test::TestRequest, token: Option<&str>) -> test::TestRequest {
        match token {
            Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
            None => req,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(test::TestRequest::get().uri(path), token);
        self.send(req).await
    }

    pub async fn post(&self, path: &str, payload: &Value, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(test::TestRequest::post().uri(path), token).set_json(payload);
        self.send(req).await
    }

    pub async fn put(&self, path: &str, payload: &Value, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(test::TestRequest::put().uri(path), token).set_json(payload);
        self.send(req).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let req = Self::with_token(test::TestRequest::delete().uri(path), token);
        self.send(req).await
    }

    /// Register `username` and return a bearer token for it.
    pub async fn login_as(&self, username: &str) -> String {
        let register = self
            .post(
                "/register",
                &json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD
                }),
                None,
            )
            .await;
        assert_eq!(register.status(), 201, "Registration should succeed");

        let login = self
            .post(
                "/login",
                &json!({"username": username, "password": PASSWORD}),
                None,
            )
            .await;
        assert_eq!(login.status(), 200, "Login should succeed");

        login.json().await["token"]
            .as_str()
            .expect("Login should return a token")
            .to_string()
    }

    /// A valid token for an arbitrary user id, without touching the store.
    pub fn token_for(&self, user_id: Uuid) -> String {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = TokenClaims {
            sub: user_id,
            username: "ghost".to_string(),
            iat: now,
            exp: now + 3600,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Id of a seeded or created category by name and type.
    pub async fn category_id(&self, token: &str, name: &str, kind: &str) -> String {
        let body = self
            .get(&format!("/categories?type={kind}"), Some(token))
            .await
            .json()
            .await;

        body["categories"]
            .as_array()
            .expect("categories should be an array")
            .iter()
            .find(|c| c["name"] == name)
            .and_then(|c| c["id"].as_str())
            .unwrap_or_else(|| panic!("No {kind} category named {name}"))
            .to_string()
    }

    pub async fn create_category(&self, token: &str, name: &str, kind: &str) -> String {
        let response = self
            .post(
                "/categories",
                &json!({"name": name, "type": kind}),
                Some(token),
            )
            .await;
        assert_eq!(response.status(), 201, "Category creation should succeed");

        response.json().await["category"]["id"]
            .as_str()
            .expect("Category should have an id")
            .to_string()
    }

    /// Record a transaction and return its id.
    pub async fn add_transaction(
        &self,
        token: &str,
        date: &str,
        category_id: &str,
        amount: f64,
        kind: &str,
    ) -> String {
        let response = self
            .post(
                "/transactions",
                &json!({
                    "date": date,
                    "category_id": category_id,
                    "description": format!("{kind} on {date}"),
                    "amount": amount,
                    "type": kind
                }),
                Some(token),
            )
            .await;
        assert_eq!(response.status(), 201, "Transaction creation should succeed");

        response.json().await["transaction"]["id"]
            .as_str()
            .expect("Transaction should have an id")
            .to_string()
    }
}

/// A store whose backend is always down.
pub struct UnavailableStore;

fn down<T>() -> Result<T, AppError> {
    Err(AppError::StoreUnavailable("connection refused".to_string()))
}

#[async_trait]
impl UserStore for UnavailableStore {
    async fn create_user(&self, _user: NewUser) -> Result<User, AppError> {
        down()
    }

    async fn find_user_by_username(&self, _username: &str) -> Result<Option<User>, AppError> {
        down()
    }

    async fn get_user(&self, _id: Uuid) -> Result<Option<User>, AppError> {
        down()
    }
}

#[async_trait]
impl CategoryStore for UnavailableStore {
    async fn list_categories(
        &self,
        _category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        down()
    }

    async fn get_category(&self, _id: Uuid) -> Result<Option<Category>, AppError> {
        down()
    }

    async fn create_category(&self, _category: NewCategory) -> Result<Category, AppError> {
        down()
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        down()
    }
}

#[async_trait]
impl TransactionStore for UnavailableStore {
    async fn query(
        &self,
        _owner_id: Uuid,
        _filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        down()
    }

    async fn insert(
        &self,
        _owner_id: Uuid,
        _transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        down()
    }

    async fn replace(
        &self,
        _owner_id: Uuid,
        _id: Uuid,
        _transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        down()
    }

    async fn delete(&self, _owner_id: Uuid, _id: Uuid) -> Result<(), AppError> {
        down()
    }
}

#[async_trait]
impl Store for UnavailableStore {
    async fn ping(&self) -> Result<(), AppError> {
        down()
    }
}
