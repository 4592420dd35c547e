use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use icapture_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use icapture_server::state::AppState;

pub mod routes {
    pub const ADMIN_LOGIN: &str = "/api/v1/auth/admin/login";
    pub const PARTICIPANT_LOGIN: &str = "/api/v1/auth/participant/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const COLLEGES: &str = "/api/v1/colleges";
    pub const PARTICIPANTS: &str = "/api/v1/participants";
    pub const UPLOADS: &str = "/api/v1/uploads";

    pub fn college(id: i32) -> String {
        format!("/api/v1/colleges/{id}")
    }

    pub fn participant(id: i32) -> String {
        format!("/api/v1/participants/{id}")
    }

    pub fn participant_uploads(id: i32) -> String {
        format!("/api/v1/participants/{id}/uploads")
    }

    pub fn upload(id: i32) -> String {
        format!("/api/v1/uploads/{id}")
    }

    pub fn file(folder: &str, filename: &str) -> String {
        format!("/api/v1/files/{folder}/{filename}")
    }
}

/// A running test server backed by a temp-dir SQLite file and uploads root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    pub uploads_root: PathBuf,
    _tmp: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = tmp.path().join("portal.db");
        let uploads_root = tmp.path().join("uploads");
        tokio::fs::create_dir_all(&uploads_root)
            .await
            .expect("Failed to create uploads root");

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = icapture_server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url.clone(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                default_admin_username: "admin".to_string(),
                default_admin_password: "admin123".to_string(),
            },
            storage: StorageConfig {
                uploads_root: uploads_root.clone(),
            },
        };

        icapture_server::seed::seed_default_admin(&db, &config.auth)
            .await
            .expect("Failed to seed default admin");

        let state = AppState::new(db, config);
        let app = icapture_server::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            state,
            uploads_root,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Send a multipart upload with the given filename, bytes, and MIME type.
    pub async fn upload_with_token(
        &self,
        file_name: &str,
        file_bytes: Vec<u8>,
        mime: &str,
        token: &str,
    ) -> TestResponse {
        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Failed to set MIME type");
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(self.url(routes::UPLOADS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Log in with the seeded admin account and return the session token.
    pub async fn login_admin(&self) -> String {
        let res = self
            .post_without_token(
                routes::ADMIN_LOGIN,
                &serde_json::json!({"username": "admin", "password": "admin123"}),
            )
            .await;
        assert_eq!(res.status, 200, "Admin login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Log in as a participant and return the session token.
    pub async fn login_participant(&self, code: &str, phone: &str) -> String {
        let res = self
            .post_without_token(
                routes::PARTICIPANT_LOGIN,
                &serde_json::json!({"code": code, "phone": phone}),
            )
            .await;
        assert_eq!(res.status, 200, "Participant login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a college via the API and return its `id`.
    pub async fn create_college(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_with_token(routes::COLLEGES, &serde_json::json!({"name": name}), token)
            .await;
        assert_eq!(res.status, 201, "create_college failed: {}", res.text);
        res.id()
    }

    /// Create a participant via the API and return its `id`.
    pub async fn create_participant(
        &self,
        token: &str,
        code: &str,
        name: &str,
        phone: &str,
        college_id: i32,
    ) -> i32 {
        let res = self
            .post_with_token(
                routes::PARTICIPANTS,
                &serde_json::json!({
                    "code": code,
                    "name": name,
                    "phone": phone,
                    "college_id": college_id,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_participant failed: {}", res.text);
        res.id()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
