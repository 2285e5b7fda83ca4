//! # Storefront SDK
//!
//! An async Rust client for the storefront REST API.
//!
//! ## Features
//!
//! - One shared `reqwest` client with a fixed base URL and timeout
//! - Bearer credentials read from an injected [`Session`] on every call
//! - Session teardown (clear credential, navigate to login) on any 401
//! - Every verb operation returns an [`Envelope`] instead of an error
//! - A data-driven [route table](routes) for products, cart, orders, auth
//!   and users
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storefront_sdk::{Client, RequestOptions, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), storefront_sdk::Error> {
//!     let session = Session::in_memory();
//!     let client = Client::builder()
//!         .base_url("http://localhost:3000")
//!         .session(session.clone())
//!         .build()?;
//!
//!     let login = client
//!         .auth()
//!         .login(&serde_json::json!({"email": "a@b.c", "password": "pw"}))
//!         .await;
//!     if let Some(token) = login.data().and_then(|d| d["token"].as_str()) {
//!         session.sign_in(token);
//!     }
//!
//!     let cart = client.cart().add("p1", 2).await;
//!     println!("{}: {}", cart.is_success(), cart.message());
//!
//!     let products = client
//!         .get("/products", RequestOptions::new().param("page", 1))
//!         .await;
//!     match products.into_result() {
//!         Ok(data) => println!("{}", data),
//!         Err(failure) => eprintln!("{}", failure),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod client;
mod config;
mod envelope;
mod error;
mod request;
mod resources;
pub mod routes;
mod session;

pub use client::{Client, ClientBuilder, REQUEST_ID_HEADER};
pub use config::{ClientConfig, BASE_URL_ENV, FALLBACK_BASE_URL};
pub use envelope::{
    resolve_message, Envelope, Failure, DEFAULT_ERROR_MESSAGE, DEFAULT_SUCCESS_MESSAGE,
};
pub use error::{Error, Result};
pub use request::{EndpointCall, RequestOptions, Verb};
pub use resources::{Auth, Cart, Orders, Products, Users};
pub use routes::{Route, RouteCall};
pub use session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Navigator, NoopCredentialStore,
    NoopNavigator, Session, TOKEN_KEY,
};

pub use secrecy::{ExposeSecret, SecretString};
