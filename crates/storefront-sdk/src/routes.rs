//! Route table for the storefront API.
//!
//! Each route is a fixed verb plus a path template such as
//! `/users/{userId}/addresses/{addressId}`. Routes carry no behaviour of their
//! own; [`RouteCall`] renders the template and hands the call to the
//! [`Client`].

use crate::client::Client;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::request::{EndpointCall, RequestOptions, Verb};
use serde::Serialize;
use serde_json::Value;

/// A named endpoint of the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    /// Dotted name, e.g. `cart.add`.
    pub name: &'static str,
    /// HTTP verb.
    pub verb: Verb,
    /// Path template with `{param}` placeholders.
    pub template: &'static str,
}

impl Route {
    /// Declare a route.
    pub const fn new(name: &'static str, verb: Verb, template: &'static str) -> Self {
        Self {
            name,
            verb,
            template,
        }
    }

    /// Names of the template placeholders, in order.
    pub fn params(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            names.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        names
    }

    /// Fill the template. Values are percent-encoded as single path segments.
    pub fn render(&self, params: &[(String, String)]) -> Result<String> {
        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| Error::MissingParam {
                    route: self.name.to_string(),
                    name: name.to_string(),
                })?;

            path.push_str(&rest[..start]);
            path.push_str(&urlencoding::encode(value));
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);
        Ok(path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.name, self.verb, self.template)
    }
}

/// List products; accepts paging and filter query parameters.
pub const PRODUCTS_LIST: Route = Route::new("products.list", Verb::Get, "/products");
/// Fetch one product.
pub const PRODUCTS_GET: Route = Route::new("products.get", Verb::Get, "/products/{id}");
/// Create a product.
pub const PRODUCTS_CREATE: Route = Route::new("products.create", Verb::Post, "/products");
/// Replace a product.
pub const PRODUCTS_UPDATE: Route = Route::new("products.update", Verb::Put, "/products/{id}");
/// Delete a product.
pub const PRODUCTS_DELETE: Route = Route::new("products.delete", Verb::Delete, "/products/{id}");
/// Full-text product search (query parameter `q`).
pub const PRODUCTS_SEARCH: Route = Route::new("products.search", Verb::Get, "/products/search");

/// Fetch the current user's cart.
pub const CART_GET: Route = Route::new("cart.get", Verb::Get, "/cart");
/// Add a product to the cart.
pub const CART_ADD: Route = Route::new("cart.add", Verb::Post, "/cart/items");
/// Change the quantity of a cart item.
pub const CART_UPDATE: Route = Route::new("cart.update", Verb::Patch, "/cart/items/{itemId}");
/// Remove one cart item.
pub const CART_REMOVE: Route = Route::new("cart.remove", Verb::Delete, "/cart/items/{itemId}");
/// Empty the cart.
pub const CART_CLEAR: Route = Route::new("cart.clear", Verb::Delete, "/cart");

/// List orders.
pub const ORDERS_LIST: Route = Route::new("orders.list", Verb::Get, "/orders");
/// Fetch one order.
pub const ORDERS_GET: Route = Route::new("orders.get", Verb::Get, "/orders/{id}");
/// Place an order.
pub const ORDERS_CREATE: Route = Route::new("orders.create", Verb::Post, "/orders");
/// Cancel an order.
pub const ORDERS_CANCEL: Route = Route::new("orders.cancel", Verb::Patch, "/orders/{id}/cancel");

/// Exchange credentials for a token.
pub const AUTH_LOGIN: Route = Route::new("auth.login", Verb::Post, "/auth/login");
/// Create an account.
pub const AUTH_REGISTER: Route = Route::new("auth.register", Verb::Post, "/auth/register");
/// Invalidate the current token server-side.
pub const AUTH_LOGOUT: Route = Route::new("auth.logout", Verb::Post, "/auth/logout");
/// Fetch the signed-in user's profile.
pub const AUTH_PROFILE: Route = Route::new("auth.profile", Verb::Get, "/auth/profile");
/// Replace the signed-in user's profile.
pub const AUTH_UPDATE_PROFILE: Route =
    Route::new("auth.update_profile", Verb::Put, "/auth/profile");

/// Fetch a user.
pub const USERS_GET: Route = Route::new("users.get", Verb::Get, "/users/{id}");
/// Replace a user.
pub const USERS_UPDATE: Route = Route::new("users.update", Verb::Put, "/users/{id}");
/// List a user's addresses.
pub const USERS_ADDRESSES: Route =
    Route::new("users.addresses", Verb::Get, "/users/{userId}/addresses");
/// Add an address to a user.
pub const USERS_ADD_ADDRESS: Route =
    Route::new("users.add_address", Verb::Post, "/users/{userId}/addresses");
/// Replace one of a user's addresses.
pub const USERS_UPDATE_ADDRESS: Route = Route::new(
    "users.update_address",
    Verb::Put,
    "/users/{userId}/addresses/{addressId}",
);
/// Delete one of a user's addresses.
pub const USERS_DELETE_ADDRESS: Route = Route::new(
    "users.delete_address",
    Verb::Delete,
    "/users/{userId}/addresses/{addressId}",
);

/// Every route, grouped by resource.
pub const ROUTES: &[Route] = &[
    PRODUCTS_LIST,
    PRODUCTS_GET,
    PRODUCTS_CREATE,
    PRODUCTS_UPDATE,
    PRODUCTS_DELETE,
    PRODUCTS_SEARCH,
    CART_GET,
    CART_ADD,
    CART_UPDATE,
    CART_REMOVE,
    CART_CLEAR,
    ORDERS_LIST,
    ORDERS_GET,
    ORDERS_CREATE,
    ORDERS_CANCEL,
    AUTH_LOGIN,
    AUTH_REGISTER,
    AUTH_LOGOUT,
    AUTH_PROFILE,
    AUTH_UPDATE_PROFILE,
    USERS_GET,
    USERS_UPDATE,
    USERS_ADDRESSES,
    USERS_ADD_ADDRESS,
    USERS_UPDATE_ADDRESS,
    USERS_DELETE_ADDRESS,
];

/// Look a route up by name.
pub fn find(name: &str) -> Result<&'static Route> {
    ROUTES
        .iter()
        .find(|route| route.name == name)
        .ok_or_else(|| Error::UnknownRoute {
            name: name.to_string(),
        })
}

/// A call to a [`Route`] under construction.
pub struct RouteCall<'a> {
    client: &'a Client,
    route: Route,
    params: Vec<(String, String)>,
    options: RequestOptions,
    body: Option<Result<Value>>,
}

impl<'a> RouteCall<'a> {
    pub(crate) fn new(client: &'a Client, route: Route) -> Self {
        Self {
            client,
            route,
            params: Vec::new(),
            options: RequestOptions::default(),
            body: None,
        }
    }

    /// Set a path template parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.options = self.options.param(key, value);
        self
    }

    /// Replace the per-call options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the JSON body.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_value(body).map_err(|e| Error::encode(e.to_string())));
        self
    }

    /// Render the route into an endpoint call.
    pub fn build(self) -> Result<EndpointCall> {
        let path = self.route.render(&self.params)?;
        let mut call = EndpointCall::new(self.route.verb, path).with_options(self.options);
        if let Some(body) = self.body {
            call = call.with_body(body?);
        }
        Ok(call)
    }

    /// Send the call and return its envelope.
    pub async fn send(self) -> Envelope {
        let client = self.client;
        match self.build() {
            Ok(call) => client.call(call).await,
            Err(e) => Envelope::failure(&e),
        }
    }
}

impl std::fmt::Debug for RouteCall<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCall")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("options", &self.options)
            .finish()
    }
}

impl Client {
    /// Start a call to `route`.
    pub fn route(&self, route: &Route) -> RouteCall<'_> {
        RouteCall::new(self, *route)
    }
}
