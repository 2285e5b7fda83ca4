//! Per-resource handles over the route table.

use crate::client::Client;
use crate::envelope::Envelope;
use crate::request::RequestOptions;
use crate::routes::{
    AUTH_LOGIN, AUTH_LOGOUT, AUTH_PROFILE, AUTH_REGISTER, AUTH_UPDATE_PROFILE, CART_ADD,
    CART_CLEAR, CART_GET, CART_REMOVE, CART_UPDATE, ORDERS_CANCEL, ORDERS_CREATE, ORDERS_GET,
    ORDERS_LIST, PRODUCTS_CREATE, PRODUCTS_DELETE, PRODUCTS_GET, PRODUCTS_LIST, PRODUCTS_SEARCH,
    PRODUCTS_UPDATE, USERS_ADDRESSES, USERS_ADD_ADDRESS, USERS_DELETE_ADDRESS, USERS_GET,
    USERS_UPDATE, USERS_UPDATE_ADDRESS,
};
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;

impl Client {
    /// Product catalogue endpoints.
    pub fn products(&self) -> Products<'_> {
        Products { client: self }
    }

    /// Shopping cart endpoints.
    pub fn cart(&self) -> Cart<'_> {
        Cart { client: self }
    }

    /// Order endpoints.
    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    /// User and address endpoints.
    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }
}

/// Product catalogue.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a Client,
}

impl Products<'_> {
    /// List products.
    pub async fn list(&self, options: RequestOptions) -> Envelope {
        self.client.route(&PRODUCTS_LIST).options(options).send().await
    }

    /// Fetch one product.
    pub async fn get(&self, id: impl Display) -> Envelope {
        self.client.route(&PRODUCTS_GET).param("id", id).send().await
    }

    /// Create a product.
    pub async fn create<B: Serialize + ?Sized>(&self, product: &B) -> Envelope {
        self.client.route(&PRODUCTS_CREATE).body(product).send().await
    }

    /// Replace a product.
    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, product: &B) -> Envelope {
        self.client
            .route(&PRODUCTS_UPDATE)
            .param("id", id)
            .body(product)
            .send()
            .await
    }

    /// Delete a product.
    pub async fn delete(&self, id: impl Display) -> Envelope {
        self.client.route(&PRODUCTS_DELETE).param("id", id).send().await
    }

    /// Search products by free text.
    pub async fn search(&self, query: impl Display) -> Envelope {
        self.client.route(&PRODUCTS_SEARCH).query("q", query).send().await
    }
}

/// Shopping cart.
#[derive(Debug, Clone, Copy)]
pub struct Cart<'a> {
    client: &'a Client,
}

impl Cart<'_> {
    /// Fetch the cart.
    pub async fn get(&self) -> Envelope {
        self.client.route(&CART_GET).send().await
    }

    /// Add `quantity` units of a product.
    pub async fn add(&self, product_id: impl Display, quantity: u32) -> Envelope {
        let body = json!({
            "productId": product_id.to_string(),
            "quantity": quantity
        });
        self.client.route(&CART_ADD).body(&body).send().await
    }

    /// Add a single unit of a product.
    pub async fn add_one(&self, product_id: impl Display) -> Envelope {
        self.add(product_id, 1).await
    }

    /// Set the quantity of a cart item.
    pub async fn update(&self, item_id: impl Display, quantity: u32) -> Envelope {
        self.client
            .route(&CART_UPDATE)
            .param("itemId", item_id)
            .body(&json!({ "quantity": quantity }))
            .send()
            .await
    }

    /// Remove a cart item.
    pub async fn remove(&self, item_id: impl Display) -> Envelope {
        self.client.route(&CART_REMOVE).param("itemId", item_id).send().await
    }

    /// Empty the cart.
    pub async fn clear(&self) -> Envelope {
        self.client.route(&CART_CLEAR).send().await
    }
}

/// Orders.
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a Client,
}

impl Orders<'_> {
    /// List orders.
    pub async fn list(&self, options: RequestOptions) -> Envelope {
        self.client.route(&ORDERS_LIST).options(options).send().await
    }

    /// Fetch one order.
    pub async fn get(&self, id: impl Display) -> Envelope {
        self.client.route(&ORDERS_GET).param("id", id).send().await
    }

    /// Place an order.
    pub async fn create<B: Serialize + ?Sized>(&self, order: &B) -> Envelope {
        self.client.route(&ORDERS_CREATE).body(order).send().await
    }

    /// Cancel an order.
    pub async fn cancel(&self, id: impl Display) -> Envelope {
        self.client.route(&ORDERS_CANCEL).param("id", id).send().await
    }
}

/// Authentication.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    client: &'a Client,
}

impl Auth<'_> {
    /// Log in. Storing the returned token is up to the caller.
    pub async fn login<B: Serialize + ?Sized>(&self, credentials: &B) -> Envelope {
        self.client.route(&AUTH_LOGIN).body(credentials).send().await
    }

    /// Register a new account.
    pub async fn register<B: Serialize + ?Sized>(&self, user: &B) -> Envelope {
        self.client.route(&AUTH_REGISTER).body(user).send().await
    }

    /// Log out on the server.
    pub async fn logout(&self) -> Envelope {
        self.client.route(&AUTH_LOGOUT).send().await
    }

    /// Fetch the signed-in profile.
    pub async fn profile(&self) -> Envelope {
        self.client.route(&AUTH_PROFILE).send().await
    }

    /// Replace the signed-in profile.
    pub async fn update_profile<B: Serialize + ?Sized>(&self, profile: &B) -> Envelope {
        self.client.route(&AUTH_UPDATE_PROFILE).body(profile).send().await
    }
}

/// Users and their addresses.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a Client,
}

impl Users<'_> {
    /// Fetch a user.
    pub async fn get(&self, id: impl Display) -> Envelope {
        self.client.route(&USERS_GET).param("id", id).send().await
    }

    /// Replace a user.
    pub async fn update<B: Serialize + ?Sized>(&self, id: impl Display, user: &B) -> Envelope {
        self.client
            .route(&USERS_UPDATE)
            .param("id", id)
            .body(user)
            .send()
            .await
    }

    /// List a user's addresses.
    pub async fn addresses(&self, user_id: impl Display) -> Envelope {
        self.client
            .route(&USERS_ADDRESSES)
            .param("userId", user_id)
            .send()
            .await
    }

    /// Add an address.
    pub async fn add_address<B: Serialize + ?Sized>(
        &self,
        user_id: impl Display,
        address: &B,
    ) -> Envelope {
        self.client
            .route(&USERS_ADD_ADDRESS)
            .param("userId", user_id)
            .body(address)
            .send()
            .await
    }

    /// Replace an address.
    pub async fn update_address<B: Serialize + ?Sized>(
        &self,
        user_id: impl Display,
        address_id: impl Display,
        address: &B,
    ) -> Envelope {
        self.client
            .route(&USERS_UPDATE_ADDRESS)
            .param("userId", user_id)
            .param("addressId", address_id)
            .body(address)
            .send()
            .await
    }

    /// Delete an address.
    pub async fn delete_address(
        &self,
        user_id: impl Display,
        address_id: impl Display,
    ) -> Envelope {
        self.client
            .route(&USERS_DELETE_ADDRESS)
            .param("userId", user_id)
            .param("addressId", address_id)
            .send()
            .await
    }
}
