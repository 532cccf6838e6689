// SPDX-License-Identifier: MPL-2.0

#![allow(dead_code)]

use inkpost::api::{InMemoryBackend, ListStyle};
use inkpost::{BlogClient, MemoryStore, SharedStore, SignUpForm};
use std::sync::Arc;

pub const BODY: &str =
    "Fifty characters is the floor for a post body, and this one clears it easily.";

pub struct TestClient {
    pub client: BlogClient<InMemoryBackend>,
    pub store: SharedStore,
}

pub fn client(style: ListStyle) -> TestClient {
    let store: SharedStore = Arc::new(MemoryStore::new());
    TestClient {
        client: BlogClient::with_backend(InMemoryBackend::with_style(style), store.clone()),
        store,
    }
}

pub fn sign_up_form(name: &str, email: &str, password: &str) -> SignUpForm {
    SignUpForm {
        name: name.into(),
        email: email.into(),
        password: password.into(),
        confirm_password: password.into(),
    }
}

/// Register and sign in, returning the writer id.
pub async fn signed_in(client: &BlogClient<InMemoryBackend>, email: &str) -> String {
    let writer = client
        .credentials()
        .sign_up(&sign_up_form("Ada", email, "Secret123"))
        .await
        .unwrap();
    client
        .credentials()
        .sign_in(email, "Secret123")
        .await
        .unwrap();
    writer.id
}
