// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod flow;
pub mod storage;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState, EndpointError, EncryptedResponse, RequestHandler};
pub use config::EndpointConfig;
pub use crypto::{CryptoError, EncryptedEnvelope, FlowPrivateKey, SessionKeyMaterial};
pub use flow::{DecryptedBody, FlowError, ScheduleCatalog, ScreenResolver};
pub use storage::{open_store, JsonFileStore, MemoryStore, Store, StoreError};
