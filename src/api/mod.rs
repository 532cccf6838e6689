// SPDX-License-Identifier: MPL-2.0

mod client;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod response;
mod types;

pub use client::{ApiRequest, Backend, HttpBackend, RemoteError};
#[cfg(any(test, feature = "testing"))]
pub use memory::{InMemoryBackend, ListStyle};
pub use response::{Resource, ResponseShape};
pub use types::{
    BlogPost, NewWriter, PostFilter, PostList, PostPayload, SocialLinks, WriterList, WriterRecord,
    WriterRef, WriterUpdate,
};
