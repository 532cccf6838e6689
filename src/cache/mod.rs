// SPDX-License-Identifier: MPL-2.0

mod resource;
mod signature;
mod view;

pub use resource::{CachedValue, DEFAULT_MAX_ENTRIES, ResourceCache};
pub use signature::{QuerySignature, Tag, invalidates};
pub use view::{ViewEpoch, ViewTicket};
