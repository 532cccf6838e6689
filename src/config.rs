// SPDX-License-Identifier: MPL-2.0

pub const APP_ID: &str = "io.github.sethcottle.Inkpost";

#[cfg(feature = "devel")]
pub const IS_DEVEL: bool = true;
#[cfg(not(feature = "devel"))]
pub const IS_DEVEL: bool = false;

pub const DEFAULT_API_BASE: &str = "https://seid-blog-website.onrender.com/api";

pub const BLOGS_ENDPOINT: &str = "/blog";
pub const WRITERS_ENDPOINT: &str = "/writer";

pub const HOME_PATH: &str = "/";
pub const SIGN_IN_PATH: &str = "/auth/sign-in";
pub const SIGN_UP_PATH: &str = "/auth/sign-up";

/// Route of a writer's own editor.
pub fn authoring_path(writer_id: &str) -> String {
    format!("/blog/{writer_id}/write")
}

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if IS_DEVEL { "inkpost=debug" } else { "inkpost=info" }
}
