#[cfg(unix)]
pub(crate) mod ace_step;
pub(crate) mod http_api;
