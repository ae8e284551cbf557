//! Build metadata generated by the build script

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// `User-Agent` sent with every GitHub request
pub fn user_agent() -> String {
    format!("repofuncs/{} ({})", env!("CARGO_PKG_VERSION"), GIT_HASH)
}

/// Long `--version` text
pub fn long_version() -> String {
    format!(
        "{} (git {}, built {})",
        env!("CARGO_PKG_VERSION"),
        GIT_HASH,
        BUILD_TIME
    )
}
