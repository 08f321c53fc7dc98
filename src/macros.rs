//! Crate-local logging macros, mirroring the `log` crate's level macros but
//! pinning `target` to `"lumen"` so filtering in `main`'s `fern::Dispatch`
//! doesn't depend on the caller's module path.

#[macro_export]
macro_rules! lumen_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "lumen", $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "lumen", $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_info {
    ($($arg:tt)*) => {
        log::info!(target: "lumen", $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "lumen", $($arg)*)
    };
}

#[macro_export]
macro_rules! lumen_error {
    ($($arg:tt)*) => {
        log::error!(target: "lumen", $($arg)*)
    };
}

/// Runs `$result`, logging and panicking on `Err`. For setup-time failures
/// that leave the process with nothing sensible to do (see `SceneError`,
/// `RenderError` for the failures that instead propagate as `Result`).
#[macro_export]
macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                let err = format!("{}: {}", $msg, why);
                $crate::lumen_error!("{}", err);
                panic!("{}", err);
            }
        }
    };
}
