//! Output macros shared by the whole application.
//!
//! Each macro takes a [`Message`](super::Message) (or anything `Display`).
//! With `TASKBELL_DEBUG` or `RUST_LOG` set the text becomes a `tracing` event
//! at the matching level, which is what the background worker relies on for a
//! timestamped log. Otherwise it is printed with an emoji prefix; errors go to
//! stderr.
//!
//! Passing `true` as a second argument surrounds the line with blank lines,
//! used for section headers above tables.
//!
//! ```rust,ignore
//! use taskbell::libs::messages::Message;
//! use taskbell::{msg_error, msg_success};
//!
//! msg_success!(Message::TaskCreated(12));
//! msg_error!(Message::TaskNotFound(3));
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether output is routed to `tracing`. Read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("TASKBELL_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $console:ident, $prefix:literal, $msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            ::tracing::$level!("{}{}", $prefix, $msg);
        } else {
            $console!("{}{}", $prefix, $msg);
        }
    };
    ($level:ident, $console:ident, $prefix:literal, $msg:expr, padded) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            ::tracing::$level!("\n{}{}\n", $prefix, $msg);
        } else {
            $console!("\n{}{}\n", $prefix, $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, eprintln, "⚠️ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(warn, eprintln, "⚠️ ", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg, padded)
    };
}

/// Silent unless debug mode is on.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            ::tracing::debug!("{}", $msg);
        }
    };
}

/// `anyhow::Error` carrying the message text.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        ::anyhow::anyhow!("{}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        return ::std::result::Result::Err($crate::msg_error_anyhow!($msg))
    };
}
