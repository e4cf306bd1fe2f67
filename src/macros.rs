//! A small handful of helper macros

#[cfg(test)]
use std::sync::atomic::AtomicBool;

// Checks an internal invariant of the tree. A failure here is a bug in the algorithm itself, never
// something the caller did, so the only sensible response is to stop with a message that says
// which check failed.
macro_rules! invariant {
    ($cond:expr $(,)?) => {{
        if !$cond {
            panic!(concat!("figtree invariant violated: ", stringify!($cond)));
        }
    }};
    ($cond:expr, $($arg:tt)+) => {{
        if !$cond {
            panic!($($arg)+);
        }
    }};
}

// Like `invariant!`, but only checked with debug assertions enabled. Used for the checks that
// would otherwise cost a scan over a node on every step.
macro_rules! weak_invariant {
    ($($tt:tt)*) => {{
        if cfg!(debug_assertions) {
            invariant!($($tt)*);
        }
    }};
}

#[cfg(test)]
pub(crate) static DEBUG: AtomicBool = AtomicBool::new(false);

#[cfg(test)]
macro_rules! enable_debug {
    () => {{
        $crate::macros::DEBUG.store(true, std::sync::atomic::Ordering::SeqCst);
    }};
}

#[cfg(test)]
macro_rules! disable_debug {
    () => {{
        $crate::macros::DEBUG.store(false, std::sync::atomic::Ordering::SeqCst);
    }};
}

macro_rules! debug_println {
    ($($args:tt)*) => {
        #[cfg(test)]
        {
            if $crate::macros::DEBUG.load(std::sync::atomic::Ordering::SeqCst) {
                println!($($args)*);
            }
        };
    };
}
