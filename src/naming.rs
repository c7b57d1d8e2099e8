//! Naming conventions the pass keys on.
//!
//! Everything here is a plain string test. A name can match without being a
//! real access-controlled component, hook or request creator.

use once_cell::sync::Lazy;
use regex::Regex;

const AC_PREFIX: &str = "Ac";
const AC_SOME_PREFIX: &str = "AcSome";

static USE_REQUEST_HOOK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"use[0-9A-Za-z_]*Request").expect("valid hook regex"));
static CREATE_REQUEST_METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"create[0-9A-Za-z_]*Request").expect("valid creator regex"));

/// Which guard a declaration name asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `Ac…` / `AcEvery…`: every listed permission is required.
    Every,
    /// `AcSome…`: one of the listed permissions is enough.
    Some,
    None,
}

/// `AcSome` is tested before the general `Ac` prefix, which would also match it.
pub fn classify(name: &str) -> Classification {
    if name.starts_with(AC_SOME_PREFIX) {
        Classification::Some
    } else if name.starts_with(AC_PREFIX) {
        Classification::Every
    } else {
        Classification::None
    }
}

pub fn is_access_control_component(name: &str) -> bool {
    classify(name) != Classification::None
}

/// `useRequest`, `useTempDataForRequest`, ...
pub fn is_use_request_hook(callee: &str) -> bool {
    USE_REQUEST_HOOK.is_match(callee)
}

/// `createRequest`, `createXXXRequest`, ...
pub fn is_create_request_method(callee: &str) -> bool {
    CREATE_REQUEST_METHOD.is_match(callee)
}

pub fn is_request_reference(callee: &str) -> bool {
    is_use_request_hook(callee) || is_create_request_method(callee)
}
