use uuid::Uuid;

pub(crate) const ACCESS_CODE_LEN: usize = 6;

/// Short uppercase code students type to join a quiz. Taken from a fresh v4 UUID, so it is
/// random but not unique by construction.
pub(crate) fn generate_access_code() -> String {
    Uuid::new_v4().simple().to_string()[..ACCESS_CODE_LEN].to_ascii_uppercase()
}

/// Generates codes until one differs from `previous`.
pub(crate) fn generate_distinct_from(previous: &str) -> String {
    loop {
        let code = generate_access_code();
        if !code.eq_ignore_ascii_case(previous) {
            return code;
        }
    }
}
