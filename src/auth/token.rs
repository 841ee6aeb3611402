use rand::Rng;

/// Lowest token value handed out
pub const TOKEN_MIN: i32 = 1;

/// Exclusive upper bound of the token range
pub const TOKEN_MAX_EXCLUSIVE: i32 = 2_147_483_644;

/// Draw an email verification token uniformly from `[TOKEN_MIN, TOKEN_MAX_EXCLUSIVE)`
pub fn generate_verification_token() -> i32 {
    rand::rngs::OsRng.gen_range(TOKEN_MIN..TOKEN_MAX_EXCLUSIVE)
}

/// Parse a token taken from a URL path; anything outside the range is not a token
pub fn parse_verification_token(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|token| (TOKEN_MIN..TOKEN_MAX_EXCLUSIVE).contains(token))
}
