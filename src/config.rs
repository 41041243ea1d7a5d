//! Crate-wide tunable constants.
//!
//! Follows the teacher engine's own style for compile-time tunables
//! (`ALEX_CHUNK_UPPER_LIMIT` / `ALEX_CHUNK_LOWER_LIMIT`, resolved once via
//! `option_env!`): fixed defaults, overridable at build time, checked only
//! where it matters for debugging rather than threaded through every call.

/// Required alignment, in bytes, of every dense array: the `ids` column and
/// every per-field component column. The storage model fixes this at one
/// cache line rather than detecting it at runtime.
pub const CACHE_LINE_SIZE: usize = 64;

/// Debug-build ceiling on the number of distinct archetypes a `World` is
/// expected to accumulate. Archetype count should be bounded by a program's
/// distinct component mixes, not by its entity count; exceeding this is
/// almost always a sign that a caller is generating a fresh signature per
/// entity (e.g. including an always-unique tag component). Has no effect in
/// release builds and never changes behavior, only the debug assertion.
fn max_archetypes_hint() -> usize {
    option_env!("ARCHETYPE_ECS_MAX_ARCHETYPES")
        .and_then(|s| s.parse().ok())
        .unwrap_or(4096)
}

#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub(crate) fn debug_check_archetype_count(count: usize) {
    #[cfg(debug_assertions)]
    {
        let limit = max_archetypes_hint();
        debug_assert!(
            count <= limit,
            "archetype count {} exceeds debug guard {} (set ARCHETYPE_ECS_MAX_ARCHETYPES to raise it)",
            count,
            limit,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_line_is_64_bytes() {
        assert_eq!(CACHE_LINE_SIZE, 64);
    }

    #[test]
    fn archetype_count_guard_does_not_panic_under_limit() {
        debug_check_archetype_count(1);
        debug_check_archetype_count(max_archetypes_hint());
    }
}
