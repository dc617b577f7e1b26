// ── Zone-relative name handling ──
//
// Record sets are addressed by their name relative to the zone apex.
// `record_set_name` is what every write and delete path goes through;
// it accepts absolute names (trailing dot optional), already-relative
// names, and the bare/`@` apex spellings.

/// Make `fqdn` relative to `zone` by suffix-stripping. Returns the
/// input unchanged when the zone is not a suffix.
fn relative_name(fqdn: &str, zone: &str) -> String {
    let fqdn = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let zone = zone.strip_suffix('.').unwrap_or(zone);
    let relative = fqdn.strip_suffix(zone).unwrap_or(fqdn);
    let relative = relative.strip_suffix('.').unwrap_or(relative);
    relative.to_owned()
}

/// Zone-relative record set name: strip at most one trailing dot, drop
/// the zone suffix, and spell the apex as `@` when nothing remains.
pub(crate) fn record_set_name(name: &str, zone: &str) -> String {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    let relative = relative_name(&format!("{trimmed}."), zone);
    if relative.is_empty() {
        "@".to_owned()
    } else {
        relative
    }
}

/// Zone name as it appears in resource paths: one trailing dot
/// stripped, nothing else changed.
pub(crate) fn zone_name(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}
