//! Output line formatting for lookups.

use crate::geoip::CountryRecord;

/// Legacy `geoiplookup` prefix for the full output line.
const EDITION_PREFIX: &str = "GeoIP Country Edition";

/// Formats a lookup result for the command line.
///
/// Without field flags, produces the legacy line `GeoIP Country Edition: <iso>, <name>`,
/// or `GeoIP Country Edition: IP Address not found` when there is no ISO code.
///
/// With `want_iso` and/or `want_country`, produces only the requested fields
/// that have a value, ISO code first, joined with `", "`. This may be empty.
pub fn format_record(record: &CountryRecord, want_iso: bool, want_country: bool) -> String {
    if !want_iso && !want_country {
        return match record.iso_code() {
            Some(iso) => format!(
                "{}: {}, {}",
                EDITION_PREFIX,
                iso,
                record.country_name().unwrap_or_default()
            ),
            None => format!("{}: IP Address not found", EDITION_PREFIX),
        };
    }

    let mut fields = Vec::with_capacity(2);
    if want_iso {
        fields.extend(record.iso_code());
    }
    if want_country {
        fields.extend(record.country_name());
    }
    fields.join(", ")
}
