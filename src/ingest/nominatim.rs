/// OSM Nominatim reverse-geocoding URL construction.
///
/// The service does not perform the lookup itself — it hands the caller a
/// ready-made reverse-geocode URL for the reading's coordinates, so a
/// dashboard can resolve a human-readable address on demand without this
/// service carrying the rate-limit budget.

const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Builds the JSON reverse-geocode lookup URL for a coordinate pair.
pub fn build_reverse_geocode_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{}/reverse?format=json&lat={}&lon={}",
        NOMINATIM_BASE_URL, latitude, longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_geocode_url_format() {
        let url = build_reverse_geocode_url(-22.9068, -43.1729);
        assert_eq!(
            url,
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=-22.9068&lon=-43.1729"
        );
    }

    #[test]
    fn test_reverse_geocode_url_handles_integral_coordinates() {
        let url = build_reverse_geocode_url(0.0, 90.0);
        assert!(url.contains("lat=0"));
        assert!(url.contains("lon=90"));
    }
}
