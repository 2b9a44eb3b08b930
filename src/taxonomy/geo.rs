//! Country Geo-Enricher
//! Approximate country centroids used to place startups on a map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Latitude / longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const ORIGIN: Coordinates = Coordinates { lat: 0.0, lon: 0.0 };

    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Country name (exact spelling) -> centroid.
pub const COUNTRY_COORDS: [(&str, Coordinates); 30] = [
    ("Palestine", Coordinates::new(31.9522, 35.2332)),
    ("SaudiArabia", Coordinates::new(23.8859, 45.0792)),
    ("Indonesia", Coordinates::new(-0.7893, 113.9213)),
    ("Malaysia", Coordinates::new(4.2105, 101.9758)),
    ("Canada", Coordinates::new(56.1304, -106.3468)),
    ("UnitedKingdom", Coordinates::new(55.3781, -3.4360)),
    ("UnitedStates", Coordinates::new(37.0902, -95.7129)),
    ("Nigeria", Coordinates::new(9.0820, 8.6753)),
    ("India", Coordinates::new(20.5937, 78.9629)),
    ("UnitedArabEmirates", Coordinates::new(23.4241, 53.8478)),
    ("Singapore", Coordinates::new(1.3521, 103.8198)),
    ("Namibia", Coordinates::new(-22.9576, 18.4904)),
    ("Pakistan", Coordinates::new(30.3753, 69.3451)),
    ("Uzbekistan", Coordinates::new(41.3775, 64.5853)),
    ("Zambia", Coordinates::new(-13.1339, 27.8493)),
    ("France", Coordinates::new(46.2276, 2.2137)),
    ("Malawi", Coordinates::new(-13.2543, 34.3015)),
    ("Austria", Coordinates::new(47.5162, 14.5501)),
    ("SouthAfrica", Coordinates::new(-30.5595, 22.9375)),
    ("Turkey", Coordinates::new(38.9637, 35.2433)),
    ("Bangladesh", Coordinates::new(23.6850, 90.3563)),
    ("Switzerland", Coordinates::new(46.8182, 8.2275)),
    ("Qatar", Coordinates::new(25.3548, 51.1839)),
    ("Egypt", Coordinates::new(26.8206, 30.8025)),
    ("Morocco", Coordinates::new(31.7917, -7.0926)),
    ("Brunei", Coordinates::new(4.5353, 114.7277)),
    ("Germany", Coordinates::new(51.1657, 10.4515)),
    ("Australia", Coordinates::new(-25.2744, 133.7751)),
    ("Tunisia", Coordinates::new(33.8869, 9.5375)),
    ("Angola", Coordinates::new(-11.2027, 17.8739)),
];

static COUNTRY_LOOKUP: LazyLock<HashMap<&'static str, Coordinates>> =
    LazyLock::new(|| COUNTRY_COORDS.into_iter().collect());

/// Exact-match lookup; no case folding or aliases.
pub fn lookup(country: &str) -> Option<Coordinates> {
    COUNTRY_LOOKUP.get(country).copied()
}

/// Whether `country` is one of the known keys.
pub fn is_known_country(country: &str) -> bool {
    COUNTRY_LOOKUP.contains_key(country)
}

/// Fill in whichever coordinate is missing.
///
/// Present values always win. A missing value comes from the country's
/// centroid, or `0.0` when the country is absent or unrecognized.
pub fn resolve(country: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Coordinates {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        return Coordinates { lat, lon };
    }

    let centroid = country.and_then(lookup).unwrap_or(Coordinates::ORIGIN);
    Coordinates {
        lat: lat.unwrap_or(centroid.lat),
        lon: lon.unwrap_or(centroid.lon),
    }
}

/// One startup row, for callers working record by record instead of with a
/// whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupRecord {
    pub name: Option<String>,
    pub country: Option<String>,
    pub org_type: Option<String>,
    pub fund_level: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Populate the record's coordinates without overwriting existing ones.
pub fn enrich(record: &mut StartupRecord) {
    let coords = resolve(record.country.as_deref(), record.latitude, record.longitude);
    record.latitude = Some(coords.lat);
    record.longitude = Some(coords.lon);
}
