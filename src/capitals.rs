//! Static list of target capitals.
//!
//! Process-wide configuration: defined once, immutable. Each refresh cycle
//! iterates this list; the resulting aggregate may cover a strict subset of
//! it when individual fetches fail.

/// One target city: name, coordinates, and IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct Capital {
    pub country: &'static str,
    pub city: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub tz: &'static str,
}

pub const CAPITALS: &[Capital] = &[
    Capital { country: "Polska", city: "Warsaw", lat: 52.2297, lon: 21.0122, tz: "Europe/Warsaw" },
    Capital { country: "Portugal", city: "Lisbon", lat: 38.7223, lon: -9.1393, tz: "Europe/Lisbon" },
    Capital { country: "Spain", city: "Madrid", lat: 40.4168, lon: -3.7038, tz: "Europe/Madrid" },
    Capital { country: "France", city: "Paris", lat: 48.8566, lon: 2.3522, tz: "Europe/Paris" },
    Capital { country: "Italy", city: "Rome", lat: 41.9028, lon: 12.4964, tz: "Europe/Rome" },
    Capital { country: "Germany", city: "Berlin", lat: 52.5200, lon: 13.4050, tz: "Europe/Berlin" },
    Capital { country: "UK", city: "London", lat: 51.5074, lon: -0.1278, tz: "Europe/London" },
    Capital { country: "Ireland", city: "Dublin", lat: 53.3498, lon: -6.2603, tz: "Europe/Dublin" },
    Capital { country: "Norway", city: "Oslo", lat: 59.9139, lon: 10.7522, tz: "Europe/Oslo" },
    Capital { country: "Sweden", city: "Stockholm", lat: 59.3293, lon: 18.0686, tz: "Europe/Stockholm" },
    Capital { country: "Finland", city: "Helsinki", lat: 60.1699, lon: 24.9384, tz: "Europe/Helsinki" },
    Capital { country: "Greece", city: "Athens", lat: 37.9838, lon: 23.7275, tz: "Europe/Athens" },
    Capital { country: "Japan", city: "Tokyo", lat: 35.6762, lon: 139.6503, tz: "Asia/Tokyo" },
    Capital { country: "USA", city: "Washington", lat: 38.9072, lon: -77.0369, tz: "America/New_York" },
    Capital { country: "Australia", city: "Canberra", lat: -35.2809, lon: 149.1300, tz: "Australia/Sydney" },
];

impl Capital {
    /// File-name-safe city slug, e.g. "Washington" → "washington".
    pub fn slug(&self) -> String {
        self.city.to_lowercase().replace(' ', "_")
    }
}
