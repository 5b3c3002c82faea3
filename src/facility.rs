use serde::{Deserialize, Serialize};

/// A facility to analyze.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Facility {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Sales segment, e.g. "Enterprise", "Regional", "SMB"
    #[serde(default, alias = "tier", skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

impl Facility {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            segment: None,
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Reference of the satellite tile for this facility
    pub fn image_ref(&self) -> String {
        format!("tile_{}.jpg", self.name.replace(' ', "_"))
    }

    /// Segment label for display, "Unknown" when not set
    pub fn segment_label(&self) -> &str {
        self.segment.as_deref().unwrap_or("Unknown")
    }
}

/// URL-safe slug of a facility name: lowercase, spaces to dashes, `#` dropped, `&` spelled out.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .replace('#', "")
        .replace('&', "and")
}

/// Pre-built Digital Twin demo URL for a facility.
pub fn demo_link(base_url: &str, name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slugify(name))
}

/// Built-in target list used when neither the config nor the command line provides one.
pub fn default_targets() -> Vec<Facility> {
    vec![
        Facility::new("Costco Distribution Center #54", 34.754, -78.789).with_segment("Enterprise"),
        Facility::new("Smithfield Tar Heel Plant", 34.750, -78.780).with_segment("Enterprise"),
        Facility::new("Walmart Fulfillment Center #402", 33.900, -84.200).with_segment("Enterprise"),
        Facility::new("Amazon ATL4", 33.600, -84.400).with_segment("Enterprise"),
        Facility::new("Primo Water - Zephyrhills", 28.233, -82.181).with_segment("Regional"),
        Facility::new("ReadyRefresh Tampa Hub", 27.950, -82.457).with_segment("Regional"),
        Facility::new("Crowley Jacksonville Port", 30.330, -81.650).with_segment("Regional"),
        Facility::new("Estes Express Terminal ATL", 33.750, -84.350).with_segment("Regional"),
        Facility::new("Small Regional Depot", 35.000, -79.000).with_segment("SMB"),
        Facility::new("Local Cold Storage Co", 34.500, -79.500).with_segment("SMB"),
    ]
}
