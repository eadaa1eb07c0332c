//! Layout form metadata sent alongside a capture.

use serde::{Deserialize, Serialize};

/// Version stamped on newly generated layouts.
pub const DEFAULT_VERSION: &str = "0.1";

/// Title-block fields of the generated layout.
///
/// Every field is free text; empty strings are sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutForm {
    /// Drafter name.
    pub drafter: String,
    /// Map scale, e.g. `1:5000`.
    pub scale: String,
    /// Distance note.
    pub distance: String,
    /// Sugarcane area in hectares.
    pub cane_area: String,
    /// Municipality / state.
    pub municipality: String,
    /// Granting partner.
    pub grantor: String,
    /// Property name.
    pub property: String,
    /// Generation date, `dd/mm/yyyy`.
    pub date: String,
    /// Layout version.
    pub version: String,
}

impl LayoutForm {
    /// A form for the drawing `stem`, dated today at the default version.
    #[must_use]
    pub fn for_drawing(stem: impl Into<String>) -> Self {
        Self {
            property: stem.into(),
            date: today(),
            version: DEFAULT_VERSION.to_string(),
            ..Self::default()
        }
    }

    /// Multipart field names and values, in submission order.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("desenhista", self.drafter.clone()),
            ("escala", self.scale.clone()),
            ("distancia", self.distance.clone()),
            ("area_cana", self.cane_area.clone()),
            ("mun_est", self.municipality.clone()),
            ("parc", self.grantor.clone()),
            ("propriedade", self.property.clone()),
            ("data_atual", self.date.clone()),
            ("nova_versao", self.version.clone()),
        ]
    }
}

/// Today's local date as `dd/mm/yyyy`.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}
