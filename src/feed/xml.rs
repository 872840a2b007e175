//! Raw document shape of the nextbike "official" XML feed.
//!
//! ```xml
//! <markers>
//!   <country country="PL" name="nextbike Polska">
//!     <city uid="210" name="Warszawa" lat="52.23" lng="21.01">
//!       <place uid="2585" name="Plac Bankowy" bikes="5" lat="52.24" lng="21.00"/>
//!     </city>
//!   </country>
//! </markers>
//! ```
//!
//! Attributes are all optional here; missing values are reported per station
//! when the document is flattened, not while deserializing.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Markers {
    #[serde(rename = "country", default)]
    pub countries: Vec<Country>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Country {
    #[serde(rename = "@country")]
    pub code: Option<String>,
    #[serde(rename = "city", default)]
    pub cities: Vec<City>,
}

#[derive(Debug, Default, Deserialize)]
pub struct City {
    #[serde(rename = "@uid")]
    pub uid: Option<String>,
    #[serde(rename = "@name")]
    pub name: Option<String>,
    #[serde(rename = "place", default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Place {
    #[serde(rename = "@uid")]
    pub uid: Option<String>,
    #[serde(rename = "@name")]
    pub name: Option<String>,
    #[serde(rename = "@bikes")]
    pub bikes: Option<String>,
    #[serde(rename = "@lat")]
    pub lat: Option<String>,
    #[serde(rename = "@lng")]
    pub lng: Option<String>,
}
