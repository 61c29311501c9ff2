//! GeoJSON extraction into a geography-space [`GeoLayer`].
//!
//! The document is decoded into typed shapes; anything that does not fit a
//! shape is caught per element by [`Lenient`], so one malformed feature, ring
//! or position is dropped without aborting the whole load. Only whole-document
//! problems surface as an [`ExtractError`].

use foundation::GeoBounds;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Name given to features without a string `name` property.
pub const UNKNOWN_NAME: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Outer boundary of a polygon, or the single position of a point.
pub type Ring = Vec<GeoPoint>;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub properties: Map<String, Value>,
    pub rings: Vec<Ring>,
}

/// Parsed features plus their bounding box, independent of any canvas size.
///
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLayer {
    pub bounds: GeoBounds,
    pub features: Vec<GeoFeature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    EmptyInput,
    Parse(String),
    MissingFeatures,
    NoGeometry,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::EmptyInput => write!(f, "empty GeoJSON data"),
            ExtractError::Parse(msg) => write!(f, "parse JSON: {msg}"),
            ExtractError::MissingFeatures => write!(f, "features not found in GeoJSON"),
            ExtractError::NoGeometry => write!(f, "bounding box could not be calculated"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl GeoLayer {
    pub fn from_geojson_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::EmptyInput);
        }
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, ExtractError> {
        if !value.is_object() {
            return Err(ExtractError::MissingFeatures);
        }
        let doc = Document::deserialize(value).map_err(|_| ExtractError::MissingFeatures)?;
        let Some(Lenient::Valid(raw_features)) = doc.features else {
            return Err(ExtractError::MissingFeatures);
        };

        let mut bounds = GeoBounds::empty();
        let mut features = Vec::with_capacity(raw_features.len());
        for raw in raw_features {
            let Lenient::Valid(raw) = raw else {
                continue;
            };
            let rings = raw.geometry.into_rings();
            for p in rings.iter().flatten() {
                bounds.extend(p.lon_deg, p.lat_deg);
            }
            // Features without a properties object still frame the layer but
            // are not drawn.
            let Some(Lenient::Valid(properties)) = raw.properties else {
                continue;
            };
            if rings.is_empty() {
                continue;
            }
            let name = properties
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_NAME)
                .to_string();
            features.push(GeoFeature {
                name,
                properties,
                rings,
            });
        }

        if !bounds.is_valid() {
            return Err(ExtractError::NoGeometry);
        }
        Ok(Self { bounds, features })
    }

    pub fn ring_count(&self) -> usize {
        self.features.iter().map(|f| f.rings.len()).sum()
    }
}

/// Either a value of the expected shape or something that is skipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    fn valid(self) -> Option<T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    features: Option<Lenient<Vec<Lenient<RawFeature>>>>,
}

// A feature without a decodable geometry is skipped entirely.
#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: RawGeometry,
    #[serde(default)]
    properties: Option<Lenient<Map<String, Value>>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Point {
        coordinates: Lenient<Position>,
    },
    Polygon {
        coordinates: Vec<Lenient<RawRing>>,
    },
    MultiPolygon {
        coordinates: Vec<Lenient<Vec<Lenient<RawRing>>>>,
    },
    #[serde(other)]
    Unsupported,
}

type RawRing = Vec<Lenient<Position>>;

impl RawGeometry {
    fn into_rings(self) -> Vec<Ring> {
        match self {
            RawGeometry::Point { coordinates } => coordinates
                .valid()
                .filter(Position::is_finite)
                .map(|p| vec![vec![p.into()]])
                .unwrap_or_default(),
            RawGeometry::Polygon { coordinates } => {
                outer_ring(coordinates).into_iter().collect()
            }
            RawGeometry::MultiPolygon { coordinates } => coordinates
                .into_iter()
                .filter_map(Lenient::valid)
                .filter_map(outer_ring)
                .collect(),
            RawGeometry::Unsupported => Vec::new(),
        }
    }
}

/// First ring of a polygon; holes are not kept.
fn outer_ring(rings: Vec<Lenient<RawRing>>) -> Option<Ring> {
    let ring: Ring = rings
        .into_iter()
        .next()?
        .valid()?
        .into_iter()
        .filter_map(Lenient::valid)
        .filter(Position::is_finite)
        .map(GeoPoint::from)
        .collect();
    if ring.is_empty() { None } else { Some(ring) }
}

/// A GeoJSON position: at least `[lon, lat]`; extra members (altitude) are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    lon: f64,
    lat: f64,
}

impl Position {
    fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<Position> for GeoPoint {
    fn from(p: Position) -> Self {
        GeoPoint::new(p.lon, p.lat)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PositionVisitor;

        impl<'de> Visitor<'de> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a position array [lon, lat, ...]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Position, A::Error> {
                let lon: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let lat: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Position { lon, lat })
            }
        }

        deserializer.deserialize_seq(PositionVisitor)
    }
}
