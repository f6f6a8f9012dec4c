use foundation::math::GeoPoint;
use serde_json::{Map, Value};

pub type Ring = Vec<GeoPoint>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    /// Outer ring first, holes after.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    GeometryCollection(Vec<Geometry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

impl Feature {
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    InvalidJson(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::InvalidJson(e) => write!(f, "JSON parse error: {e}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| GeoJsonError::InvalidJson(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let obj = value.as_object().ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            features.push(
                parse_feature(feat_val)
                    .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?,
            );
        }

        Ok(Self { features })
    }
}

fn parse_feature(value: &Value) -> Result<Feature, String> {
    let obj = value
        .as_object()
        .ok_or("feature must be an object".to_string())?;
    match obj.get("type").and_then(|v| v.as_str()) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    // Null geometry is legal GeoJSON (unlocated feature).
    let geometry = match obj.get("geometry") {
        None => return Err("feature missing geometry".to_string()),
        Some(Value::Null) => Geometry::GeometryCollection(Vec::new()),
        Some(v) => parse_geometry(v)?,
    };

    Ok(Feature {
        id,
        properties,
        geometry,
    })
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    if ty == "GeometryCollection" {
        let members = obj
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or("GeometryCollection missing geometries".to_string())?;
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            out.push(parse_geometry(member)?);
        }
        return Ok(Geometry::GeometryCollection(out));
    }

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_nested(coords, parse_points)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_nested(coords, parse_polygon)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    parse_nested(coords, parse_point)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    parse_nested(coords, parse_points)
}

fn parse_nested<T>(
    coords: &Value,
    item: fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for v in arr {
        out.push(item(v)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FeatureCollection, GeoJsonError, Geometry};

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "id": 7, "properties": {"name": "Uruguay"},
         "geometry": {"type": "Polygon", "coordinates": [[[-58,-30],[-53,-30],[-53,-35],[-58,-35],[-58,-30]]]}},
        {"type": "Feature", "properties": {"ADMIN": "Japan"},
         "geometry": {"type": "GeometryCollection", "geometries": [
            {"type": "Point", "coordinates": [139.7, 35.7]},
            {"type": "MultiPolygon", "coordinates": [[[[130,31],[131,31],[131,32],[130,31]]]]}
         ]}},
        {"type": "Feature", "properties": {}, "geometry": null}
      ]
    }"#;

    #[test]
    fn parses_polygons_and_collections() {
        let fc = FeatureCollection::from_geojson_str(SAMPLE).expect("parse");
        assert_eq!(fc.features.len(), 3);
        assert_eq!(fc.features[0].id.as_deref(), Some("7"));
        assert_eq!(fc.features[0].property_str("name"), Some("Uruguay"));
        assert!(matches!(fc.features[0].geometry, Geometry::Polygon(ref r) if r[0].len() == 5));
        match &fc.features[1].geometry {
            Geometry::GeometryCollection(members) => {
                assert_eq!(members.len(), 2);
                assert!(matches!(members[1], Geometry::MultiPolygon(_)));
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        assert_eq!(
            fc.features[2].geometry,
            Geometry::GeometryCollection(Vec::new())
        );
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_geojson_str(r#"{"type":"Feature"}"#).unwrap_err();
        assert!(matches!(err, GeoJsonError::NotAFeatureCollection));
    }

    #[test]
    fn reports_feature_index() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1]}}
        ]}"#;
        let err = FeatureCollection::from_geojson_str(payload).unwrap_err();
        match err {
            GeoJsonError::InvalidFeature { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("[lon, lat]"));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
