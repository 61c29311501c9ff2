use formats::GeoLayer;
use foundation::{GeoBounds, GridPoint, project};
use serde_json::{Map, Value};

/// A feature's outer rings in grid space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPolygon {
    pub name: String,
    pub properties: Map<String, Value>,
    pub rings: Vec<Vec<GridPoint>>,
}

/// Grid-space view of a [`GeoLayer`] for one canvas size.
///
/// Cheap to rebuild: a resize re-runs [`project_layer`] on the cached layer
/// and never touches the source document again.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectedGeometry {
    pub bounds: GeoBounds,
    pub width: usize,
    pub height: usize,
    pub polygons: Vec<ProjectedPolygon>,
}

impl ProjectedGeometry {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

pub fn project_layer(layer: &GeoLayer, width: usize, height: usize) -> ProjectedGeometry {
    let bounds = layer.bounds;
    let polygons = layer
        .features
        .iter()
        .map(|feature| ProjectedPolygon {
            name: feature.name.clone(),
            properties: feature.properties.clone(),
            rings: feature
                .rings
                .iter()
                .map(|ring| {
                    ring.iter()
                        .map(|p| project(p.lon_deg, p.lat_deg, &bounds, width, height))
                        .collect()
                })
                .collect(),
        })
        .collect();

    ProjectedGeometry {
        bounds,
        width,
        height,
        polygons,
    }
}

#[cfg(test)]
mod tests {
    use super::project_layer;
    use formats::GeoLayer;
    use foundation::GridPoint;
    use pretty_assertions::assert_eq;

    fn square() -> GeoLayer {
        let doc = r#"{"features": [{
            "properties": {"name": "square"},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[0,10],[10,10],[10,0],[0,0]]]}
        }]}"#;
        GeoLayer::from_geojson_bytes(doc.as_bytes()).expect("extract")
    }

    #[test]
    fn square_corners_land_on_grid_corners() {
        let projected = project_layer(&square(), 11, 11);
        assert_eq!(projected.size(), (11, 11));
        assert_eq!(projected.polygons[0].name, "square");
        assert_eq!(
            projected.polygons[0].rings[0],
            vec![
                GridPoint::new(0, 10),
                GridPoint::new(0, 0),
                GridPoint::new(10, 0),
                GridPoint::new(10, 10),
                GridPoint::new(0, 10),
            ]
        );
    }

    #[test]
    fn reprojection_is_deterministic() {
        let layer = square();
        assert_eq!(project_layer(&layer, 37, 13), project_layer(&layer, 37, 13));
    }

    #[test]
    fn single_point_layer_projects_to_center() {
        let doc = r#"{"features": [{"properties": {}, "geometry": {"type": "Point", "coordinates": [1.5, 2.5]}}]}"#;
        let layer = GeoLayer::from_geojson_bytes(doc.as_bytes()).expect("extract");
        let projected = project_layer(&layer, 21, 11);
        assert_eq!(projected.polygons[0].rings[0], vec![GridPoint::new(10, 5)]);
    }

    #[test]
    fn every_cell_stays_inside_the_canvas() {
        let doc = r#"{"features": [
            {"properties": {}, "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[-180,-90],[180,-90],[180,90],[-180,90],[-180,-90]]],
                [[[12.3,45.6],[13.4,44.1],[11.0,46.9],[12.3,45.6]]]
            ]}},
            {"properties": {}, "geometry": {"type": "Point", "coordinates": [-0.1275, 51.507]}}
        ]}"#;
        let layer = GeoLayer::from_geojson_bytes(doc.as_bytes()).expect("extract");
        for (w, h) in [(20, 10), (21, 11), (133, 47)] {
            let projected = project_layer(&layer, w, h);
            for p in projected.polygons.iter().flat_map(|p| p.rings.iter().flatten()) {
                assert!(p.x < w && p.y < h, "{p:?} outside {w}x{h}");
            }
        }
    }
}
