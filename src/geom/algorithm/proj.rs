use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords, MultiPolygon, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};

/// Metric coordinate systems available for buffering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Universal Transverse Mercator, zone chosen from the center of the data.
    #[default]
    Utm,
    /// Spherical web mercator (EPSG:3857). Distances stretch by 1/cos(latitude) away from the equator.
    WebMercator,
}

/// Source geographic CRS for every lon/lat input (EPSG:4326).
const GEOGRAPHIC_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

const WEB_MERCATOR_PROJ4: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs";

/// Converts between lon/lat degrees and a metric CRS in meters.
pub struct Projector {
    geographic: Proj4,
    metric: Proj4,
}

impl Projector {
    /// Build a projector whose metric CRS suits data around `center` (lon/lat).
    pub fn new(kind: ProjectionKind, center: Coord<f64>) -> Result<Self> {
        let geographic = Proj4::from_proj_string(GEOGRAPHIC_PROJ4)
            .with_context(|| anyhow!("failed to build source PROJ.4: {GEOGRAPHIC_PROJ4}"))?;

        let proj_string = match kind {
            ProjectionKind::Utm => utm_proj4(center),
            ProjectionKind::WebMercator => WEB_MERCATOR_PROJ4.to_string(),
        };
        let metric = Proj4::from_proj_string(&proj_string)
            .with_context(|| anyhow!("failed to build target PROJ.4: {proj_string}"))?;

        Ok(Self { geographic, metric })
    }

    /// Build a projector for data covering `bounds`, or around (0, 0) when there is no data.
    pub fn for_bounds(kind: ProjectionKind, bounds: Option<Rect<f64>>) -> Result<Self> {
        Self::new(kind, bounds.map(|b| b.center()).unwrap_or(Coord { x: 0.0, y: 0.0 }))
    }

    /// Project a lon/lat coordinate (degrees) to meters.
    pub fn to_metric(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.geographic, &self.metric, &mut point)
            .with_context(|| format!("CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// Project a metric coordinate back to lon/lat degrees.
    pub fn to_geographic(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.metric, &self.geographic, &mut point)
            .with_context(|| format!("inverse CRS transform failed for ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }

    /// Reproject a lon/lat shape to meters.
    pub fn shape_to_metric(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.to_metric(coord))
    }

    /// Reproject a metric shape back to lon/lat.
    pub fn shape_to_geographic(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.to_geographic(coord))
    }
}

/// PROJ.4 string for the UTM zone containing `center`.
fn utm_proj4(center: Coord<f64>) -> String {
    let zone = (((center.x + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u32;
    let south = if center.y >= 0.0 { "" } else { " +south" };
    format!("+proj=utm +zone={zone}{south} +datum=WGS84 +units=m +no_defs +type=crs")
}
