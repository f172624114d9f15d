use catalog::task::TaskSpec;
use foundation::geo::GeoBounds;
use foundation::mercator::{self, ScreenPoint};
use scene::tile::{TileProperties, TileRecord};

/// Info-panel model: where it sits and what it says.
///
/// The hover machine owns and mutates this; the host only reads it to render
/// DOM. The anchor is the focused tile's north-west corner in world pixels
/// at the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub visible: bool,
    pub anchor: ScreenPoint,
    /// "`{task title}: {value}`" headline.
    pub title: String,
    pub lines: Vec<String>,
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self {
            visible: false,
            anchor: ScreenPoint { x: 0.0, y: 0.0 },
            title: String::new(),
            lines: Vec::new(),
        }
    }
}

impl InfoPanel {
    pub(crate) fn show(&mut self, task: &TaskSpec, tile: &TileRecord, zoom: f64) {
        self.visible = true;
        self.anchor = mercator::project(tile.bounds.north_west(), zoom);
        self.title = format!("{}: {}", task.title, format_value(tile.properties.value));
        self.lines = metadata_lines(&tile.properties);
    }

    pub(crate) fn reposition(&mut self, bounds: GeoBounds, zoom: f64) {
        self.anchor = mercator::project(bounds.north_west(), zoom);
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.title.clear();
        self.lines.clear();
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "—".to_string(),
    }
}

fn metadata_lines(props: &TileProperties) -> Vec<String> {
    let mut lines = Vec::new();

    if let (Some(lat), Some(lon)) = (props.lat, props.lon) {
        lines.push(format!("Location {lat:.2}°, {lon:.2}°"));
    }
    if let Some(date) = &props.date {
        lines.push(format!("Acquired {date}"));
    }
    if let Some(t) = props.mean_temperature {
        lines.push(format!("Mean temperature {t:.1} °C"));
    }
    if let Some(p) = props.annual_precipitation {
        lines.push(format!("Annual precipitation {p:.0} mm"));
    }
    if let Some(cloud) = props.cloud_fraction {
        match props.cloud_shadow_fraction {
            Some(shadow) => lines.push(format!("Cloud cover {cloud:.1}% (shadow {shadow:.1}%)")),
            None => lines.push(format!("Cloud cover {cloud:.1}%")),
        }
    }
    if let Some(species) = &props.species
        && !species.is_empty()
    {
        lines.push(format!("Species: {}", species.join(", ")));
    }

    lines
}

#[cfg(test)]
mod tests {
    use catalog::task::{TaskKind, TaskSpec};
    use foundation::geo::GeoBounds;
    use scene::tile::{TileId, TileProperties, TileRecord};

    use super::InfoPanel;

    #[test]
    fn show_anchors_at_the_north_west_corner_and_formats_content() {
        let task = TaskSpec::new("soil_nitrogen", "Soil nitrogen", "blue", TaskKind::Scalar);
        let tile = TileRecord {
            id: TileId::new("7"),
            bounds: GeoBounds::new(48.0, 11.0, 48.2, 11.2),
            properties: TileProperties {
                value: Some(1.254),
                lat: Some(48.1),
                lon: Some(11.1),
                date: Some("2020-07-14".into()),
                ..TileProperties::default()
            },
            ingestion_index: 0,
        };

        let mut panel = InfoPanel::default();
        panel.show(&task, &tile, 12.0);

        assert!(panel.visible);
        assert_eq!(panel.title, "Soil nitrogen: 1.25");
        assert_eq!(panel.lines[0], "Location 48.10°, 11.10°");
        assert_eq!(panel.lines[1], "Acquired 2020-07-14");

        let nw = foundation::mercator::project(tile.bounds.north_west(), 12.0);
        assert_eq!(panel.anchor, nw);
    }

    #[test]
    fn missing_value_renders_a_dash() {
        let task = TaskSpec::new("biomass", "Biomass", "green", TaskKind::Scalar);
        let tile = TileRecord {
            id: TileId::new("1"),
            bounds: GeoBounds::new(0.0, 0.0, 1.0, 1.0),
            properties: TileProperties::default(),
            ingestion_index: 0,
        };

        let mut panel = InfoPanel::default();
        panel.show(&task, &tile, 12.0);
        assert_eq!(panel.title, "Biomass: —");
        assert!(panel.lines.is_empty());
    }
}
