//! JSON scene files: a canvas size, a background and styled shapes

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Geometry, Point};
use crate::shapes::Shape;
use crate::style::Style;

/// One shape and how to paint it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItem {
    pub shape: Shape,
    #[serde(default)]
    pub style: Style,
}

impl SceneItem {
    pub fn new(shape: impl Into<Shape>, style: Style) -> Self {
        Self {
            shape: shape.into(),
            style,
        }
    }
}

/// Shapes painted in order onto a `width x height` background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub items: Vec<SceneItem>,
}

fn default_background() -> Color {
    Color::WHITE
}

impl Scene {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            background: default_background(),
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, shape: impl Into<Shape>, style: Style) -> &mut Self {
        self.items.push(SceneItem::new(shape, style));
        self
    }

    pub fn remove_item(&mut self, index: usize) -> Option<SceneItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Topmost item whose shape contains the point
    pub fn item_at(&self, x: f32, y: f32) -> Option<&SceneItem> {
        let p = Point::new(x, y);
        self.items.iter().rev().find(|item| item.shape.contains(p))
    }

    /// Paint every item onto `canvas` without clearing it
    pub fn render_into(&self, canvas: &mut Canvas) {
        for item in &self.items {
            canvas.draw(&item.shape, &item.style);
        }
    }

    pub fn render(&self) -> Canvas {
        let mut canvas = Canvas::new(self.width, self.height, self.background);
        self.render_into(&mut canvas);
        canvas
    }

    /// Save scene to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        debug!("saved scene {:?} to {}", self.name, path.as_ref().display());
        Ok(())
    }

    /// Load scene from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let scene: Scene = serde_json::from_str(&json)?;
        debug!(
            "loaded scene {:?}: {}x{}, {} items",
            scene.name,
            scene.width,
            scene.height,
            scene.items.len()
        );
        Ok(scene)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled", 640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rect};

    const SCENE_JSON: &str = r##"{
        "name": "target",
        "width": 100,
        "height": 100,
        "background": "#FFFFFFFF",
        "items": [
            {
                "shape": {"type": "rect", "center": {"x": 50, "y": 50}, "width": 80, "height": 80},
                "style": {"fill": "#FF0000FF"}
            },
            {
                "shape": {"type": "circle", "center": {"x": 50, "y": 50}, "radius": 20},
                "style": {"fill": "255,0,0", "stroke": "#000000", "width": 2}
            }
        ]
    }"##;

    #[test]
    fn test_parse_and_render() {
        let scene: Scene = serde_json::from_str(SCENE_JSON).unwrap();
        assert_eq!(scene.items.len(), 2);
        assert!(scene.items[0].style.draw_arc);
        let canvas = scene.render();
        assert_eq!(canvas.get(50, 50), Some(Color::RED));
        assert_eq!(canvas.get(20, 20), Some(Color::BLUE));
        assert_eq!(canvas.get(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn test_item_at_prefers_topmost() {
        let mut scene = Scene::new("stack", 100, 100);
        scene
            .add(Rect::from_xywh(0.0, 0.0, 100.0, 100.0), Style::filled(Color::BLUE))
            .add(Circle::new(50.0, 50.0, 10.0), Style::filled(Color::RED));
        assert!(matches!(scene.item_at(50.0, 50.0).map(|i| &i.shape), Some(Shape::Circle(_))));
        assert!(matches!(scene.item_at(5.0, 5.0).map(|i| &i.shape), Some(Shape::Rect(_))));
        assert!(scene.item_at(500.0, 5.0).is_none());
        assert!(scene.remove_item(5).is_none());
        assert!(scene.remove_item(1).is_some());
    }

    #[test]
    fn test_save_load() {
        let mut scene = Scene::new("disk", 32, 16);
        scene.background = Color::BLACK;
        scene.add(Circle::new(8.0, 8.0, 4.0), Style::filled(Color::YELLOW));
        let path = std::env::temp_dir().join(format!("softraster-scene-{}.json", std::process::id()));
        scene.save(&path).unwrap();
        let loaded = Scene::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_bad_json_is_scene_error() {
        let path = std::env::temp_dir().join(format!("softraster-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let result = Scene::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(crate::error::RasterError::Scene(_))));
    }
}
