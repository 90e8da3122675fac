use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use glam::{Vec3, Vec4};
use roxmltree::{Document, Node};

/// Camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 30.0,
            near: 0.5,
            far: 10.0,
            eye: Vec3::new(1.0, 4.0, -6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// The scene's single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: Vec3,
    pub color: Vec4,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, 8.0, -10.0),
            color: Vec4::new(1.0, 0.8, 0.8, 1.0),
        }
    }
}

/// Phong material terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialConfig {
    pub ambient: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
    pub specular_factor: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular: Vec4::ONE,
            shininess: 50.0,
            specular_factor: 1.0,
        }
    }
}

/// Tunable constants of the cube scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub clear_color: Vec4,
    /// Id of the label the frame rate is written to.
    pub fps_label: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            material: MaterialConfig::default(),
            clear_color: Vec4::new(0.4, 0.5, 0.3, 1.0),
            fps_label: "fpsLabel".to_string(),
        }
    }
}

impl SceneConfig {
    /// Reads a scene config file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        Self::from_xml(&xml).with_context(|| format!("invalid scene config {}", path.display()))
    }

    /// Parses a `<scene>` document. Every element is optional; missing
    /// values keep their defaults.
    ///
    /// ```xml
    /// <scene>
    ///   <camera><fov>45</fov><eye>0 2 -8</eye></camera>
    ///   <light><color>1 1 1 1</color></light>
    ///   <material><shininess>20</shininess></material>
    ///   <clear-color>0 0 0 1</clear-color>
    /// </scene>
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid scene XML")?;
        let root = document.root_element();
        if !root.has_tag_name("scene") {
            bail!(
                "expected <scene> root element, found <{}>",
                root.tag_name().name()
            );
        }

        let mut config = Self::default();

        if let Some(camera) = child(&root, "camera") {
            let settings = &mut config.camera;
            settings.fov_degrees = parse_f32(&camera, "fov", settings.fov_degrees)?;
            settings.near = parse_f32(&camera, "near", settings.near)?;
            settings.far = parse_f32(&camera, "far", settings.far)?;
            settings.eye = parse_vec3(&camera, "eye", settings.eye)?;
            settings.target = parse_vec3(&camera, "target", settings.target)?;
            settings.up = parse_vec3(&camera, "up", settings.up)?;
        }

        if let Some(light) = child(&root, "light") {
            config.light.position = parse_vec3(&light, "position", config.light.position)?;
            config.light.color = parse_vec4(&light, "color", config.light.color)?;
        }

        if let Some(material) = child(&root, "material") {
            let settings = &mut config.material;
            settings.ambient = parse_vec4(&material, "ambient", settings.ambient)?;
            settings.specular = parse_vec4(&material, "specular", settings.specular)?;
            settings.shininess = parse_f32(&material, "shininess", settings.shininess)?;
            settings.specular_factor =
                parse_f32(&material, "specular-factor", settings.specular_factor)?;
        }

        config.clear_color = parse_vec4(&root, "clear-color", config.clear_color)?;
        if let Some(label) = optional_text(&root, "fps-label") {
            config.fps_label = label;
        }

        Ok(config)
    }
}

fn child<'a, 'input>(node: &Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    child(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_components(node: &Node<'_, '_>, tag: &str, count: usize) -> Result<Option<Vec<f32>>> {
    let Some(value) = optional_text(node, tag) else {
        return Ok(None);
    };
    let components = value
        .split_whitespace()
        .map(|component| {
            component
                .parse::<f32>()
                .map_err(|err| anyhow!("<{tag}> component `{component}`: {err}"))
        })
        .collect::<Result<Vec<_>>>()?;
    if components.len() != count {
        bail!(
            "<{tag}> needs {count} components, found {}",
            components.len()
        );
    }
    Ok(Some(components))
}

fn parse_f32(node: &Node<'_, '_>, tag: &str, default: f32) -> Result<f32> {
    Ok(parse_components(node, tag, 1)?.map_or(default, |values| values[0]))
}

fn parse_vec3(node: &Node<'_, '_>, tag: &str, default: Vec3) -> Result<Vec3> {
    Ok(parse_components(node, tag, 3)?.map_or(default, |values| Vec3::from_slice(&values)))
}

fn parse_vec4(node: &Node<'_, '_>, tag: &str, default: Vec4) -> Result<Vec4> {
    Ok(parse_components(node, tag, 4)?.map_or(default, |values| Vec4::from_slice(&values)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    <scene>
        <camera>
            <fov>45</fov>
            <eye>0 2 -8</eye>
        </camera>
        <light>
            <color>1 1 1 1</color>
        </light>
        <material>
            <shininess>20</shininess>
            <specular-factor>0.5</specular-factor>
        </material>
        <clear-color>0 0 0 1</clear-color>
        <fps-label>hud</fps-label>
    </scene>
    "#;

    #[test]
    fn defaults_match_the_demo() {
        let config = SceneConfig::default();
        assert_eq!(config.camera.fov_degrees, 30.0);
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.far, 10.0);
        assert_eq!(config.camera.eye, Vec3::new(1.0, 4.0, -6.0));
        assert_eq!(config.light.position, Vec3::new(1.0, 8.0, -10.0));
        assert_eq!(config.material.shininess, 50.0);
        assert_eq!(config.fps_label, "fpsLabel");
    }

    #[test]
    fn parse_overrides_only_given_values() {
        let config = SceneConfig::from_xml(SAMPLE).unwrap();
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.camera.eye, Vec3::new(0.0, 2.0, -8.0));
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.target, Vec3::ZERO);
        assert_eq!(config.light.color, Vec4::ONE);
        assert_eq!(config.light.position, Vec3::new(1.0, 8.0, -10.0));
        assert_eq!(config.material.shininess, 20.0);
        assert_eq!(config.material.specular_factor, 0.5);
        assert_eq!(config.clear_color, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(config.fps_label, "hud");
    }

    #[test]
    fn empty_scene_is_the_default() {
        assert_eq!(
            SceneConfig::from_xml("<scene/>").unwrap(),
            SceneConfig::default()
        );
    }

    #[test]
    fn wrong_component_count_is_an_error() {
        let err = SceneConfig::from_xml("<scene><camera><eye>1 2</eye></camera></scene>")
            .unwrap_err();
        assert!(err.to_string().contains("<eye> needs 3 components"));
    }

    #[test]
    fn bad_number_is_an_error() {
        assert!(SceneConfig::from_xml("<scene><camera><fov>wide</fov></camera></scene>").is_err());
    }

    #[test]
    fn wrong_root_is_an_error() {
        assert!(SceneConfig::from_xml("<level/>").is_err());
    }
}
