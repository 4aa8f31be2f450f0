use std::fmt;

use crate::scene::Scene;

pub const BACKGROUND_PLACEHOLDER: &str = "[Background]";
pub const CHARACTER_PLACEHOLDER: &str = "[Character]";
pub const DEFAULT_SPEAKER: &str = "Narrator";

/// Text projection of a scene, with placeholders filled in for empty fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    pub scene_id: Option<String>,
    pub background: String,
    pub character: String,
    pub speaker: String,
    pub dialogue: String,
    pub choices: Vec<String>,
}

impl SceneView {
    /// Projects the current scene, or the blank view when there is none.
    pub fn of(scene: Option<&Scene>) -> Self {
        match scene {
            Some(scene) => Self::from_scene(scene),
            None => Self::blank(),
        }
    }

    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            scene_id: Some(scene.id.clone()),
            background: or_placeholder(&scene.background, BACKGROUND_PLACEHOLDER),
            character: or_placeholder(&scene.character, CHARACTER_PLACEHOLDER),
            speaker: or_placeholder(&scene.character_name, DEFAULT_SPEAKER),
            dialogue: scene.dialogue.clone(),
            choices: scene
                .choices
                .iter()
                .map(|choice| choice.text.clone())
                .collect(),
        }
    }

    /// View shown when the cursor addresses no scene.
    pub fn blank() -> Self {
        Self {
            scene_id: None,
            background: BACKGROUND_PLACEHOLDER.to_string(),
            character: CHARACTER_PLACEHOLDER.to_string(),
            speaker: DEFAULT_SPEAKER.to_string(),
            dialogue: String::new(),
            choices: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.scene_id.is_none()
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for SceneView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scene_id {
            Some(id) => writeln!(f, "== {id} ==")?,
            None => writeln!(f, "== (no scene) ==")?,
        }
        writeln!(f, "{} | {}", self.background, self.character)?;
        writeln!(f, "{}: {}", self.speaker, self.dialogue)?;
        for (index, choice) in self.choices.iter().enumerate() {
            writeln!(f, "  [{}] {choice}", index + 1)?;
        }
        Ok(())
    }
}
