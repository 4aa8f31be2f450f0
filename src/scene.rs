use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

/// A single beat of the narrative.
///
/// Only `id` is required. Display fields default to the empty string and a
/// scene without choices is a dead end that falls through to the next scene
/// in authoring order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub dialogue: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.character = character.into();
        self
    }

    pub fn with_speaker(mut self, name: impl Into<String>) -> Self {
        self.character_name = name.into();
        self
    }

    pub fn with_dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.dialogue = dialogue.into();
        self
    }

    pub fn with_choice(mut self, text: impl Into<String>, next_scene: impl Into<String>) -> Self {
        self.choices.push(Choice::new(text, next_scene));
        self
    }

    /// Returns `true` when the scene offers no choices.
    pub fn is_dead_end(&self) -> bool {
        self.choices.is_empty()
    }
}

/// Labeled edge from a scene to the scene whose id is `next_scene`.
///
/// The target is a forward reference and is only resolved while navigating.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    #[serde(default)]
    pub text: String,
    pub next_scene: String,
}

impl Choice {
    pub fn new(text: impl Into<String>, next_scene: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_scene: next_scene.into(),
        }
    }
}

/// Ordered scene list loaded from an authoring document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Story {
    pub scenes: Vec<Scene>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoryJson {
    List(Vec<Scene>),
    Wrapped { scenes: Vec<Scene> },
}

impl Story {
    /// Loads a story from disk, picking the format from the file extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let story = match extension.as_deref() {
            Some("json") => Self::from_json(&text),
            Some("xml") => Self::from_xml(&text),
            other => Err(anyhow!(
                "unsupported story format {:?}: expected .xml or .json",
                other.unwrap_or("")
            )),
        }
        .with_context(|| format!("failed to load story {}", path.display()))?;
        info!(
            "loaded {} scene(s) from {}",
            story.scenes.len(),
            path.display()
        );
        Ok(story)
    }

    /// Parses the story XML produced by the authoring tools.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid story XML")?;
        let mut scenes = Vec::new();

        for node in document.descendants().filter(|n| n.has_tag_name("scene")) {
            let id = node
                .attribute("id")
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .or_else(|| optional_text(&node, "id"))
                .ok_or_else(|| anyhow!("scene #{} has no id", scenes.len()))?;

            let mut scene = Scene::new(id);
            scene.background = optional_text(&node, "background").unwrap_or_default();
            scene.character = optional_text(&node, "character").unwrap_or_default();
            scene.character_name = optional_text(&node, "speaker").unwrap_or_default();
            scene.dialogue = optional_text(&node, "dialogue").unwrap_or_default();
            for choice in node.children().filter(|n| n.has_tag_name("choice")) {
                scene.choices.push(parse_choice(&choice, &scene.id)?);
            }
            scenes.push(scene);
        }

        Ok(Self { scenes })
    }

    /// Parses either a bare JSON array of scenes or an object with a `scenes` field.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: StoryJson = serde_json::from_str(json).context("invalid story JSON")?;
        let scenes = match parsed {
            StoryJson::List(scenes) | StoryJson::Wrapped { scenes } => scenes,
        };
        Ok(Self { scenes })
    }

    pub fn into_scenes(self) -> Vec<Scene> {
        self.scenes
    }
}

fn parse_choice(node: &Node<'_, '_>, scene_id: &str) -> Result<Choice> {
    let next_scene = node
        .attribute("next")
        .map(str::trim)
        .filter(|next| !next.is_empty())
        .ok_or_else(|| anyhow!("choice in scene {scene_id} has no next attribute"))?;
    let text = node.text().map(str::trim).unwrap_or_default();
    Ok(Choice::new(text, next_scene))
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::io::Write;
    use tempfile::Builder;

    const SAMPLE: &str = r#"
    <story>
        <scene id="intro">
            <background>School Classroom</background>
            <speaker>Yuki</speaker>
            <dialogue>Good morning!</dialogue>
            <choice next="talk">Talk to her</choice>
            <choice next="ignore">Ignore her</choice>
        </scene>
        <scene>
            <id>talk</id>
        </scene>
    </story>
    "#;

    static PARSED: Lazy<Story> = Lazy::new(|| Story::from_xml(SAMPLE).expect("sample parses"));

    #[test]
    fn parse_xml_populates_scenes_and_choices() {
        let story = &*PARSED;
        assert_eq!(story.scenes.len(), 2);
        let intro = &story.scenes[0];
        assert_eq!(intro.id, "intro");
        assert_eq!(intro.background, "School Classroom");
        assert_eq!(intro.character_name, "Yuki");
        assert_eq!(intro.character, "");
        assert_eq!(
            intro.choices,
            vec![
                Choice::new("Talk to her", "talk"),
                Choice::new("Ignore her", "ignore"),
            ]
        );
        let talk = &story.scenes[1];
        assert_eq!(talk.id, "talk");
        assert!(talk.is_dead_end());
        assert_eq!(talk.dialogue, "");
    }

    #[test]
    fn parsed_scenes_feed_the_engine() {
        let mut novel = crate::novel::VisualNovel::new();
        for scene in PARSED.scenes.iter().cloned() {
            novel.add_scene(scene);
        }
        novel.advance();
        assert_eq!(novel.current_scene().unwrap().id, "talk");
        novel.previous_scene();
        novel.next_scene(1);
        assert!(novel.current_scene().is_none());
    }

    #[test]
    fn scene_without_id_is_an_error() {
        let bad = "<story><scene><dialogue>Hi</dialogue></scene></story>";
        assert!(Story::from_xml(bad).is_err());
    }

    #[test]
    fn choice_without_target_is_an_error() {
        let bad = r#"<story><scene id="a"><choice>Go</choice></scene></story>"#;
        let err = Story::from_xml(bad).unwrap_err();
        assert!(err.to_string().contains("scene a"));
    }

    #[test]
    fn parse_json_accepts_camel_case_and_defaults() {
        let json = r#"[
            {"id": "a", "characterName": "Yuki",
             "choices": [{"text": "go", "nextScene": "b"}]},
            {"id": "b"}
        ]"#;
        let story = Story::from_json(json).unwrap();
        assert_eq!(story.scenes[0].character_name, "Yuki");
        assert_eq!(story.scenes[0].choices[0].next_scene, "b");
        assert_eq!(story.scenes[1], Scene::new("b"));
    }

    #[test]
    fn parse_json_accepts_wrapped_scene_list() {
        let json = r#"{"scenes": [{"id": "only"}]}"#;
        let story = Story::from_json(json).unwrap();
        assert_eq!(story.into_scenes(), vec![Scene::new("only")]);
    }

    #[test]
    fn parse_json_requires_scene_id() {
        assert!(Story::from_json(r#"[{"dialogue": "orphan"}]"#).is_err());
    }

    #[test]
    fn open_dispatches_on_extension() {
        let mut tmp = Builder::new().suffix(".json").tempfile().unwrap();
        tmp.write_all(br#"[{"id": "x"}, {"id": "y"}]"#).unwrap();
        let story = Story::open(tmp.path()).unwrap();
        assert_eq!(story.scenes.len(), 2);

        let mut unknown = Builder::new().suffix(".txt").tempfile().unwrap();
        unknown.write_all(b"[]").unwrap();
        assert!(Story::open(unknown.path()).is_err());
    }
}
