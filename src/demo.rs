use anyhow::{Context, Result};

use crate::novel::{Strictness, VisualNovel};
use crate::scene::Story;

/// Story XML for the bundled classroom demo.
pub const DEMO_STORY_XML: &str = include_str!("../assets/demo_story.xml");

pub fn demo_story() -> Result<Story> {
    Story::from_xml(DEMO_STORY_XML).context("bundled demo story is malformed")
}

/// Builds an engine positioned at the demo's first scene.
pub fn demo_novel() -> Result<VisualNovel> {
    let story = demo_story()?;
    VisualNovel::from_scenes(story.scenes, Strictness::Strict)
        .context("bundled demo story failed validation")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_story_is_well_formed() {
        let novel = demo_novel().unwrap();
        assert_eq!(novel.len(), 7);
        let first = novel.current_scene().unwrap();
        assert_eq!(first.id, "scene_0");
        assert_eq!(first.character_name, "Yuki");
        assert_eq!(first.choices.len(), 2);
    }

    #[test]
    fn demo_keeps_authored_text() {
        let story = demo_story().unwrap();
        assert_eq!(story.scenes[0].background, "🏫 School Classroom");
        assert_eq!(story.scenes[2].character, "😢 Sad Character");
        assert_eq!(
            story.scenes[4].dialogue,
            "Welcome to class everyone! Today we will learn about JavaScript."
        );
        assert_eq!(story.scenes[5].character, "");
    }

    #[test]
    fn demo_bad_ending_loops_to_start() {
        let mut novel = demo_novel().unwrap();
        novel.next_scene(1);
        novel.next_scene(0);
        novel.next_scene(1);
        assert_eq!(novel.current_scene().unwrap().id, "scene_6");
        novel.advance();
        assert_eq!(novel.current_scene, 0);
        assert_eq!(novel.history, vec![0, 2, 4, 6]);
    }
}
