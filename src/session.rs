use log::info;

use crate::input::Gesture;
use crate::novel::{Navigation, VisualNovel};
use crate::view::SceneView;

/// Reads dialogue text and produces annotation lines shown beside it.
///
/// Annotators never see or touch navigation state.
pub trait DialogueAnnotator {
    fn annotate(&self, dialogue: &str) -> Vec<String>;
}

impl<F> DialogueAnnotator for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn annotate(&self, dialogue: &str) -> Vec<String> {
        self(dialogue)
    }
}

/// Result of applying one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Navigated(Navigation),
    Restarted,
    Quit,
}

/// Host that owns one engine and applies player gestures to it.
pub struct Session {
    novel: VisualNovel,
    annotator: Option<Box<dyn DialogueAnnotator>>,
}

impl Session {
    pub fn new(novel: VisualNovel) -> Self {
        Self {
            novel,
            annotator: None,
        }
    }

    pub fn with_annotator(mut self, annotator: impl DialogueAnnotator + 'static) -> Self {
        self.annotator = Some(Box::new(annotator));
        self
    }

    pub fn novel(&self) -> &VisualNovel {
        &self.novel
    }

    pub fn into_novel(self) -> VisualNovel {
        self.novel
    }

    pub fn apply(&mut self, gesture: Gesture) -> Step {
        match gesture {
            Gesture::Advance => Step::Navigated(self.novel.advance()),
            Gesture::Choose(index) => Step::Navigated(self.novel.next_scene(index)),
            Gesture::Back => Step::Navigated(self.novel.previous_scene()),
            Gesture::Menu => {
                self.restart();
                Step::Restarted
            }
            Gesture::Quit => Step::Quit,
        }
    }

    /// Puts the cursor back on the first scene and clears history.
    pub fn restart(&mut self) {
        info!("restarting story");
        self.novel.current_scene = 0;
        self.novel.history.clear();
    }

    pub fn view(&self) -> SceneView {
        SceneView::of(self.novel.current_scene())
    }

    /// Annotation lines for the current dialogue; empty without an annotator.
    pub fn annotations(&self) -> Vec<String> {
        match (&self.annotator, self.novel.current_scene()) {
            (Some(annotator), Some(scene)) if !scene.dialogue.is_empty() => {
                annotator.annotate(&scene.dialogue)
            }
            _ => Vec::new(),
        }
    }
}
