//! Scene graph navigation engine.
//!
//! [`VisualNovel`] owns the ordered scene list, the cursor into it and the
//! history stack used for back navigation. Every operation is total: broken
//! choice targets and out-of-range cursors degrade to "no scene" instead of
//! failing, and the host is expected to render that state as a blank view.

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use thiserror::Error;

use crate::scene::Scene;

/// Cursor value produced when a choice names a scene that does not exist.
pub const NO_SCENE: usize = usize::MAX;

/// How strictly a scene list is checked when building an engine from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Accept any scene list. Duplicate ids resolve to the first occurrence.
    #[default]
    Permissive,
    /// Reject empty stories, duplicate ids and dangling choice targets.
    Strict,
}

/// Authoring problems reported by [`VisualNovel::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("story contains no scenes")]
    EmptyStory,
    #[error("scene id {id:?} at position {duplicate} duplicates position {first}")]
    DuplicateSceneId {
        id: String,
        first: usize,
        duplicate: usize,
    },
    #[error("choice {choice} of scene {scene:?} targets unknown scene {target:?}")]
    DanglingChoice {
        scene: String,
        choice: usize,
        target: String,
    },
    #[error("story failed validation: {}", join_errors(.0))]
    Invalid(Vec<StoryError>),
}

fn join_errors(errors: &[StoryError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of a navigation call.
///
/// The engine never surfaces these as errors; they describe what happened so
/// hosts and tests can tell a real transition from a silently ignored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// No scene at the cursor, nothing changed.
    Stalled,
    /// Followed a choice to the scene at `to`.
    Choice {
        from: usize,
        to: usize,
        target: String,
    },
    /// No usable choice, moved one scene forward. `to` may be past the end.
    Fallthrough { from: usize, to: usize },
    /// Followed a choice whose target does not exist. The cursor is now [`NO_SCENE`].
    DanglingChoice { from: usize, target: String },
    /// Restored the cursor from history.
    Rewound { to: usize },
    /// History was empty, nothing changed.
    HistoryEmpty,
}

impl Navigation {
    /// Returns `true` if the call changed the navigation state.
    pub fn moved(&self) -> bool {
        !matches!(self, Self::Stalled | Self::HistoryEmpty)
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stalled => f.write_str("no current scene"),
            Self::Choice { from, to, target } => write!(f, "{from} -> {to} ({target})"),
            Self::Fallthrough { from, to } => write!(f, "{from} -> {to}"),
            Self::DanglingChoice { from, target } => {
                write!(f, "{from} -> unknown scene {target:?}")
            }
            Self::Rewound { to } => write!(f, "back to {to}"),
            Self::HistoryEmpty => f.write_str("history is empty"),
        }
    }
}

/// Visual novel engine: scene list plus navigation state.
///
/// `current_scene` and `history` are public so hosts can restart the story
/// or jump directly without going through the navigation operations.
#[derive(Debug, Clone, Default)]
pub struct VisualNovel {
    pub current_scene: usize,
    pub history: Vec<usize>,
    scenes: Vec<Scene>,
    index: HashMap<String, usize>,
}

impl VisualNovel {
    /// Creates an engine with no scenes, positioned at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine from an initial scene list.
    ///
    /// With [`Strictness::Strict`] the list must pass [`VisualNovel::validate`].
    pub fn from_scenes(
        scenes: impl IntoIterator<Item = Scene>,
        strictness: Strictness,
    ) -> Result<Self, StoryError> {
        let mut novel = Self::new();
        for scene in scenes {
            novel.add_scene(scene);
        }
        if strictness == Strictness::Strict {
            novel.validate()?;
        }
        Ok(novel)
    }

    /// Appends a scene. Ids are not checked; the first scene with an id wins lookups.
    pub fn add_scene(&mut self, scene: Scene) {
        let position = self.scenes.len();
        self.index.entry(scene.id.clone()).or_insert(position);
        self.scenes.push(scene);
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Returns the scene at the cursor, or `None` if the cursor is out of range.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.get(self.current_scene)
    }

    /// Position of the first scene with the given id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Moves forward along the default edge (`next_scene(0)`).
    pub fn advance(&mut self) -> Navigation {
        self.next_scene(0)
    }

    /// Moves forward, following choice `choice_index` when the current scene has it.
    ///
    /// The current position is pushed to history before the cursor changes,
    /// even when the new position turns out to address no scene.
    pub fn next_scene(&mut self, choice_index: usize) -> Navigation {
        let Some(scene) = self.scenes.get(self.current_scene) else {
            debug!("next_scene ignored: no scene at {}", self.current_scene);
            return Navigation::Stalled;
        };

        let from = self.current_scene;
        let target = scene
            .choices
            .get(choice_index)
            .map(|choice| choice.next_scene.clone());
        self.history.push(from);

        let navigation = match target {
            Some(target) => match self.position_of(&target) {
                Some(to) => {
                    self.current_scene = to;
                    Navigation::Choice { from, to, target }
                }
                None => {
                    warn!("choice {choice_index} of scene at {from} targets unknown scene {target:?}");
                    self.current_scene = NO_SCENE;
                    Navigation::DanglingChoice { from, target }
                }
            },
            None => {
                self.current_scene = from + 1;
                Navigation::Fallthrough {
                    from,
                    to: self.current_scene,
                }
            }
        };
        debug!("next_scene: {navigation}");
        navigation
    }

    /// Restores the most recent history entry. Empty history is a no-op.
    pub fn previous_scene(&mut self) -> Navigation {
        match self.history.pop() {
            Some(to) => {
                self.current_scene = to;
                debug!("previous_scene: back to {to}");
                Navigation::Rewound { to }
            }
            None => Navigation::HistoryEmpty,
        }
    }

    /// Checks the scene list for authoring mistakes the permissive engine tolerates.
    pub fn validate(&self) -> Result<(), StoryError> {
        let mut problems = Vec::new();
        if self.scenes.is_empty() {
            problems.push(StoryError::EmptyStory);
        }

        for (position, scene) in self.scenes.iter().enumerate() {
            if let Some(first) = self.position_of(&scene.id).filter(|first| *first != position) {
                problems.push(StoryError::DuplicateSceneId {
                    id: scene.id.clone(),
                    first,
                    duplicate: position,
                });
            }
            for (choice, edge) in scene.choices.iter().enumerate() {
                if self.position_of(&edge.next_scene).is_none() {
                    problems.push(StoryError::DanglingChoice {
                        scene: scene.id.clone(),
                        choice,
                        target: edge.next_scene.clone(),
                    });
                }
            }
        }

        match problems.len() {
            0 => Ok(()),
            1 => Err(problems.remove(0)),
            _ => Err(StoryError::Invalid(problems)),
        }
    }
}
