//! Scene-graph runtime for small branching visual novels.
//!
//! The crate keeps the narrative engine separate from presentation: the
//! [`VisualNovel`] engine only tracks scenes, the cursor and history, while
//! [`SceneView`] projects the current scene to text and [`Session`] maps
//! player gestures onto engine calls. Stories are authored as XML or JSON;
//! an optional [`Vocabulary`] annotates dialogue with study hints.

pub mod demo;
pub mod hints;
pub mod input;
pub mod novel;
pub mod scene;
pub mod session;
pub mod view;

pub use demo::{demo_novel, demo_story};
pub use hints::{Analysis, Kanji, UsageStats, Vocabulary, Word};
pub use input::{Gesture, KeyCode, NamedKey};
pub use novel::{Navigation, StoryError, Strictness, VisualNovel, NO_SCENE};
pub use scene::{Choice, Scene, Story};
pub use session::{DialogueAnnotator, Session, Step};
pub use view::SceneView;
