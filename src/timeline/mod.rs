/*!
 * Editing session state: the ordered entry store, its undo/redo log, the
 * outward event channel, and the `SubtitleEditor` that ties them together.
 */

pub mod editor;
pub mod events;
pub mod history;
pub mod store;

pub use editor::{SubtitleEditor, SubtitlePreview};
pub use events::{EventBus, TimelineEvent};
pub use history::{EditCommand, EditEvent, EditField, EditHistory, FieldChange};
pub use store::{ConflictResolution, MoveOutcome, StructuralChange, Timeline};
