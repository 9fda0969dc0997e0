pub mod fetch;
pub mod loading;
pub mod slice;
pub mod view;

pub use fetch::{FetchDecision, FetchTrigger, TriggerKey, TriggerOutcome};
pub use loading::{resolve_render_mode, RenderMode};
pub use slice::{build_visible_slice, slice_identity, VisibleSlice};
pub use view::{AsyncPageView, PageRender};
