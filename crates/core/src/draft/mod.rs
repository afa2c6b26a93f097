mod display;
mod error;
mod operations;
mod types;
mod view;

pub use display::{is_valid_format, OffsetTimeDisplay, TimeDisplay};
pub use error::DraftError;
pub use operations::{name_key, normalize, prepare_settings, MAX_NAME_LEN};
pub use types::{
    DepthChartPosition, DepthChartSlot, Draft, DraftId, DraftSettings, DraftStatus, NextPick,
    UserId,
};
pub use view::{
    build_view, secure, AccessContext, DraftDetails, DraftSummary, DraftView, NormalizedDraft,
    ViewStatus,
};
