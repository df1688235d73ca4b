pub mod draft;

pub use draft::{ClaimDraft, DraftError, JoinDraft, PalDraft, ResolveDraft};
