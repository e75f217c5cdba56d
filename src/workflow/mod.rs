pub mod entry_ctx;
pub mod entry_form;

pub use entry_ctx::EntryCtx;
pub use entry_form::EntryForm;
