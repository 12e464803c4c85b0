pub(crate) mod composer;
pub(crate) mod header;
pub(crate) mod message_log;
pub(crate) mod pdf_controls;
pub(crate) mod theme_switcher;
