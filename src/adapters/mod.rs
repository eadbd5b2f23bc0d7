// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod mail;
pub mod note_file;

pub use mail::SmtpNotifier;
pub use note_file::LocalNoteFile;
