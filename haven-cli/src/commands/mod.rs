//! Command implementations for the haven CLI.

pub mod availability;
pub mod block;
pub mod book;
pub mod cancel;
pub mod completions;
pub mod init;
pub mod list;
pub mod modify;
pub mod show;
pub mod status;

pub use availability::AvailabilityCommand;
pub use block::{BlockCommand, BlocksCommand, UnblockCommand};
pub use book::{BookCommand, BookingArgs, QuoteCommand};
pub use cancel::{CancelCommand, NoShowCommand};
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use modify::ModifyCommand;
pub use show::ShowCommand;
pub use status::StatusCommand;
