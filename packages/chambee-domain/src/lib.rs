pub mod conversation;
pub mod filters;
pub mod intent;
pub mod messages;
pub mod normalize;
pub mod prompt;
pub mod provider;

pub use conversation::{ConversationTurn, Role, TurnPart};
pub use filters::{FilterIssue, Gender, ParsedFilters, SearchFilters};
pub use intent::{Intent, IntentResult, ParsedReply, ReplyError};
pub use provider::ProviderRecord;
