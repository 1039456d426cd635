pub mod candidate;
pub mod confirmed;
pub mod symbology;

pub use candidate::Candidate;
pub use confirmed::{CodeId, ConfirmedCode, ConfirmedCodes};
pub use symbology::Symbology;
