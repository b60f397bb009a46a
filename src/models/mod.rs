pub mod deepgram;
pub mod ratings;
pub mod record;
pub mod summary;
pub mod transcript;
pub mod usage;

pub use deepgram::*;
pub use ratings::*;
pub use record::*;
pub use summary::*;
pub use transcript::*;
pub use usage::*;
