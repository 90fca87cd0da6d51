mod bio;
mod dispatcher;
mod social;

pub use bio::BioGenerator;
pub use dispatcher::ContentDispatcher;
pub use social::SocialPostGenerator;
