pub mod run;
pub mod users;
pub mod version;

pub use run::Run;
pub use users::Users;
pub use version::Version;
